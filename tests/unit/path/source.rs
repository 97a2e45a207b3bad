use kurbo::{PathEl, Shape as _};

use super::*;

#[test]
fn path_data_parses_move_line_cubic() {
    let p = parse_path_data("M0,0 L10,0 C10,5 5,10 0,10 Z").unwrap();
    let els = p.elements();
    assert!(matches!(els[0], PathEl::MoveTo(_)));
    assert!(matches!(els[1], PathEl::LineTo(_)));
    assert!(matches!(els[2], PathEl::CurveTo(..)));
    assert!(matches!(els[3], PathEl::ClosePath));
}

#[test]
fn blank_path_data_is_empty_path() {
    let err = parse_path_data("   ").unwrap_err();
    assert!(matches!(err, EpicycleError::EmptyPath(_)));
}

#[test]
fn malformed_path_data_is_validation_error() {
    let err = parse_path_data("M0,0 L10").unwrap_err();
    assert!(matches!(err, EpicycleError::Validation(_)));
}

#[test]
fn overflowing_path_data_is_validation_error() {
    let err = parse_path_data("M0,0 L1e400,0 L0,5 Z").unwrap_err();
    assert!(matches!(err, EpicycleError::Validation(_)), "{err}");
}

#[test]
fn svg_document_paths_are_collected() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
        <g><rect x="5" y="5" width="10" height="10"/></g>
        <path d="M50,50 L60,50 L60,60 Z"/>
    </svg>"#;
    let p = parse_svg_document(svg).unwrap();
    let moves = p
        .elements()
        .iter()
        .filter(|el| matches!(el, PathEl::MoveTo(_)))
        .count();
    assert_eq!(moves, 2);

    let bbox = p.bounding_box();
    assert!((bbox.width() - 55.0).abs() < 1e-3);
    assert!((bbox.height() - 55.0).abs() < 1e-3);
}

#[test]
fn svg_document_without_paths_is_empty_path() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"></svg>"#;
    let err = parse_svg_document(svg).unwrap_err();
    assert!(matches!(err, EpicycleError::EmptyPath(_)));
}

#[test]
fn sniff_prefers_svg_for_markup_and_extension() {
    let by_ext = PathSource::sniff(Path::new("shape.SVG"), b"M0,0 L1,1".to_vec()).unwrap();
    assert!(matches!(by_ext, PathSource::Svg(_)));

    let by_content = PathSource::sniff(Path::new("shape.txt"), b"  <svg/>".to_vec()).unwrap();
    assert!(matches!(by_content, PathSource::Svg(_)));

    let data = PathSource::sniff(Path::new("shape.txt"), b"M0,0 L1,1".to_vec()).unwrap();
    assert!(matches!(data, PathSource::Data(ref d) if d == "M0,0 L1,1"));
}

#[test]
fn written_svg_document_reads_back() {
    let original = parse_path_data("M10,10 L90,10 L90,40 Z").unwrap();
    let vp = Viewport::new(100, 50).unwrap();
    let doc = path_to_svg_document(&original, vp);
    assert!(doc.contains("width=\"100\""));

    let back = parse_svg_document(doc.as_bytes()).unwrap();
    let a = original.bounding_box();
    let b = back.bounding_box();
    assert!((a.x0 - b.x0).abs() < 1e-3 && (a.y1 - b.y1).abs() < 1e-3);
}

#[test]
fn load_path_reads_files_from_disk() {
    let dir = std::path::PathBuf::from("target").join("unit_path_source");
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("square.path");
    std::fs::write(&file, "M0,0 L4,0 L4,4 L0,4 Z").unwrap();

    let p = load_path(&file).unwrap();
    assert_eq!(p.elements().len(), 5);
    assert!(load_path(&dir.join("missing.path")).is_err());
}
