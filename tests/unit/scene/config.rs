use super::*;
use crate::anim::animator::AnimatorStatus;

const NEEDLES_JSON: &str = r#"{
    "viewport": { "width": 320, "height": 240 },
    "fps": { "num": 30, "den": 1 },
    "frames": 90,
    "source": {
        "kind": "needles",
        "needles": [
            { "amplitude": 40.0, "frequency": 1.0, "phase": 0.0 },
            { "amplitude": 10.0, "frequency": -3.0, "phase": 0.5 }
        ]
    }
}"#;

fn path_config(d: &str, num_points: usize) -> SceneConfig {
    SceneConfig {
        viewport: Viewport {
            width: 200,
            height: 100,
        },
        fps: Fps { num: 25, den: 1 },
        frames: 10,
        style: FrameStyle::default(),
        source: SceneSource::Path {
            path: PathInput::Data(d.to_string()),
            num_points,
            margin: 10.0,
            max_components: None,
            traversal_frames: None,
            degenerate: DegeneratePolicy::Constant,
        },
    }
}

#[test]
fn needles_scene_parses_with_defaults() {
    let cfg = SceneConfig::from_json_str(NEEDLES_JSON).unwrap();
    assert_eq!(cfg.style, FrameStyle::default());

    let scene = cfg.build(Path::new(".")).unwrap();
    assert_eq!(scene.animator.needles().len(), 2);
    assert_eq!(scene.animator.origin(), cfg.viewport.center());
    assert!((scene.dt - 1.0 / 30.0).abs() < 1e-15);
    assert_eq!(scene.animator.status(), AnimatorStatus::Running);
}

#[test]
fn path_scene_parses_from_json() {
    let json = r#"{
        "viewport": { "width": 800, "height": 600 },
        "fps": { "num": 60, "den": 1 },
        "frames": 10,
        "source": { "kind": "path", "path": { "d": "M0,0 L10,0 L10,10 Z" }, "num_points": 64 }
    }"#;
    let cfg = SceneConfig::from_json_str(json).unwrap();
    let SceneSource::Path { margin, max_components, .. } = &cfg.source else {
        panic!("expected a path source");
    };
    assert_eq!(*margin, 50.0);
    assert_eq!(*max_components, None);

    let scene = cfg.build(Path::new(".")).unwrap();
    assert_eq!(scene.animator.needles().len(), 63);
    assert_eq!(scene.dt, 1.0);
}

#[test]
fn path_scene_fits_sample_inside_margins() {
    let cfg = path_config("M0,0 L50,0 L50,50 L0,50 Z", 33);
    let (sample, components) = cfg.decompose_source(Path::new(".")).unwrap();
    assert_eq!(sample.len(), 33);
    assert_eq!(components.len(), 32);
    assert_eq!(sample.target_width, 180.0);
    assert_eq!(sample.target_height, 80.0);
    assert!(sample.points.iter().all(|p| p.y >= -1e-9 && p.y <= 80.0 + 1e-9));
}

#[test]
fn traversal_frames_sets_dt_and_max_components_truncates() {
    let mut cfg = path_config("M0,0 L50,0 L50,50 L0,50 Z", 40);
    if let SceneSource::Path {
        max_components,
        traversal_frames,
        ..
    } = &mut cfg.source
    {
        *max_components = Some(5);
        *traversal_frames = Some(80);
    }
    let scene = cfg.build(Path::new(".")).unwrap();
    assert_eq!(scene.animator.needles().len(), 5);
    assert!((scene.dt - 0.5).abs() < 1e-15);
}

#[test]
fn path_file_resolves_against_base_dir() {
    let dir = std::path::PathBuf::from("target").join("unit_scene_config");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("tri.path"), "M0,0 L30,0 L15,20 Z").unwrap();

    let mut cfg = path_config("unused", 12);
    if let SceneSource::Path { path, .. } = &mut cfg.source {
        *path = PathInput::File("tri.path".into());
    }
    let scene = cfg.build(&dir).unwrap();
    assert_eq!(scene.animator.needles().len(), 11);
    assert!(cfg.build(Path::new("definitely/not/here")).is_err());
}

#[test]
fn validation_rejects_bad_configs() {
    let mut cfg = SceneConfig::demo();
    cfg.frames = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::demo();
    cfg.viewport.width = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::demo();
    if let SceneSource::Needles { needles, .. } = &mut cfg.source {
        needles[1].amplitude = -5.0;
    }
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, EpicycleError::InvalidNeedle(ref m) if m.starts_with("needle 1:")));

    let mut cfg = SceneConfig::demo();
    if let SceneSource::Needles { dt, .. } = &mut cfg.source {
        *dt = Some(0.0);
    }
    assert!(cfg.validate().is_err());

    let mut cfg = path_config("M0,0 L1,1", 10);
    if let SceneSource::Path { margin, .. } = &mut cfg.source {
        *margin = 50.0;
    }
    assert!(cfg.validate().is_err(), "margin swallows the 100px height");

    assert!(matches!(
        path_config("  ", 10).validate(),
        Err(EpicycleError::EmptyPath(_))
    ));
    assert!(path_config("M0,0 L1,1", 0).validate().is_err());
}

#[test]
fn demo_scene_matches_three_needle_setup() {
    let cfg = SceneConfig::demo();
    cfg.validate().unwrap();
    let scene = cfg.build(Path::new(".")).unwrap();
    let amps: Vec<f64> = scene.animator.needles().iter().map(|n| n.amplitude).collect();
    assert_eq!(amps, vec![100.0, 50.0, 25.0]);
    assert!((scene.dt - 1.0 / 60.0).abs() < 1e-15);
}

#[test]
fn config_round_trips_through_json() {
    let cfg = path_config("M0,0 L10,0 L10,10 Z", 16);
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("\"kind\":\"path\""));
    assert!(json.contains("\"d\":"));
    let back = SceneConfig::from_json_str(&json).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn decompose_source_rejects_needle_scenes() {
    assert!(SceneConfig::demo().decompose_source(Path::new(".")).is_err());
}

#[test]
fn malformed_json_is_serde_error() {
    let err = SceneConfig::from_json_str("{ \"viewport\": 3 }").unwrap_err();
    assert!(matches!(err, EpicycleError::Serde(_)));
}
