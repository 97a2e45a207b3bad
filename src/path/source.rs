use std::path::Path;

use anyhow::Context as _;

use kurbo::PathEl;

use crate::foundation::{
    core::{Affine, BezPath, Point, Viewport},
    error::{EpicycleError, EpicycleResult},
};

/// Where a vector path description comes from.
#[derive(Clone, Debug)]
pub enum PathSource {
    /// SVG path data (`d` attribute syntax), e.g. `"M0,0 L10,0 C..."`.
    Data(String),
    /// A full SVG document; every path element contributes, in document order.
    Svg(Vec<u8>),
}

impl PathSource {
    /// Pick the source kind from a file name and its contents.
    pub fn sniff(file: &Path, bytes: Vec<u8>) -> EpicycleResult<Self> {
        let is_svg_ext = file
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        let starts_with_tag = bytes
            .iter()
            .find(|b| !b.is_ascii_whitespace())
            .is_some_and(|&b| b == b'<');

        if is_svg_ext || starts_with_tag {
            return Ok(Self::Svg(bytes));
        }

        let text = String::from_utf8(bytes).map_err(|_| {
            EpicycleError::validation(format!(
                "path description '{}' is not valid utf-8",
                file.display()
            ))
        })?;
        Ok(Self::Data(text))
    }

    pub fn to_bez_path(&self) -> EpicycleResult<BezPath> {
        match self {
            Self::Data(d) => parse_path_data(d),
            Self::Svg(bytes) => parse_svg_document(bytes),
        }
    }
}

pub fn load_path(file: &Path) -> EpicycleResult<BezPath> {
    let bytes = std::fs::read(file)
        .with_context(|| format!("read path description '{}'", file.display()))?;
    PathSource::sniff(file, bytes)?.to_bez_path()
}

pub fn parse_path_data(d: &str) -> EpicycleResult<BezPath> {
    let d = d.trim();
    if d.is_empty() {
        return Err(EpicycleError::empty_path("path data is empty"));
    }
    let path = BezPath::from_svg(d)
        .map_err(|e| EpicycleError::validation(format!("invalid path data: {e}")))?;
    ensure_finite(&path)?;
    Ok(path)
}

/// Reject paths with infinite or NaN coordinates (e.g. `1e400` in path data).
pub fn ensure_finite(path: &BezPath) -> EpicycleResult<()> {
    let bad = path.elements().iter().position(|el| match *el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => !p.is_finite(),
        PathEl::QuadTo(p1, p2) => !(p1.is_finite() && p2.is_finite()),
        PathEl::CurveTo(p1, p2, p3) => !(p1.is_finite() && p2.is_finite() && p3.is_finite()),
        PathEl::ClosePath => false,
    });
    match bad {
        Some(i) => Err(EpicycleError::validation(format!(
            "path element {i} has a non-finite coordinate"
        ))),
        None => Ok(()),
    }
}

pub fn parse_svg_document(bytes: &[u8]) -> EpicycleResult<BezPath> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .map_err(|e| EpicycleError::validation(format!("invalid svg document: {e}")))?;

    let mut out = BezPath::new();
    let count = collect_group_paths(tree.root(), &mut out);
    if count == 0 {
        return Err(EpicycleError::empty_path("no path elements found in svg document"));
    }
    ensure_finite(&out)?;
    tracing::debug!(paths = count, elements = out.elements().len(), "parsed svg document");
    Ok(out)
}

fn collect_group_paths(group: &usvg::Group, out: &mut BezPath) -> usize {
    let mut n = 0usize;
    for child in group.children() {
        match child {
            usvg::Node::Group(g) => n += collect_group_paths(g.as_ref(), out),
            usvg::Node::Path(p) => {
                append_usvg_path(p.as_ref(), out);
                n += 1;
            }
            usvg::Node::Text(_) | usvg::Node::Image(_) => {}
        }
    }
    n
}

fn append_usvg_path(path: &usvg::Path, out: &mut BezPath) {
    use usvg::tiny_skia_path::PathSegment;

    let ts = path.abs_transform();
    // tiny-skia maps x' = sx*x + kx*y + tx, y' = ky*x + sy*y + ty.
    let affine = Affine::new([
        f64::from(ts.sx),
        f64::from(ts.ky),
        f64::from(ts.kx),
        f64::from(ts.sy),
        f64::from(ts.tx),
        f64::from(ts.ty),
    ]);
    let pt = |p: usvg::tiny_skia_path::Point| affine * Point::new(f64::from(p.x), f64::from(p.y));

    for seg in path.data().segments() {
        match seg {
            PathSegment::MoveTo(p) => out.move_to(pt(p)),
            PathSegment::LineTo(p) => out.line_to(pt(p)),
            PathSegment::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathSegment::CubicTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathSegment::Close => out.close_path(),
        }
    }
}

/// Serialize a path as a minimal standalone SVG document.
pub fn path_to_svg_document(path: &BezPath, viewport: Viewport) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n  <path d=\"{d}\" fill=\"none\" stroke=\"black\"/>\n</svg>\n",
        w = viewport.width,
        h = viewport.height,
        d = path.to_svg(),
    )
}

pub fn write_path_svg(file: &Path, path: &BezPath, viewport: Viewport) -> EpicycleResult<()> {
    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(file, path_to_svg_document(path, viewport))
        .with_context(|| format!("write path description '{}'", file.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/path/source.rs"]
mod tests;
