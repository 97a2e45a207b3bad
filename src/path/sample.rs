use kurbo::{ParamCurve as _, ParamCurveArclen as _, PathEl, PathSeg};

use crate::{
    foundation::{
        core::{BezPath, Point, Vec2},
        error::{EpicycleError, EpicycleResult},
    },
    path::source::ensure_finite,
};

/// Accuracy handed to kurbo's arc length solvers (in path units).
pub const ARCLEN_ACCURACY: f64 = 1e-6;

/// What to do with a path whose total arc length is zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Produce `num_points` copies of the path's only point.
    #[default]
    Constant,
    /// Fail with [`EpicycleError::DegeneratePath`].
    Reject,
}

/// Arc-length-uniform samples of a path, normalized into a target window.
///
/// Order is traversal order along the path, not spatial order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathSample {
    pub points: Vec<Point>,
    pub target_width: f64,
    pub target_height: f64,
}

impl PathSample {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Center of the target window; the centroid of the samples lands here.
    pub fn center(&self) -> Point {
        Point::new(self.target_width / 2.0, self.target_height / 2.0)
    }

    pub fn centroid(&self) -> Point {
        centroid(&self.points)
    }

    /// The samples as a closed polyline, suitable for caching as a path description.
    pub fn to_bez_path(&self) -> BezPath {
        let mut out = BezPath::new();
        let mut pts = self.points.iter();
        if let Some(&first) = pts.next() {
            out.move_to(first);
            for &p in pts {
                out.line_to(p);
            }
            out.close_path();
        }
        out
    }
}

/// Stateless sampler configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PathSampler {
    pub degenerate: DegeneratePolicy,
}

impl PathSampler {
    pub fn new(degenerate: DegeneratePolicy) -> Self {
        Self { degenerate }
    }

    /// Sample `num_points` arc-length-uniform points along `path` and fit them into
    /// a `target_width` x `target_height` window.
    ///
    /// All sub-paths form one traversal in document order; the jump between
    /// sub-paths carries no length. Sample `i` sits at arc length
    /// `L * i / (num_points - 1)` (a single sample sits at the start).
    ///
    /// Normalization moves the centroid to the window center and scales uniformly
    /// so that the farthest point on each side of the centroid lands on the
    /// window edge at most. For shapes whose centroid is the bounding box center
    /// this is `min(target_width / x_range, target_height / y_range)`. A zero
    /// range contributes a factor of 1.
    ///
    /// Non-finite coordinates, or a path too large for its arc length or
    /// centroid to be represented, fail with [`EpicycleError::Validation`].
    #[tracing::instrument(skip(self, path), fields(elements = path.elements().len()))]
    pub fn sample(
        &self,
        path: &BezPath,
        num_points: usize,
        target_width: f64,
        target_height: f64,
    ) -> EpicycleResult<PathSample> {
        if num_points == 0 {
            return Err(EpicycleError::validation("num_points must be >= 1"));
        }
        if !(target_width.is_finite() && target_width > 0.0)
            || !(target_height.is_finite() && target_height > 0.0)
        {
            return Err(EpicycleError::validation(format!(
                "sample target must be positive and finite (got {target_width}x{target_height})"
            )));
        }

        let start = first_point(path).ok_or_else(|| {
            EpicycleError::empty_path("path description contains no sub-paths")
        })?;
        ensure_finite(path)?;

        let table = ArclenTable::new(path);
        if !table.total.is_finite() {
            return Err(EpicycleError::validation(
                "path arc length overflows; coordinates are too large",
            ));
        }
        tracing::debug!(
            segments = table.segments.len(),
            total_len = table.total,
            "measured path"
        );

        let raw = if table.total > 0.0 {
            table.sample_uniform(num_points)
        } else {
            match self.degenerate {
                DegeneratePolicy::Constant => vec![start; num_points],
                DegeneratePolicy::Reject => {
                    return Err(EpicycleError::degenerate_path(
                        "path has zero arc length",
                    ));
                }
            }
        };

        let points = normalize(&raw, target_width, target_height);
        if points.iter().any(|p| !p.is_finite()) {
            return Err(EpicycleError::validation(
                "path coordinates are too large to normalize",
            ));
        }
        Ok(PathSample {
            points,
            target_width,
            target_height,
        })
    }
}

/// Sample with the default (constant-on-degenerate) policy.
pub fn sample(
    path: &BezPath,
    num_points: usize,
    target_width: f64,
    target_height: f64,
) -> EpicycleResult<PathSample> {
    PathSampler::default().sample(path, num_points, target_width, target_height)
}

fn first_point(path: &BezPath) -> Option<Point> {
    path.elements().iter().find_map(|el| match *el {
        PathEl::MoveTo(p) => Some(p),
        _ => None,
    })
}

struct ArclenTable {
    segments: Vec<(PathSeg, f64)>,
    total: f64,
}

impl ArclenTable {
    fn new(path: &BezPath) -> Self {
        let segments: Vec<(PathSeg, f64)> = path
            .segments()
            .map(|seg| (seg, seg.arclen(ARCLEN_ACCURACY)))
            .filter(|&(_, len)| len > 0.0)
            .collect();
        let total = segments.iter().map(|&(_, len)| len).sum();
        Self { segments, total }
    }

    fn sample_uniform(&self, num_points: usize) -> Vec<Point> {
        let mut out = Vec::with_capacity(num_points);
        let mut seg_idx = 0usize;
        let mut seg_start = 0.0f64;

        for i in 0..num_points {
            let s = if num_points > 1 {
                self.total * (i as f64) / ((num_points - 1) as f64)
            } else {
                0.0
            };

            // Targets are non-decreasing, so the segment cursor only moves forward.
            while seg_idx + 1 < self.segments.len() && s > seg_start + self.segments[seg_idx].1 {
                seg_start += self.segments[seg_idx].1;
                seg_idx += 1;
            }

            let (seg, len) = self.segments[seg_idx];
            let local = (s - seg_start).clamp(0.0, len);
            let t = if local >= len {
                1.0
            } else {
                seg.inv_arclen(local, ARCLEN_ACCURACY).clamp(0.0, 1.0)
            };
            out.push(seg.eval(t));
        }
        out
    }
}

fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ZERO;
    }
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / points.len() as f64).to_point()
}

fn normalize(points: &[Point], target_width: f64, target_height: f64) -> Vec<Point> {
    let c = centroid(points);
    let center = Point::new(target_width / 2.0, target_height / 2.0);

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        x_min = x_min.min(p.x);
        x_max = x_max.max(p.x);
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }
    let scale = axis_scale(x_min, x_max, c.x, target_width)
        .min(axis_scale(y_min, y_max, c.y, target_height));

    points.iter().map(|&p| center + (p - c) * scale).collect()
}

/// Largest scale keeping `[lo, hi]` inside `[0, extent]` once `centroid` sits at
/// `extent / 2`.
fn axis_scale(lo: f64, hi: f64, centroid: f64, extent: f64) -> f64 {
    if hi - lo <= 0.0 {
        return 1.0;
    }
    let reach = (centroid - lo).max(hi - centroid);
    if reach > 0.0 { extent / 2.0 / reach } else { 1.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/path/sample.rs"]
mod tests;
