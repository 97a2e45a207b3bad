use crate::foundation::core::{Circle, Line, Point};

/// Renderable snapshot of the needle chain. Pure data; drawing happens elsewhere.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Frame<'a> {
    /// Simulation time this frame was evaluated at.
    pub time: f64,
    /// Needle shafts, anchor to tip, in chain order.
    pub shafts: Vec<Line>,
    /// One guide circle per needle, centered on its anchor.
    pub guides: Vec<Circle>,
    /// Tip of the last needle (the origin when there are no needles).
    pub tip: Point,
    /// Every traced point so far, oldest first.
    pub trace: &'a [Point],
}

impl Frame<'_> {
    pub fn needle_count(&self) -> usize {
        self.shafts.len()
    }
}
