use crate::{
    anim::{frame::Frame, needle::Needle},
    foundation::{
        core::{Circle, Line, Point},
        error::EpicycleResult,
    },
    fourier::decompose::FourierComponent,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum AnimatorStatus {
    /// No needles configured.
    Idle,
    /// At least one needle; stepping moves the chain.
    Running,
}

/// Simulation clock plus the historical path of the final tip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationState {
    pub time: f64,
    /// Append-only; one point per [`EpicycleAnimator::step`]. Reset only by `clear`.
    pub trace: Vec<Point>,
}

/// Owns an ordered chain of needles and advances it frame by frame.
#[derive(Clone, Debug, PartialEq)]
pub struct EpicycleAnimator {
    origin: Point,
    needles: Vec<Needle>,
    state: AnimationState,
}

impl EpicycleAnimator {
    /// `origin` is where the first needle is pinned, normally the viewport center.
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            needles: Vec::new(),
            state: AnimationState::default(),
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn needles(&self) -> &[Needle] {
        &self.needles
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }

    pub fn trace(&self) -> &[Point] {
        &self.state.trace
    }

    pub fn status(&self) -> AnimatorStatus {
        if self.needles.is_empty() {
            AnimatorStatus::Idle
        } else {
            AnimatorStatus::Running
        }
    }

    pub fn add_needle(&mut self, amplitude: f64, frequency: f64, phase: f64) -> EpicycleResult<()> {
        self.push_needle(Needle::new(amplitude, frequency, phase)?)
    }

    pub fn push_needle(&mut self, needle: Needle) -> EpicycleResult<()> {
        needle.validate()?;
        self.needles.push(needle);
        Ok(())
    }

    /// Replace the whole chain. Nothing changes unless every needle is valid.
    /// The clock and trace are kept.
    pub fn set_needles(&mut self, needles: impl IntoIterator<Item = Needle>) -> EpicycleResult<()> {
        let needles: Vec<Needle> = needles.into_iter().collect();
        for n in &needles {
            n.validate()?;
        }
        self.needles = needles;
        Ok(())
    }

    pub fn load_components(&mut self, components: &[FourierComponent]) -> EpicycleResult<()> {
        self.set_needles(components.iter().copied().map(Needle::from))
    }

    /// Drop every needle, rewind the clock and forget the trace.
    pub fn clear(&mut self) {
        self.needles.clear();
        self.state = AnimationState::default();
    }

    /// Chain positions at `time`: `[origin, tip_1, ..., tip_m]`.
    pub fn positions_at(&self, time: f64) -> Vec<Point> {
        let mut out = Vec::with_capacity(self.needles.len() + 1);
        let mut anchor = self.origin;
        out.push(anchor);
        for needle in &self.needles {
            anchor = needle.tip(time, anchor);
            out.push(anchor);
        }
        out
    }

    pub fn tip_at(&self, time: f64) -> Point {
        self.needles
            .iter()
            .fold(self.origin, |anchor, needle| needle.tip(time, anchor))
    }

    /// Advance the clock by `dt` and append the new final tip to the trace.
    ///
    /// With no needles the tip stays at the origin and the trace still grows.
    pub fn step(&mut self, dt: f64) {
        self.state.time += dt;
        let tip = self.tip_at(self.state.time);
        self.state.trace.push(tip);
        tracing::trace!(time = self.state.time, x = tip.x, y = tip.y, "step");
    }

    /// Snapshot of the chain at the current time.
    pub fn render(&self) -> Frame<'_> {
        let positions = self.positions_at(self.state.time);
        let shafts = positions.windows(2).map(|w| Line::new(w[0], w[1])).collect();
        let guides = self
            .needles
            .iter()
            .zip(&positions)
            .map(|(needle, &anchor)| Circle::new(anchor, needle.amplitude))
            .collect();
        let tip = positions.last().copied().unwrap_or(self.origin);

        Frame {
            time: self.state.time,
            shafts,
            guides,
            tip,
            trace: &self.state.trace,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/anim/animator.rs"]
mod tests;
