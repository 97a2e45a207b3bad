use crate::{
    foundation::{
        core::{Point, Vec2},
        error::{EpicycleError, EpicycleResult},
    },
    fourier::decompose::FourierComponent,
};

/// A single rotation generator: a vector of fixed length spinning at a constant rate.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Needle {
    /// Length of the needle (>= 0).
    pub amplitude: f64,
    /// Angular velocity in radians per unit of simulation time.
    pub frequency: f64,
    /// Angle at `time == 0`, in radians.
    pub phase: f64,
}

impl Needle {
    pub fn new(amplitude: f64, frequency: f64, phase: f64) -> EpicycleResult<Self> {
        let needle = Self {
            amplitude,
            frequency,
            phase,
        };
        needle.validate()?;
        Ok(needle)
    }

    pub fn validate(&self) -> EpicycleResult<()> {
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(EpicycleError::invalid_needle(format!(
                "amplitude must be finite and >= 0 (got {})",
                self.amplitude
            )));
        }
        if !self.frequency.is_finite() {
            return Err(EpicycleError::invalid_needle(format!(
                "frequency must be finite (got {})",
                self.frequency
            )));
        }
        if !self.phase.is_finite() {
            return Err(EpicycleError::invalid_needle(format!(
                "phase must be finite (got {})",
                self.phase
            )));
        }
        Ok(())
    }

    pub fn angle_at(&self, time: f64) -> f64 {
        self.frequency * time + self.phase
    }

    /// Tip position when the needle is pinned at `anchor`.
    pub fn tip(&self, time: f64, anchor: Point) -> Point {
        anchor + Vec2::from_angle(self.angle_at(time)) * self.amplitude
    }
}

impl From<FourierComponent> for Needle {
    fn from(c: FourierComponent) -> Self {
        Self {
            amplitude: c.amplitude,
            frequency: c.frequency,
            phase: c.phase,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/anim/needle.rs"]
mod tests;
