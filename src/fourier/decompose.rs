use std::f64::consts::{PI, TAU};

use rustfft::{FftPlanner, num_complex::Complex};

use crate::{foundation::core::Point, path::sample::PathSample};

/// One rotating term of the Fourier series of a sampled path.
///
/// `frequency` is in radians per unit of simulation time, where one unit is one
/// sample step: a full traversal of an `N`-point sample takes `N` units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FourierComponent {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
}

/// Fold DFT bin `k` of an `n`-point transform into the signed range `[-n/2, n/2)`.
pub fn fold_bin(k: usize, n: usize) -> i64 {
    let half = n / 2;
    if k < n - half {
        k as i64
    } else {
        k as i64 - n as i64
    }
}

/// Angular frequency of bin `k`: `2π * fold_bin(k, n) / n`.
pub fn bin_frequency(k: usize, n: usize) -> f64 {
    TAU * fold_bin(k, n) as f64 / n as f64
}

/// Map `atan2` output into `(-π, π]`.
fn normalize_phase(phase: f64) -> f64 {
    if phase <= -PI { phase + TAU } else { phase }
}

pub fn decompose(samples: &PathSample) -> Vec<FourierComponent> {
    decompose_points(&samples.points)
}

/// DFT of `points` read as complex values `x + i*y`, one component per non-DC bin,
/// sorted by descending amplitude (ties keep bin order).
#[tracing::instrument(skip(points), fields(n = points.len()))]
pub fn decompose_points(points: &[Point]) -> Vec<FourierComponent> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex<f64>> = points.iter().map(|p| Complex::new(p.x, p.y)).collect();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let inv_n = 1.0 / n as f64;
    let mut out: Vec<FourierComponent> = buffer
        .iter()
        .enumerate()
        // Bin 0 is the centroid; the sampler already placed it at the window center.
        .skip(1)
        .map(|(k, x)| FourierComponent {
            amplitude: x.norm() * inv_n,
            frequency: bin_frequency(k, n),
            phase: normalize_phase(x.arg()),
        })
        .collect();

    out.sort_by(|a, b| b.amplitude.total_cmp(&a.amplitude));

    if let Some(first) = out.first() {
        tracing::debug!(
            components = out.len(),
            largest_amplitude = first.amplitude,
            "decomposed samples"
        );
    }
    out
}

/// Keep the `max` largest components of an amplitude-sorted list.
pub fn truncate_components(
    mut components: Vec<FourierComponent>,
    max: usize,
) -> Vec<FourierComponent> {
    components.truncate(max);
    components
}

#[cfg(test)]
#[path = "../../tests/unit/fourier/decompose.rs"]
mod tests;
