use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    anim::{animator::EpicycleAnimator, needle::Needle},
    foundation::{
        core::{Fps, Viewport},
        error::{EpicycleError, EpicycleResult},
    },
    fourier::decompose::{FourierComponent, decompose, truncate_components},
    path::{
        sample::{DegeneratePolicy, PathSample, PathSampler},
        source::{load_path, parse_path_data},
    },
    render::surface::FrameStyle,
};

fn default_num_points() -> usize {
    1000
}

fn default_margin() -> f64 {
    50.0
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A complete animation setup: canvas, clock and needle source.
///
/// Loaded from JSON by the CLI; see [`SceneConfig::build`] for how it turns into
/// a runnable [`Scene`].
pub struct SceneConfig {
    /// Output canvas; the needle chain is pinned at its center.
    pub viewport: Viewport,
    /// Output frame rate (also the pacing rate for realtime runs).
    pub fps: Fps,
    /// Number of frames to produce.
    pub frames: u64,
    #[serde(default)]
    pub style: FrameStyle,
    pub source: SceneSource,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneSource {
    /// Hand-written needles.
    Needles {
        needles: Vec<Needle>,
        /// Simulation time per frame; defaults to one frame interval in seconds.
        #[serde(default)]
        dt: Option<f64>,
    },
    /// Needles from the Fourier decomposition of a vector path.
    Path {
        path: PathInput,
        #[serde(default = "default_num_points")]
        num_points: usize,
        /// Pixels kept free on every side when fitting the path.
        #[serde(default = "default_margin")]
        margin: f64,
        /// Keep only this many of the largest components.
        #[serde(default)]
        max_components: Option<usize>,
        /// Frames per full traversal; defaults to `num_points` (one sample per frame).
        #[serde(default)]
        traversal_frames: Option<u64>,
        #[serde(default)]
        degenerate: DegeneratePolicy,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathInput {
    /// Path description file, relative to the config file's directory.
    File(PathBuf),
    /// Inline SVG path data.
    #[serde(rename = "d")]
    Data(String),
}

/// A validated, ready-to-run scene.
#[derive(Clone, Debug)]
pub struct Scene {
    pub viewport: Viewport,
    pub fps: Fps,
    pub frames: u64,
    /// Simulation time added per frame.
    pub dt: f64,
    pub style: FrameStyle,
    pub animator: EpicycleAnimator,
}

impl SceneConfig {
    pub fn from_json_str(s: &str) -> EpicycleResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> EpicycleResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("open scene config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// The three-needle setup used in the docs and tests, stepped by `1/60` per frame.
    pub fn demo() -> Self {
        use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

        Self {
            viewport: Viewport {
                width: 800,
                height: 600,
            },
            fps: Fps { num: 60, den: 1 },
            frames: 600,
            style: FrameStyle::default(),
            source: SceneSource::Needles {
                needles: vec![
                    Needle {
                        amplitude: 100.0,
                        frequency: TAU / 60.0,
                        phase: 0.0,
                    },
                    Needle {
                        amplitude: 50.0,
                        frequency: TAU / 30.0,
                        phase: FRAC_PI_4,
                    },
                    Needle {
                        amplitude: 25.0,
                        frequency: TAU / 15.0,
                        phase: FRAC_PI_2,
                    },
                ],
                dt: None,
            },
        }
    }

    pub fn validate(&self) -> EpicycleResult<()> {
        self.viewport.validate()?;
        self.fps.validate()?;
        if self.frames == 0 {
            return Err(EpicycleError::validation("frames must be > 0"));
        }

        match &self.source {
            SceneSource::Needles { needles, dt } => {
                for (i, n) in needles.iter().enumerate() {
                    n.validate().map_err(|e| match e {
                        EpicycleError::InvalidNeedle(msg) => {
                            EpicycleError::invalid_needle(format!("needle {i}: {msg}"))
                        }
                        other => other,
                    })?;
                }
                if let Some(dt) = dt {
                    validate_dt(*dt)?;
                }
            }
            SceneSource::Path {
                path,
                num_points,
                margin,
                max_components,
                traversal_frames,
                degenerate: _,
            } => {
                if let PathInput::Data(d) = path
                    && d.trim().is_empty()
                {
                    return Err(EpicycleError::empty_path("inline path data is empty"));
                }
                if *num_points == 0 {
                    return Err(EpicycleError::validation("num_points must be > 0"));
                }
                if !margin.is_finite() || *margin < 0.0 {
                    return Err(EpicycleError::validation("margin must be finite and >= 0"));
                }
                let (tw, th) = self.sample_target(*margin);
                if tw <= 0.0 || th <= 0.0 {
                    return Err(EpicycleError::validation(format!(
                        "margin {margin} leaves no room inside a {}x{} viewport",
                        self.viewport.width, self.viewport.height
                    )));
                }
                if *max_components == Some(0) {
                    return Err(EpicycleError::validation("max_components must be > 0"));
                }
                if *traversal_frames == Some(0) {
                    return Err(EpicycleError::validation("traversal_frames must be > 0"));
                }
            }
        }
        Ok(())
    }

    fn sample_target(&self, margin: f64) -> (f64, f64) {
        (
            f64::from(self.viewport.width) - 2.0 * margin,
            f64::from(self.viewport.height) - 2.0 * margin,
        )
    }

    /// Resolve the needle source and set up the animator. File paths resolve
    /// against `base_dir`.
    pub fn build(&self, base_dir: &Path) -> EpicycleResult<Scene> {
        self.validate()?;

        let mut animator = EpicycleAnimator::new(self.viewport.center());
        let dt = match &self.source {
            SceneSource::Needles { needles, dt } => {
                animator.set_needles(needles.iter().copied())?;
                dt.unwrap_or_else(|| self.fps.frame_duration_secs())
            }
            SceneSource::Path {
                num_points,
                margin,
                max_components,
                traversal_frames,
                ..
            } => {
                let (_, components) = self.decompose_source(base_dir)?;
                animator.load_components(&components)?;
                let per_traversal = traversal_frames.unwrap_or(*num_points as u64);
                tracing::info!(
                    needles = components.len(),
                    num_points,
                    margin,
                    max_components = ?max_components,
                    "built path scene"
                );
                *num_points as f64 / per_traversal as f64
            }
        };
        validate_dt(dt)?;

        Ok(Scene {
            viewport: self.viewport,
            fps: self.fps,
            frames: self.frames,
            dt,
            style: self.style,
            animator,
        })
    }

    /// Sample and decompose a path source. Errors for needle sources.
    pub fn decompose_source(
        &self,
        base_dir: &Path,
    ) -> EpicycleResult<(PathSample, Vec<FourierComponent>)> {
        let SceneSource::Path {
            path,
            num_points,
            margin,
            max_components,
            degenerate,
            ..
        } = &self.source
        else {
            return Err(EpicycleError::validation(
                "scene source is not a path",
            ));
        };

        let bez = match path {
            PathInput::File(file) => load_path(&base_dir.join(file))?,
            PathInput::Data(d) => parse_path_data(d)?,
        };
        let (tw, th) = self.sample_target(*margin);
        let sample = PathSampler::new(*degenerate).sample(&bez, *num_points, tw, th)?;
        let mut components = decompose(&sample);
        if let Some(max) = max_components {
            components = truncate_components(components, *max);
        }
        Ok((sample, components))
    }
}

fn validate_dt(dt: f64) -> EpicycleResult<()> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(EpicycleError::validation(format!(
            "dt must be finite and > 0 (got {dt})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
