use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
    time::Instant,
};

use crate::{
    anim::{animator::EpicycleAnimator, frame::Frame},
    encode::{
        ffmpeg::{EncodeConfig, FfmpegEncoder},
        png::{sequence_file_name, write_png},
    },
    foundation::{
        core::{Fps, FrameIndex, Viewport},
        error::{EpicycleError, EpicycleResult},
    },
    render::{
        FrameRGBA,
        cpu::CpuSurface,
        surface::{FrameStyle, draw_frame},
    },
    scene::config::Scene,
};

/// Receives every frame the driver produces.
pub trait FrameSink {
    fn consume(&mut self, index: FrameIndex, frame: &Frame<'_>) -> EpicycleResult<()>;

    /// Called once when the loop exits, including after errors and cancellation.
    fn finish(&mut self) -> EpicycleResult<()> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pacing {
    /// Produce frames as fast as the sink accepts them.
    Unpaced,
    /// Sleep out the rest of each frame interval.
    Realtime(Fps),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunOptions {
    /// Simulation time added per frame.
    pub dt: f64,
    /// Stop after this many frames; `None` runs until cancelled.
    pub frames: Option<u64>,
    pub pacing: Pacing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunStats {
    pub frames: u64,
    pub sim_time: f64,
    pub cancelled: bool,
}

/// Fixed-timestep loop: poll `cancel`, step, render, hand the frame to `sink`.
#[tracing::instrument(skip_all, fields(dt = opts.dt, frames = ?opts.frames))]
pub fn run(
    animator: &mut EpicycleAnimator,
    sink: &mut dyn FrameSink,
    opts: &RunOptions,
    cancel: &AtomicBool,
) -> EpicycleResult<RunStats> {
    if !opts.dt.is_finite() || opts.dt <= 0.0 {
        return Err(EpicycleError::validation(format!(
            "dt must be finite and > 0 (got {})",
            opts.dt
        )));
    }

    let mut stats = RunStats::default();
    let looped = drive(animator, sink, opts, cancel, &mut stats);
    let finished = sink.finish();
    looped?;
    finished?;

    stats.sim_time = animator.time();
    if stats.cancelled {
        tracing::info!(frames = stats.frames, "run cancelled");
    } else {
        tracing::info!(frames = stats.frames, sim_time = stats.sim_time, "run complete");
    }
    Ok(stats)
}

fn drive(
    animator: &mut EpicycleAnimator,
    sink: &mut dyn FrameSink,
    opts: &RunOptions,
    cancel: &AtomicBool,
    stats: &mut RunStats,
) -> EpicycleResult<()> {
    let budget = match opts.pacing {
        Pacing::Unpaced => None,
        Pacing::Realtime(fps) => Some(fps.frame_duration()),
    };

    loop {
        if opts.frames.is_some_and(|n| stats.frames >= n) {
            return Ok(());
        }
        if cancel.load(Ordering::Relaxed) {
            stats.cancelled = true;
            return Ok(());
        }

        let started = Instant::now();
        animator.step(opts.dt);
        sink.consume(FrameIndex(stats.frames), &animator.render())?;
        stats.frames += 1;

        if let Some(budget) = budget
            && let Some(rest) = budget.checked_sub(started.elapsed())
        {
            std::thread::sleep(rest);
        }
    }
}

/// Run a built scene for its configured frame count.
pub fn run_scene(
    scene: &mut Scene,
    sink: &mut dyn FrameSink,
    cancel: &AtomicBool,
) -> EpicycleResult<RunStats> {
    let opts = RunOptions {
        dt: scene.dt,
        frames: Some(scene.frames),
        pacing: Pacing::Unpaced,
    };
    run(&mut scene.animator, sink, &opts, cancel)
}

/// Step `animator` until frame `index` (0-based, frame 0 is after the first step).
pub fn advance_to(animator: &mut EpicycleAnimator, index: FrameIndex, dt: f64) {
    for _ in 0..=index.0 {
        animator.step(dt);
    }
}

pub fn rasterize_frame(
    frame: &Frame<'_>,
    viewport: Viewport,
    style: &FrameStyle,
) -> EpicycleResult<FrameRGBA> {
    let mut surface = CpuSurface::new(viewport)?;
    draw_frame(&mut surface, frame, style);
    Ok(surface.finish())
}

/// Rasterizes every frame into an MP4 through `ffmpeg`.
pub struct Mp4Sink {
    viewport: Viewport,
    style: FrameStyle,
    encoder: Option<FfmpegEncoder>,
}

impl Mp4Sink {
    pub fn new(
        out_path: impl Into<PathBuf>,
        viewport: Viewport,
        fps: Fps,
        style: FrameStyle,
    ) -> EpicycleResult<Self> {
        let cfg = EncodeConfig::mp4(out_path, viewport, fps, style.background);
        let encoder = FfmpegEncoder::spawn(&cfg)?;
        Ok(Self {
            viewport,
            style,
            encoder: Some(encoder),
        })
    }
}

impl FrameSink for Mp4Sink {
    fn consume(&mut self, index: FrameIndex, frame: &Frame<'_>) -> EpicycleResult<()> {
        let rgba = rasterize_frame(frame, self.viewport, &self.style)?;
        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| EpicycleError::encode("mp4 sink is already finished"))?;
        encoder.write_frame(&rgba)?;
        tracing::trace!(frame = index.0, "encoded frame");
        Ok(())
    }

    fn finish(&mut self) -> EpicycleResult<()> {
        match self.encoder.take() {
            Some(encoder) => encoder.finish().map(|_| ()),
            None => Ok(()),
        }
    }
}

/// Rasterizes every frame into `dir/frame_NNNNN.png`.
pub struct PngSequenceSink {
    dir: PathBuf,
    viewport: Viewport,
    style: FrameStyle,
    written: u64,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>, viewport: Viewport, style: FrameStyle) -> Self {
        Self {
            dir: dir.into(),
            viewport,
            style,
            written: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn consume(&mut self, index: FrameIndex, frame: &Frame<'_>) -> EpicycleResult<()> {
        let rgba = rasterize_frame(frame, self.viewport, &self.style)?;
        write_png(
            &sequence_file_name(&self.dir, index.0),
            &rgba,
            self.style.background,
        )?;
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/driver.rs"]
mod tests;
