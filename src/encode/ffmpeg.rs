use std::{
    ffi::OsString,
    io::Write as _,
    path::PathBuf,
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    encode::ensure_parent_dir,
    foundation::{
        core::{Fps, Rgba8, Viewport},
        error::{EpicycleError, EpicycleResult},
    },
    render::FrameRGBA,
};

/// x264 constant rate factor used unless a config asks for another.
pub const DEFAULT_CRF: u8 = 18;

/// One H.264 MP4 output.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeConfig {
    pub out_path: PathBuf,
    pub viewport: Viewport,
    pub fps: Fps,
    /// Transparent pixels are composited over this color before encoding.
    pub background: Rgba8,
    /// x264 quality, 0 (lossless) to 51.
    pub crf: u8,
}

impl EncodeConfig {
    pub fn mp4(
        out_path: impl Into<PathBuf>,
        viewport: Viewport,
        fps: Fps,
        background: Rgba8,
    ) -> Self {
        Self {
            out_path: out_path.into(),
            viewport,
            fps,
            background,
            crf: DEFAULT_CRF,
        }
    }

    pub fn validate(&self) -> EpicycleResult<()> {
        self.viewport.validate()?;
        self.fps.validate()?;
        // yuv420p subsamples chroma 2x2.
        if !self.viewport.width.is_multiple_of(2) || !self.viewport.height.is_multiple_of(2) {
            return Err(EpicycleError::validation(format!(
                "mp4 output needs even dimensions (got {}x{})",
                self.viewport.width, self.viewport.height
            )));
        }
        if self.crf > 51 {
            return Err(EpicycleError::validation(format!(
                "crf must be in 0..=51 (got {})",
                self.crf
            )));
        }
        Ok(())
    }

    /// Arguments for an `ffmpeg` reading raw RGBA frames from stdin.
    pub fn ffmpeg_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-y".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-f".to_string(),
            "rawvideo".to_string(),
            "-pix_fmt".to_string(),
            "rgba".to_string(),
            "-video_size".to_string(),
            format!("{}x{}", self.viewport.width, self.viewport.height),
            "-framerate".to_string(),
            format!("{}/{}", self.fps.num, self.fps.den),
            "-i".to_string(),
            "pipe:0".to_string(),
            "-an".to_string(),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-crf".to_string(),
            self.crf.to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            "-movflags".to_string(),
            "+faststart".to_string(),
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(self.out_path.clone().into_os_string());
        args
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

/// A running `ffmpeg` child fed one opaque RGBA frame at a time.
pub struct FfmpegEncoder {
    out_path: PathBuf,
    viewport: Viewport,
    background: Rgba8,
    child: Child,
    stdin: Option<ChildStdin>,
    opaque: Vec<u8>,
    frames: u64,
}

impl FfmpegEncoder {
    pub fn spawn(cfg: &EncodeConfig) -> EpicycleResult<Self> {
        cfg.validate()?;
        if !is_ffmpeg_on_path() {
            return Err(EpicycleError::encode("ffmpeg was not found on PATH"));
        }
        ensure_parent_dir(&cfg.out_path)?;

        let mut cmd = Command::new("ffmpeg");
        cmd.args(cfg.ffmpeg_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        // Keep terminal Ctrl-C away from ffmpeg; the driver stops feeding frames
        // and closes stdin instead, which finalizes the file.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt as _;
            cmd.process_group(0);
        }

        tracing::debug!(
            out = %cfg.out_path.display(),
            width = cfg.viewport.width,
            height = cfg.viewport.height,
            fps = cfg.fps.as_f64(),
            crf = cfg.crf,
            "spawning ffmpeg"
        );
        let mut child = cmd
            .spawn()
            .map_err(|e| EpicycleError::encode(format!("spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EpicycleError::encode("ffmpeg stdin was not captured"))?;

        Ok(Self {
            out_path: cfg.out_path.clone(),
            viewport: cfg.viewport,
            background: cfg.background,
            child,
            stdin: Some(stdin),
            opaque: Vec::new(),
            frames: 0,
        })
    }

    pub fn write_frame(&mut self, frame: &FrameRGBA) -> EpicycleResult<()> {
        if (frame.width, frame.height) != (self.viewport.width, self.viewport.height) {
            return Err(EpicycleError::encode(format!(
                "frame is {}x{}, encoder expects {}x{}",
                frame.width, frame.height, self.viewport.width, self.viewport.height
            )));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| EpicycleError::encode("ffmpeg stdin is closed"))?;

        frame.flatten_into(self.background, &mut self.opaque)?;
        let index = self.frames;
        stdin
            .write_all(&self.opaque)
            .map_err(|e| EpicycleError::encode(format!("write frame {index} to ffmpeg: {e}")))?;
        self.frames += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    /// Close stdin and wait for ffmpeg to finalize the file. Returns the frame count.
    pub fn finish(mut self) -> EpicycleResult<u64> {
        drop(self.stdin.take());
        let output = self
            .child
            .wait_with_output()
            .map_err(|e| EpicycleError::encode(format!("wait for ffmpeg: {e}")))?;
        if !output.status.success() {
            return Err(EpicycleError::encode(format!(
                "ffmpeg failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        tracing::debug!(frames = self.frames, out = %self.out_path.display(), "mp4 finalized");
        Ok(self.frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
