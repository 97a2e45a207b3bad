#![forbid(unsafe_code)]
//! Fourier epicycles: sample a closed vector path, decompose it into rotating
//! needles, and animate the needle chain until its tip redraws the path.
//!
//! The pipeline is [`PathSampler`] -> [`decompose`] -> [`EpicycleAnimator`].
//! Frames can be rasterized on the CPU ([`CpuSurface`]) and written as PNG
//! files or piped into `ffmpeg`.

pub mod anim;
pub mod encode;
pub mod foundation;
pub mod fourier;
pub mod path;
pub mod render;
pub mod scene;

pub use anim::{
    animator::{AnimationState, AnimatorStatus, EpicycleAnimator},
    frame::Frame,
    needle::Needle,
};
pub use encode::{
    ensure_parent_dir,
    ffmpeg::{DEFAULT_CRF, EncodeConfig, FfmpegEncoder, is_ffmpeg_on_path},
    png::{sequence_file_name, write_png},
};
pub use foundation::core::{
    Affine, BezPath, Circle, Fps, FrameIndex, Line, Point, Rgba8, Vec2, Viewport,
};
pub use foundation::error::{EpicycleError, EpicycleResult};
pub use fourier::decompose::{
    FourierComponent, bin_frequency, decompose, decompose_points, fold_bin, truncate_components,
};
pub use path::{
    sample::{ARCLEN_ACCURACY, DegeneratePolicy, PathSample, PathSampler, sample},
    source::{
        PathSource, load_path, parse_path_data, parse_svg_document, path_to_svg_document,
        write_path_svg,
    },
};
pub use render::{
    FrameRGBA,
    cpu::CpuSurface,
    surface::{DrawSurface, FrameStyle, draw_frame},
};
pub use scene::{
    config::{PathInput, Scene, SceneConfig, SceneSource},
    driver::{
        FrameSink, Mp4Sink, Pacing, PngSequenceSink, RunOptions, RunStats, advance_to,
        rasterize_frame, run, run_scene,
    },
};
