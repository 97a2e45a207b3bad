use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::ensure_parent_dir,
    foundation::{core::Rgba8, error::EpicycleResult},
    render::FrameRGBA,
};

/// Write `frame` as an opaque PNG, compositing transparency over `background`.
pub fn write_png(path: &Path, frame: &FrameRGBA, background: Rgba8) -> EpicycleResult<()> {
    ensure_parent_dir(path)?;

    let mut opaque = Vec::new();
    frame.flatten_into(background, &mut opaque)?;

    image::save_buffer_with_format(
        path,
        &opaque,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// `dir/frame_00042.png` style names for frame sequences.
pub fn sequence_file_name(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
