use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::EpicycleResult;

pub mod ffmpeg;
pub mod png;

/// Create the directory that will hold `path`, if any.
pub fn ensure_parent_dir(path: &Path) -> EpicycleResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
