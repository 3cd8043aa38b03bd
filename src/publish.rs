//! Atomic publication of the annotated image.
//!
//! The annotator writes into a temporary file created next to the
//! destination, which is then renamed over it. Same-directory placement
//! keeps the rename on one filesystem, so the destination either holds its
//! previous content or a complete new image, never a partial write.

use std::path::Path;

use crate::annotate::{annotate, AnnotateOptions};
use crate::{Result, SnapError};

pub async fn publish(
    png: &[u8],
    out: &Path,
    label: &str,
    options: &AnnotateOptions,
) -> Result<()> {
    let file_name = out
        .file_name()
        .ok_or_else(|| {
            SnapError::Config(format!("Output path {} has no file name", out.display()))
        })?
        .to_string_lossy()
        .into_owned();
    let dir = match out.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = tempfile::Builder::new()
        .prefix("nextmap-")
        .suffix(&format!(".{}", file_name))
        .tempfile_in(dir)?;

    annotate(png, label, tmp.path(), options).await?;

    // persist() renames onto the destination and disarms the handle's
    // delete-on-drop, so the published file is not cleaned up with the
    // temp handle.
    tmp.persist(out).map_err(|e| SnapError::Io(e.error))?;
    Ok(())
}
