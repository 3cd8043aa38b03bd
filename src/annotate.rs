//! Timestamp overlay via ImageMagick.
//!
//! The captured PNG is piped into a `convert` subprocess which stamps the
//! current local date/time across the top of the image and writes the result
//! to the requested path itself; this process never writes image bytes to
//! that path.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;

use chrono::{DateTime, Local};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::{Result, SnapError};

/// Label shape: no-break space, localized-style date, UTC offset, trailing
/// space. The padding spaces keep the text off the band's edges.
pub const TIMESTAMP_FORMAT: &str = "\u{a0}%a %d.%m.%Y, %H:%M:%S%z ";

/// Fixed ImageMagick invocation: white text on a semi-translucent black
/// band, anchored to the top of the image, maximum encoding quality.
#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    pub command: String,
    pub gravity: String,
    pub pointsize: u32,
    pub fill: String,
    pub undercolor: String,
    pub quality: u32,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            command: "convert".to_string(),
            gravity: "North".to_string(),
            pointsize: 100,
            fill: "white".to_string(),
            undercolor: "#00000080".to_string(),
            quality: 100,
        }
    }
}

/// Renders the annotation label for `now`.
pub fn timestamp_label(now: DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

fn annotate_args(label: &str, dest: &Path, options: &AnnotateOptions) -> Vec<OsString> {
    vec![
        OsString::from("-"),
        OsString::from("-gravity"),
        OsString::from(&options.gravity),
        OsString::from("-pointsize"),
        OsString::from(options.pointsize.to_string()),
        OsString::from("-fill"),
        OsString::from(&options.fill),
        OsString::from("-undercolor"),
        OsString::from(&options.undercolor),
        OsString::from("-annotate"),
        OsString::from("0"),
        OsString::from(label),
        OsString::from("-quality"),
        OsString::from(options.quality.to_string()),
        dest.as_os_str().to_os_string(),
    ]
}

fn map_annotate_spawn_error(err: io::Error, command: &str) -> SnapError {
    if err.kind() == io::ErrorKind::NotFound {
        SnapError::annotate(format!(
            "'{}' was not found on PATH; is ImageMagick installed?",
            command
        ))
    } else {
        SnapError::Io(err)
    }
}

/// Stamps `label` onto `png` and writes the result to `dest`.
///
/// The image bytes go to the subprocess over stdin; a non-zero exit is
/// fatal and `dest` must be treated as garbage by the caller.
pub async fn annotate(png: &[u8], label: &str, dest: &Path, options: &AnnotateOptions) -> Result<()> {
    let mut cmd = Command::new(&options.command);
    cmd.args(annotate_args(label, dest, options))
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let mut child = cmd
        .spawn()
        .map_err(|err| map_annotate_spawn_error(err, &options.command))?;

    let mut stdin = child.stdin.take().ok_or_else(|| {
        SnapError::annotate(format!("stdin of '{}' is unavailable", options.command))
    })?;
    stdin.write_all(png).await.map_err(|e| {
        SnapError::annotate(format!(
            "failed to stream image to '{}': {}",
            options.command, e
        ))
    })?;
    drop(stdin);

    let output = child.wait_with_output().await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SnapError::annotate(format!(
            "'{}' exited with status {}: {}",
            options.command,
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}
