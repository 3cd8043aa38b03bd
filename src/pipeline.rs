//! The whole run, start to published file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use url::Url;

use crate::annotate::{timestamp_label, AnnotateOptions};
use crate::browser::{log_progress, BrowserProfile, MapSession, SessionOptions};
use crate::publish::publish;
use crate::Result;

/// Tag name of the custom map element on the nextbike page.
pub const MAP_SELECTOR: &str = "website-map";

#[derive(Clone)]
pub struct SnapshotOptions {
    pub url: Url,
    pub out: PathBuf,
    pub zoom: u32,
    pub session: SessionOptions,
    pub annotate: AnnotateOptions,
    /// Keep the profile directory on disk for inspection instead of
    /// deleting it.
    pub keep_profile: bool,
    pub progress: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

#[derive(Debug, Clone)]
pub struct SnapshotReport {
    pub out: PathBuf,
    pub width: u32,
    pub height: u32,
    pub zoom_clicks: u32,
    pub cookie_declined: bool,
    pub elapsed: Duration,
    /// Set when the profile directory was kept (`keep_profile`).
    pub profile_dir: Option<PathBuf>,
}

/// Captures the map, stamps it, and atomically publishes it to
/// `options.out`.
///
/// Cleanup runs in state order: the browser closes inside the capture call,
/// and the profile directory is released before post-processing starts, so
/// a failure in any later stage leaves nothing behind but the untouched
/// destination.
pub async fn run_snapshot(options: SnapshotOptions) -> Result<SnapshotReport> {
    let progress = options.progress.clone();

    let profile = BrowserProfile::create()?;
    log_progress(
        &progress,
        &format!("Created browser profile at {}", profile.path().display()),
    );

    let mut session_options = options.session.clone();
    session_options.progress = progress.clone();
    let session = MapSession::new(session_options);

    let capture = session
        .capture(&profile, &options.url, MAP_SELECTOR, options.zoom)
        .await;

    let profile_dir = if options.keep_profile {
        let kept = profile.into_path();
        log_progress(&progress, &format!("Keeping profile at {}", kept.display()));
        Some(kept)
    } else {
        drop(profile);
        None
    };

    let capture = capture?;

    let label = timestamp_label(Local::now());
    publish(&capture.png, &options.out, &label, &options.annotate).await?;
    log_progress(&progress, &format!("Published {}", options.out.display()));

    Ok(SnapshotReport {
        out: options.out,
        width: capture.width,
        height: capture.height,
        zoom_clicks: capture.zoom_clicks,
        cookie_declined: capture.cookie_declined,
        elapsed: capture.elapsed,
        profile_dir,
    })
}
