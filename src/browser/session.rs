use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::GenericImageView;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;
use url::Url;

use super::profile::BrowserProfile;
use super::script::{
    ensure_node_available, ensure_playwright_available, map_capture_error, map_script_message,
    map_spawn_error, ScriptError, ScriptReport, CAPTURE_SCRIPT,
};
use crate::{Result, SnapError, Viewport};

/// Bounded wait for the map element to become visible.
pub const DEFAULT_ELEMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Hard deadline for the whole capture subprocess.
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(120);

/// Launch and interaction settings for one capture session.
#[derive(Clone)]
pub struct SessionOptions {
    pub node_command: String,
    pub viewport: Viewport,
    pub headless: bool,
    /// Minimize the browser window; only honored together with
    /// `headless: false`.
    pub minimize: bool,
    /// Page-load timeout. `None` keeps the browser's own default.
    pub navigation_timeout: Option<Duration>,
    pub element_timeout: Duration,
    pub process_timeout: Duration,
    pub progress: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            node_command: "node".to_string(),
            viewport: Viewport::default(),
            headless: true,
            minimize: false,
            navigation_timeout: None,
            element_timeout: DEFAULT_ELEMENT_TIMEOUT,
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            progress: None,
        }
    }
}

/// Result of one successful capture: the element screenshot plus what the
/// script reported doing to get it.
#[derive(Debug, Clone)]
pub struct MapCapture {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub zoom_clicks: u32,
    pub cookie_declined: bool,
    pub elapsed: Duration,
}

/// One-shot browser session bound to a [`BrowserProfile`].
///
/// The session is a single capture-script invocation; the script closes the
/// browser context itself, and [`MapSession::capture`] kills the subprocess
/// when the process deadline expires, so no browser process survives the
/// call on any path.
#[derive(Clone)]
pub struct MapSession {
    options: SessionOptions,
}

impl MapSession {
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Runs the full in-browser sequence against `url` and returns the
    /// captured element screenshot.
    pub async fn capture(
        &self,
        profile: &BrowserProfile,
        url: &Url,
        map_selector: &str,
        zoom: u32,
    ) -> Result<MapCapture> {
        // Fail fast before paying the browser launch cost.
        ensure_node_available(&self.options.node_command).await?;
        ensure_playwright_available(&self.options.node_command).await?;

        let capture_path = profile.capture_path();
        let nav_ms = self
            .options
            .navigation_timeout
            .map(|t| t.as_millis())
            .unwrap_or(0);

        let mut cmd = Command::new(&self.options.node_command);
        cmd.arg("-e")
            .arg(CAPTURE_SCRIPT)
            .arg(profile.path())
            .arg(url.as_str())
            .arg(map_selector)
            .arg(self.options.viewport.width.to_string())
            .arg(self.options.viewport.height.to_string())
            .arg(zoom.to_string())
            .arg(nav_ms.to_string())
            .arg(self.options.element_timeout.as_millis().to_string())
            .arg(&capture_path)
            .arg(if self.options.headless { "1" } else { "0" })
            .arg(if self.options.minimize { "1" } else { "0" })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        self.log(&format!(
            "Launching {} browser for {} ({}, zoom {})…",
            if self.options.headless {
                "headless"
            } else {
                "windowed"
            },
            url,
            self.options.viewport,
            zoom
        ));

        let start = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|err| map_spawn_error(err, &self.options.node_command))?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        // Browser and driver chatter lands on these pipes; it is surfaced
        // only when the capture fails.
        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut out) = stdout_pipe {
                let _ = out.read_to_end(&mut buf).await;
            }
            buf
        });

        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut err) = stderr_pipe {
                let _ = err.read_to_end(&mut buf).await;
            }
            buf
        });

        let status = match timeout(self.options.process_timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(err)) => return Err(SnapError::Io(err)),
            Err(_) => {
                let _ = child.kill().await;
                let _ = child.wait().await;
                return Err(SnapError::Timeout(format!(
                    "capture did not finish within {:?}",
                    self.options.process_timeout
                )));
            }
        };

        let stdout = stdout_task.await.unwrap_or_else(|_| Vec::new());
        let stderr = stderr_task.await.unwrap_or_else(|_| Vec::new());

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(map_capture_error(status.to_string(), &stderr));
        }

        let stdout = String::from_utf8_lossy(&stdout);
        let report: ScriptReport = serde_json::from_str(&stdout).map_err(|e| {
            SnapError::browser(format!(
                "Unexpected capture script output: {} - raw: {}",
                e,
                stdout.trim()
            ))
        })?;

        if report.status != "ok" {
            if let Ok(err) = serde_json::from_str::<ScriptError>(&stdout) {
                return Err(map_script_message(&err.status, err.message));
            }
            return Err(SnapError::browser(format!(
                "Capture script returned non-ok status: {}",
                report.status
            )));
        }

        let png = std::fs::read(&capture_path).map_err(|e| {
            SnapError::browser(format!(
                "Capture script reported success but the capture file is unreadable: {}",
                e
            ))
        })?;
        let (width, height) = image::load_from_memory(&png)?.dimensions();

        self.log(&format!(
            "Captured {}x{} map image in {:.1}s",
            width,
            height,
            start.elapsed().as_secs_f32()
        ));

        Ok(MapCapture {
            width,
            height,
            png,
            zoom_clicks: report.zoom_clicks,
            cookie_declined: report.cookie_declined,
            elapsed: start.elapsed(),
        })
    }

    fn log(&self, message: &str) {
        log_progress(&self.options.progress, message);
    }
}

pub(crate) fn log_progress(progress: &Option<Arc<dyn Fn(&str) + Send + Sync>>, message: &str) {
    if let Some(cb) = progress {
        cb(message);
    }
}
