//! The inline Playwright capture script and its process-boundary plumbing:
//! the JSON status protocol, node/playwright preflight checks, and the
//! mapping from subprocess failures to [`SnapError`] values.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::{Result, SnapError};

/// Playwright script that performs the whole in-browser sequence: open a
/// persistent context on the run's profile directory, navigate, wait for the
/// map element, decline the cookie banner when present, zoom in through the
/// component's shadow root, and screenshot the element to the capture path.
///
/// argv: user-data-dir, url, map selector, width, height, zoom steps,
/// nav timeout ms (0 = browser default), wait timeout ms, capture path,
/// headless flag, minimize flag.
///
/// The cookie banner is best-effort: it only shows up on the first visit of
/// a profile, so absence is the normal case and never an error. Everything
/// else that is missing is fatal. The context is closed in `finally` so the
/// browser never outlives the script.
pub(crate) const CAPTURE_SCRIPT: &str = r#"
const [, userDataDir, url, mapSelector, width, height, zoomSteps, navTimeout, waitTimeout, capturePath, headlessFlag, minimizeFlag] = process.argv;

async function run() {
  let context;
  try {
    const { chromium } = require('playwright');
    const headless = headlessFlag !== '0';
    const args = [];
    if (!headless && minimizeFlag === '1') {
      args.push('--start-minimized');
    }
    context = await chromium.launchPersistentContext(userDataDir, {
      headless,
      args,
      viewport: {
        width: parseInt(width, 10),
        height: parseInt(height, 10)
      }
    });
    const page = context.pages()[0] || await context.newPage();
    const navMs = parseInt(navTimeout, 10);
    if (navMs > 0) {
      page.setDefaultNavigationTimeout(navMs);
    }

    await page.goto(url);

    const map = page.locator(mapSelector).first();
    try {
      await map.waitFor({ state: 'visible', timeout: parseInt(waitTimeout, 10) });
    } catch (err) {
      const detail = err && err.message ? err.message : String(err);
      throw new Error(`map element ${mapSelector} did not become visible: ${detail}`);
    }

    let cookieDeclined = false;
    const decline = page.locator('.cookie-notice .cn-decline');
    if (await decline.count() > 0) {
      await decline.first().click();
      cookieDeclined = true;
    }

    const mapHandle = await map.elementHandle();
    const zoomHandle = await mapHandle.evaluateHandle(
      el => el.shadowRoot && el.shadowRoot.querySelector('.leaflet-control-zoom-in')
    );
    const zoomIn = zoomHandle.asElement();
    if (!zoomIn) {
      throw new Error(`zoom-in control not found in the ${mapSelector} shadow root`);
    }
    const steps = parseInt(zoomSteps, 10);
    for (let i = 0; i < steps; i++) {
      await zoomIn.click();
    }

    await mapHandle.screenshot({ path: capturePath });

    console.log(JSON.stringify({ status: 'ok', cookieDeclined, zoomClicks: steps }));
  } catch (err) {
    const message = err && err.message ? err.message : String(err);
    console.error(JSON.stringify({ status: 'error', message }));
    process.exitCode = 1;
  } finally {
    if (context) {
      await context.close();
    }
  }
}

run();
"#;

/// Timeout for the node/playwright preflight checks.
pub(crate) const PREFLIGHT_TIMEOUT: Duration = Duration::from_secs(5);

/// Script to check that Playwright is installed.
const PLAYWRIGHT_CHECK_SCRIPT: &str = "require('playwright'); process.stdout.write('ok');";

/// Success report printed by the capture script on stdout.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScriptReport {
    pub status: String,
    #[serde(default)]
    pub cookie_declined: bool,
    #[serde(default)]
    pub zoom_clicks: u32,
}

/// Error report printed by the capture script on stderr.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ScriptError {
    pub status: String,
    pub message: String,
}

/// Maps a spawn failure of the capture helper to a [`SnapError`].
pub(crate) fn map_spawn_error(err: io::Error, command: &str) -> SnapError {
    if err.kind() == io::ErrorKind::NotFound {
        SnapError::browser(format!(
            "Unable to spawn the capture helper; '{}' was not found on PATH",
            command
        ))
    } else {
        SnapError::Io(err)
    }
}

/// Maps the capture script's stderr to a [`SnapError`], preferring the JSON
/// error report when one is present.
pub(crate) fn map_capture_error(status_text: impl Into<String>, stderr: &str) -> SnapError {
    if let Ok(error) = serde_json::from_str::<ScriptError>(stderr) {
        return map_script_message(&error.status, error.message);
    }

    if stderr
        .to_ascii_lowercase()
        .contains("cannot find module 'playwright'")
    {
        return missing_playwright();
    }

    SnapError::browser(format!(
        "Capture script exited with status {}: {}",
        status_text.into(),
        stderr.trim()
    ))
}

/// Maps an error message reported by the capture script itself.
pub(crate) fn map_script_message(status: &str, message: String) -> SnapError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("cannot find module 'playwright'") {
        missing_playwright()
    } else if lower.contains("did not become visible")
        || lower.contains("zoom-in control not found")
    {
        SnapError::Browser(message)
    } else {
        SnapError::browser(format!("Capture script error (status {}): {}", status, message))
    }
}

fn missing_playwright() -> SnapError {
    SnapError::browser(
        "Playwright npm package is missing; install with `npm install playwright`.",
    )
}

/// Ensures the node binary can be executed.
pub(crate) async fn ensure_node_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let status = tokio::time::timeout(PREFLIGHT_TIMEOUT, cmd.status())
        .await
        .map_err(|_| {
            SnapError::Timeout(format!(
                "checking node availability took longer than {:?}",
                PREFLIGHT_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !status.success() {
        return Err(SnapError::browser(format!(
            "Node command {:?} is not available (exit {})",
            node_command, status
        )));
    }

    Ok(())
}

/// Ensures the Playwright npm package resolves from the node binary.
pub(crate) async fn ensure_playwright_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("-e")
        .arg(PLAYWRIGHT_CHECK_SCRIPT)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let output = tokio::time::timeout(PREFLIGHT_TIMEOUT, cmd.output())
        .await
        .map_err(|_| {
            SnapError::Timeout(format!(
                "checking Playwright availability took longer than {:?}",
                PREFLIGHT_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(map_capture_error(format!("{:?}", output.status), &stderr));
    }

    Ok(())
}
