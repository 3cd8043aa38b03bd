use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum SnapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Annotation error: {0}")]
    Annotate(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl SnapError {
    pub fn browser(message: impl Into<String>) -> Self {
        SnapError::Browser(message.into())
    }

    pub fn annotate(message: impl Into<String>) -> Self {
        SnapError::Annotate(message.into())
    }

    /// One-line fix suggestion printed under the error message, when the
    /// failure has a known cause on the operator's side.
    pub fn remediation(&self) -> Option<String> {
        match self {
            SnapError::Browser(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("playwright npm package is missing") {
                    Some(
                        "Install Playwright (`npm install playwright` and `npx playwright install chromium`)."
                            .to_string(),
                    )
                } else if lower.contains("chromium executable") {
                    Some(
                        "Run `npx playwright install chromium` to download the browser."
                            .to_string(),
                    )
                } else if lower.contains("not found on path") {
                    Some(
                        "Install Node.js and ensure the node binary is on PATH.".to_string(),
                    )
                } else if lower.contains("did not become visible") {
                    Some(
                        "The map page may be slow or unreachable; raise --wait-timeout or check the URL."
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            SnapError::Timeout(_) => Some(
                "Raise --process-timeout, or --nav-timeout/--wait-timeout if navigation is the slow part."
                    .to_string(),
            ),
            SnapError::Annotate(msg) => {
                if msg.to_ascii_lowercase().contains("not found on path") {
                    Some("Install ImageMagick so the `convert` command is available.".to_string())
                } else {
                    None
                }
            }
            SnapError::InvalidUrl(_) => {
                Some("Pass a full URL (e.g., https://www.nextbike.de/de/dresden/).".to_string())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SnapError>;
