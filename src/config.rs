use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{Result, SnapError, Viewport};

/// The map page the snapshot is taken from.
pub const DEFAULT_URL: &str = "https://www.nextbike.de/de/dresden/";

/// Default number of zoom-in clicks issued against the map.
pub const DEFAULT_ZOOM: u32 = 3;

/// File-backed defaults; every field can be overridden on the command line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub url: String,
    pub viewport: Viewport,
    pub zoom: u32,
    pub node_command: String,
    pub convert_command: String,
    pub timeouts: Timeouts,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    /// Page-load timeout. `None` leaves the browser's own default in place.
    #[serde(with = "humantime_serde")]
    pub navigation: Option<Duration>,
    /// Bounded wait for the map element to become visible.
    #[serde(with = "humantime_serde")]
    pub element_wait: Duration,
    /// Hard deadline for the whole capture subprocess.
    #[serde(with = "humantime_serde")]
    pub process: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: None,
            element_wait: Duration::from_secs(30),
            process: Duration::from_secs(120),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            viewport: Viewport::default(),
            zoom: DEFAULT_ZOOM,
            node_command: "node".to_string(),
            convert_command: "convert".to_string(),
            timeouts: Timeouts::default(),
        }
    }
}

impl Config {
    /// Reads a TOML config from `path`, or returns defaults when no path is
    /// given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|e| {
            SnapError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&raw).map_err(|e| {
            SnapError::Config(format!("Invalid config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }
}
