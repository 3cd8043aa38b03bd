//! nextmap library
//!
//! Captures a screenshot of the Dresden nextbike map: an ephemeral browser
//! profile, a Playwright-driven capture of the `<website-map>` element, an
//! ImageMagick timestamp overlay, and an atomic rename onto the destination
//! path.
//!
//! # Module Overview
//!
//! - [`browser`] - Profile lifecycle and the capture subprocess
//! - [`annotate`] - Timestamp overlay via ImageMagick `convert`
//! - [`publish`] - Temp-file-then-rename publication
//! - [`pipeline`] - The whole run wired together
//! - [`config`] - TOML config defaults
//! - [`error`] - Error taxonomy and remediation hints
//! - [`viewport`] - Capture window dimensions
//!
//! # Example
//!
//! ```no_run
//! use nextmap_lib::{run_snapshot, AnnotateOptions, SessionOptions, SnapshotOptions};
//! use url::Url;
//!
//! # async fn example() -> nextmap_lib::Result<()> {
//! let report = run_snapshot(SnapshotOptions {
//!     url: Url::parse("https://www.nextbike.de/de/dresden/").unwrap(),
//!     out: "map.png".into(),
//!     zoom: 3,
//!     session: SessionOptions::default(),
//!     annotate: AnnotateOptions::default(),
//!     keep_profile: false,
//!     progress: None,
//! })
//! .await?;
//! println!("published {} ({}x{})", report.out.display(), report.width, report.height);
//! # Ok(())
//! # }
//! ```

pub mod annotate;
pub mod browser;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod publish;
pub mod viewport;

pub use annotate::{annotate, timestamp_label, AnnotateOptions, TIMESTAMP_FORMAT};
pub use browser::{
    BrowserProfile, MapCapture, MapSession, SessionOptions, DEFAULT_ELEMENT_TIMEOUT,
    DEFAULT_PROCESS_TIMEOUT,
};
pub use config::{Config, Timeouts, DEFAULT_URL, DEFAULT_ZOOM};
pub use error::{Result, SnapError};
pub use pipeline::{run_snapshot, SnapshotOptions, SnapshotReport, MAP_SELECTOR};
pub use publish::publish;
pub use viewport::Viewport;
