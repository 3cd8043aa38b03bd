//! Browser automation for the map capture.
//!
//! The browser is driven through a Playwright capture script executed by a
//! `node` subprocess; this module owns everything on the Rust side of that
//! boundary.
//!
//! # Module Structure
//!
//! - [`profile`] - Disposable, isolated browser profile directories
//! - [`script`] - The capture script, its JSON protocol, and preflight checks
//! - [`session`] - Subprocess lifecycle: spawn, deadline, capture readback
//!
//! # Example
//!
//! ```no_run
//! use nextmap_lib::{BrowserProfile, MapSession, SessionOptions};
//! use url::Url;
//!
//! # async fn example() -> nextmap_lib::Result<()> {
//! let profile = BrowserProfile::create()?;
//! let session = MapSession::new(SessionOptions::default());
//! let url = Url::parse("https://www.nextbike.de/de/dresden/").unwrap();
//! let capture = session.capture(&profile, &url, "website-map", 3).await?;
//! println!("captured {}x{} px", capture.width, capture.height);
//! # Ok(())
//! # }
//! ```

mod profile;
mod script;
mod session;

pub use profile::BrowserProfile;
pub use session::{
    MapCapture, MapSession, SessionOptions, DEFAULT_ELEMENT_TIMEOUT, DEFAULT_PROCESS_TIMEOUT,
};

pub(crate) use session::log_progress;
