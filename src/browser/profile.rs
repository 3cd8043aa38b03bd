use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::Result;

/// Disposable browser profile backing a single run.
///
/// The directory is created fresh under the system temp dir and handed to
/// the browser as its user data dir, so cookies and caches never leak
/// between runs. Dropping the profile deletes the directory recursively on
/// every exit path; deletion failures are swallowed so cleanup cannot
/// shadow the error that ended the run.
#[derive(Debug)]
pub struct BrowserProfile {
    dir: TempDir,
}

impl BrowserProfile {
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("nextmap-profile-")
            .tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path for the intermediate element screenshot. Lives inside the
    /// profile directory so it is removed together with the profile.
    pub fn capture_path(&self) -> PathBuf {
        self.dir.path().join("map-capture.png")
    }

    /// Detaches the backing directory so it survives the run
    /// (`--keep-profile`). The caller becomes responsible for deletion.
    #[allow(deprecated)]
    pub fn into_path(self) -> PathBuf {
        self.dir.into_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_makes_fresh_directory() {
        let profile = BrowserProfile::create().unwrap();
        assert!(profile.path().is_dir());
        assert!(profile
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("nextmap-profile-"));
    }

    #[test]
    fn capture_path_is_inside_profile() {
        let profile = BrowserProfile::create().unwrap();
        assert_eq!(profile.capture_path().parent().unwrap(), profile.path());
    }

    #[test]
    fn drop_removes_directory() {
        let profile = BrowserProfile::create().unwrap();
        let path = profile.path().to_path_buf();
        drop(profile);
        assert!(!path.exists());
    }

    #[test]
    fn into_path_keeps_directory() {
        let profile = BrowserProfile::create().unwrap();
        let kept = profile.into_path();
        assert!(kept.is_dir());
        std::fs::remove_dir_all(&kept).unwrap();
    }

    #[test]
    fn profiles_are_isolated_from_each_other() {
        let a = BrowserProfile::create().unwrap();
        let b = BrowserProfile::create().unwrap();
        assert_ne!(a.path(), b.path());
    }
}
