//! One-time theme install.

use log::{debug, info};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::fetch::Fetch;

pub const THEME_URL: &str = "https://raw.githubusercontent.com/catppuccin/qutebrowser/main/setup.py";

const THEME_FILE: &str = "theme.py";

/// Download the theme into `config_dir` unless it is already installed.
/// Returns whether a download happened.
pub fn ensure_theme(config_dir: &Path, url: &str, fetch: &dyn Fetch) -> Result<bool> {
    let target = config_dir.join(THEME_FILE);
    if target.exists() {
        debug!("theme already installed: {}", target.display());
        return Ok(false);
    }

    info!("downloading theme from {url}");
    let body = fetch.get(url)?;
    fs::create_dir_all(config_dir)?;
    fs::write(&target, body)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    struct CannedFetch(&'static str);

    impl Fetch for CannedFetch {
        fn get(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct PanicFetch;

    impl Fetch for PanicFetch {
        fn get(&self, url: &str) -> Result<String> {
            panic!("unexpected fetch of {url}");
        }
    }

    #[test]
    fn downloads_when_absent() {
        let dir = tempdir().unwrap();
        let installed = ensure_theme(dir.path(), "https://theme.example/setup.py", &CannedFetch("# theme")).unwrap();
        assert!(installed);
        assert_eq!(
            fs::read_to_string(dir.path().join("theme.py")).unwrap(),
            "# theme"
        );
    }

    #[test]
    fn skips_when_present() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("theme.py"), "# existing").unwrap();
        let installed = ensure_theme(dir.path(), "https://theme.example/setup.py", &PanicFetch).unwrap();
        assert!(!installed);
        // Existing install is never overwritten.
        assert_eq!(
            fs::read_to_string(dir.path().join("theme.py")).unwrap(),
            "# existing"
        );
    }

    #[test]
    fn download_failure_propagates() {
        struct FailFetch;
        impl Fetch for FailFetch {
            fn get(&self, url: &str) -> Result<String> {
                Err(Error::NetworkFailure(format!("{url}: unreachable")))
            }
        }

        let dir = tempdir().unwrap();
        let err = ensure_theme(dir.path(), "https://theme.example/setup.py", &FailFetch).unwrap_err();
        assert!(matches!(err, Error::NetworkFailure(_)));
        assert!(!dir.path().join("theme.py").exists());
    }
}
