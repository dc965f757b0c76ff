//! Blocking HTTP fetch behind a trait seam.

use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("quteinit/", env!("CARGO_PKG_VERSION"));

pub trait Fetch {
    /// GET `url` and return the response body as text.
    fn get(&self, url: &str) -> Result<String>;
}

/// Live client. Any transport or read failure is fatal for the caller.
pub struct HttpFetch;

impl Fetch for HttpFetch {
    fn get(&self, url: &str) -> Result<String> {
        let response = ureq::get(url)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| Error::NetworkFailure(format!("{url}: {e}")))?;
        response
            .into_string()
            .map_err(|e| Error::NetworkFailure(format!("{url}: {e}")))
    }
}
