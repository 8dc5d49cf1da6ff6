use std::{path::PathBuf, time::Duration};

use chromiumoxide::error::CdpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No usable Chromium binary on this machine
    #[error("Chromium not found, install it with `sudo apt install chromium` or `sudo apt install chromium-browser`")]
    BrowserNotFound,

    #[error("invalid browser configuration: {0}")]
    Config(String),

    #[error("browser error: {0}")]
    Cdp(#[from] CdpError),

    /// Deadline expired before the selector matched anything
    #[error("timed out after {}s waiting for `{selector}`", timeout.as_secs_f32())]
    Timeout { selector: String, timeout: Duration },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("invalid course link `{href}`: {source}")]
    Link {
        href: String,
        #[source]
        source: url::ParseError,
    },

    #[error("can't write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
