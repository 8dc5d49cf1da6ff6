//! Browser session used to render the schedule pages.
//!
//! The website builds its panels with JavaScript, so the pages are loaded in
//! Chromium and their rendered HTML is handed to the extractor.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use chromiumoxide::{
    browser::{Browser, BrowserConfig},
    page::Page,
};
use futures::StreamExt;
use tokio::{task::JoinHandle, time::Instant};
use tracing::{debug, warn};

use crate::error::Error;

/// Environment variable forcing the browser binary
pub const BROWSER_ENV: &str = "HORARIOS_CHROMIUM";

/// Delay between two checks while waiting for an element
const POLL: Duration = Duration::from_millis(100);

/// What the extractor needs from a browser
#[async_trait]
pub trait Navigator: Send {
    /// Load a page in the current tab
    async fn goto(&mut self, url: &str) -> Result<(), Error>;

    /// Go back to the previous page
    async fn back(&mut self) -> Result<(), Error>;

    /// Block until `selector` matches at least one element, or the deadline expires
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), Error>;

    /// Rendered HTML of the current page
    async fn html(&self) -> Result<String, Error>;
}

/// Find the Chromium binary
pub fn find_chromium() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(BROWSER_ENV).map(PathBuf::from) {
        if path.exists() {
            return Some(path);
        }
        warn!("{BROWSER_ENV} points to {}, which doesn't exist", path.display());
    }

    ["chromium", "chromium-browser", "google-chrome"]
        .into_iter()
        .find_map(|name| which::which(name).ok())
}

/// Chromium instance with the single tab used during the whole run
pub struct Chromium {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl Chromium {
    /// Launch the browser
    pub async fn launch(executable: &Path, headless: bool) -> Result<Self, Error> {
        let mut builder = BrowserConfig::builder()
            .chrome_executable(executable)
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(Error::Config)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // The connection only moves forward while its events are consumed
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser event error: {e}");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                Self::shutdown(browser, handler).await;
                return Err(e.into());
            }
        };

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    /// Close the browser, errors are only logged
    pub async fn close(self) {
        drop(self.page);
        Self::shutdown(self.browser, self.handler).await;
    }

    async fn shutdown(mut browser: Browser, handler: JoinHandle<()>) {
        if let Err(e) = browser.close().await {
            warn!("can't close the browser: {e}");
        }
        if let Err(e) = browser.wait().await {
            warn!("browser didn't exit cleanly: {e}");
        }
        handler.abort();
    }
}

#[async_trait]
impl Navigator for Chromium {
    async fn goto(&mut self, url: &str) -> Result<(), Error> {
        debug!("goto {url}");
        self.page
            .goto(url)
            .await
            .map_err(|e| Error::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(())
    }

    async fn back(&mut self) -> Result<(), Error> {
        debug!("back");
        self.page.evaluate("window.history.back()").await?;

        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), Error> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout {
                    selector: selector.to_owned(),
                    timeout,
                });
            }
            tokio::time::sleep(POLL).await;
        }
    }

    async fn html(&self) -> Result<String, Error> {
        Ok(self.page.content().await?)
    }
}
