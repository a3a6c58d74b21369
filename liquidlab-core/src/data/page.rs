//! HTML page sources for the scraped datasets.
//!
//! A page source turns a URL into rendered HTML. The plain HTTP source is the
//! default; pages that only build their tables in JavaScript need the headless
//! Chrome source behind the `browser` feature.

use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors from fetching a page or extracting its table.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("browser session failed: {0}")]
    Browser(String),

    #[error("no tables found on the page")]
    NoTable,

    #[error("invalid selector: {0}")]
    Selector(String),
}

/// Something that can fetch the HTML of a page.
pub trait PageSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the page and return its HTML.
    fn fetch_html(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Blocking HTTP page source. Sees only the server-rendered markup.
pub struct HttpPageSource {
    client: reqwest::blocking::Client,
}

impl HttpPageSource {
    pub fn new() -> Result<Self, ScrapeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| ScrapeError::Request {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        let request_err = |e: reqwest::Error| ScrapeError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        };

        debug!(url, "fetching page");
        let resp = self.client.get(url).send().map_err(request_err)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        resp.text().map_err(request_err)
    }
}

/// Headless Chrome page source.
///
/// Each call launches its own browser, waits `render_wait` after navigation so
/// scripts can build the tables, and tears the browser down before returning,
/// whether or not the fetch succeeded.
#[cfg(feature = "browser")]
pub struct ChromePageSource {
    render_wait: Duration,
}

#[cfg(feature = "browser")]
impl ChromePageSource {
    pub fn new(render_wait: Duration) -> Self {
        Self { render_wait }
    }
}

#[cfg(feature = "browser")]
impl PageSource for ChromePageSource {
    fn name(&self) -> &str {
        "headless_chrome"
    }

    fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        use headless_chrome::{Browser, LaunchOptions};

        let browser_err = |e: &dyn std::fmt::Display| ScrapeError::Browser(e.to_string());

        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .build()
            .map_err(|e| browser_err(&e))?;
        let browser = Browser::new(options).map_err(|e| browser_err(&e))?;
        let tab = browser.new_tab().map_err(|e| browser_err(&e))?;

        tab.navigate_to(url).map_err(|e| browser_err(&e))?;
        tab.wait_until_navigated().map_err(|e| browser_err(&e))?;
        debug!(url, wait_secs = self.render_wait.as_secs(), "waiting for page scripts");
        std::thread::sleep(self.render_wait);

        tab.get_content().map_err(|e| browser_err(&e))
    }
}
