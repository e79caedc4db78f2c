//! # Headless-Chrome session.
//!
//! [`BrowserSession`] owns one headless Chrome instance, its CDP event
//! driver task, and one page that is **reused for every route**. Reuse keeps
//! per-route cost at navigation level instead of page-creation level; the
//! trade-off is that client-side state can leak between routes, which is
//! acceptable for stateless prerendering.
//!
//! A navigation is considered settled when the load completes and the
//! configured quiescence window has elapsed on top, letting client-side
//! fetches that fire after the load event finish before capture.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::core::navigate::Navigate;
use crate::error::PrerenderError;

/// One headless Chrome with a single reusable page.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    driver: JoinHandle<()>,
    settle: Duration,
}

impl BrowserSession {
    /// Launches headless Chrome and opens the reusable page.
    ///
    /// `settle` is the extra quiescence window applied after every
    /// navigation before the page is captured.
    pub async fn launch(settle: Duration) -> Result<Self, PrerenderError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(|reason| PrerenderError::BrowserLaunch { reason })?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| PrerenderError::BrowserLaunch {
                reason: e.to_string(),
            })?;

        // The handler stream must be polled for the CDP connection to make
        // progress; it ends when the browser goes away.
        let driver = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| PrerenderError::BrowserLaunch {
                reason: e.to_string(),
            })?;

        tracing::info!("headless browser ready");
        Ok(Self {
            browser,
            page,
            driver,
            settle,
        })
    }
}

#[async_trait]
impl Navigate for BrowserSession {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<String, PrerenderError> {
        let capture = async {
            self.page
                .goto(url)
                .await
                .map_err(|e| PrerenderError::NavigationFailure {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| PrerenderError::NavigationFailure {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
            if !self.settle.is_zero() {
                tokio::time::sleep(self.settle).await;
            }
            self.page
                .content()
                .await
                .map_err(|e| PrerenderError::NavigationFailure {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
        };

        match tokio::time::timeout(timeout, capture).await {
            Ok(result) => result,
            Err(_) => Err(PrerenderError::NavigationTimeout {
                url: url.to_string(),
                timeout,
            }),
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!(error = %e, "browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!(error = %e, "waiting for browser exit failed");
        }
        self.driver.abort();
        tracing::debug!("browser closed");
    }

    async fn kill(&mut self) {
        if let Some(Err(e)) = self.browser.kill().await {
            tracing::warn!(error = %e, "browser kill failed");
        }
        self.driver.abort();
        tracing::debug!("browser killed");
    }
}
