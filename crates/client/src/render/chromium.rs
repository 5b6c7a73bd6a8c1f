//! Headless Chrome/Chromium renderer using chromiumoxide.

use std::time::{Duration, Instant};

use chromiumoxide::Page;
use url::Url;

use super::{RenderError, RenderRequest, RenderedPage, Renderer};

/// Time given to client-side scripts after navigation before the DOM is read.
const SETTLE_DELAY: Duration = Duration::from_millis(2000);

/// Headless Chrome/Chromium renderer.
pub struct HeadlessRenderer {
    browser: chromiumoxide::Browser,
}

impl HeadlessRenderer {
    /// Launch a headless browser instance.
    ///
    /// A background task drives the Chrome DevTools Protocol event stream for
    /// the lifetime of the browser.
    pub async fn launch() -> Result<Self, RenderError> {
        use chromiumoxide::browser::{Browser, BrowserConfig};
        use futures_util::StreamExt;

        let (browser, mut handler) =
            Browser::launch(BrowserConfig::builder().build().map_err(RenderError::Launch)?)
                .await
                .map_err(|e| RenderError::Launch(e.to_string()))?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        Ok(Self { browser })
    }

    /// Read the settled DOM and final URL of an open tab.
    async fn snapshot(page: &Page, url: &Url) -> Result<(String, Url), RenderError> {
        tokio::time::sleep(SETTLE_DELAY).await;

        let html = page
            .content()
            .await
            .map_err(|e| RenderError::Process(e.to_string()))?;

        let page_url = page
            .url()
            .await
            .map_err(|e| RenderError::Process(e.to_string()))?;

        let final_url = Url::parse(page_url.as_deref().unwrap_or(url.as_str()))
            .map_err(|e| RenderError::Navigation(e.to_string()))?;

        Ok((html, final_url))
    }
}

#[async_trait::async_trait]
impl Renderer for HeadlessRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<RenderedPage, RenderError> {
        let start = Instant::now();
        let timed_out = |_| RenderError::Timeout(request.timeout_ms());

        let page = tokio::time::timeout(request.timeout, self.browser.new_page(request.url.as_str()))
            .await
            .map_err(timed_out)?
            .map_err(|e| RenderError::Navigation(e.to_string()))?;

        let remaining = request.timeout.saturating_sub(start.elapsed());
        let snapshot = tokio::time::timeout(remaining, Self::snapshot(&page, &request.url))
            .await
            .map_err(timed_out)
            .and_then(|result| result);

        // Close the tab on every exit path; the browser is shared across requests.
        if let Err(e) = page.close().await {
            tracing::debug!(url = %request.url, "failed to close tab: {e}");
        }

        let (html, final_url) = snapshot?;
        if html.len() > request.max_bytes {
            return Err(RenderError::BufferExceeded(request.max_bytes));
        }

        let render_time_ms = start.elapsed().as_millis() as u64;
        Ok(RenderedPage { html, final_url, render_time_ms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires Chrome/Chromium installation"]
    async fn test_headless_renderer_launch() {
        let renderer = HeadlessRenderer::launch().await;
        assert!(renderer.is_ok());
    }

    #[tokio::test]
    #[ignore = "requires network and Chrome/Chromium"]
    async fn test_render_respects_buffer_limit() {
        let renderer = HeadlessRenderer::launch().await.unwrap();
        let request = RenderRequest {
            url: Url::parse("https://example.com").unwrap(),
            timeout: Duration::from_secs(30),
            max_bytes: 16,
        };

        let result = renderer.render(&request).await;
        assert!(matches!(result, Err(RenderError::BufferExceeded(16))));
    }

    #[tokio::test]
    #[ignore = "requires Chrome/Chromium installation"]
    async fn test_timed_out_render_closes_tab() {
        let renderer = HeadlessRenderer::launch().await.unwrap();
        let open_tabs = renderer.browser.pages().await.unwrap().len();
        let request = RenderRequest {
            url: Url::parse("about:blank").unwrap(),
            timeout: SETTLE_DELAY / 2,
            max_bytes: 1024,
        };

        let result = renderer.render(&request).await;

        assert!(matches!(result, Err(RenderError::Timeout(_))));
        assert_eq!(renderer.browser.pages().await.unwrap().len(), open_tabs);
    }
}
