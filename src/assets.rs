//! Asset acquisition: logo fetch and chart snapshots.
//!
//! Both operations degrade gracefully.  A failed logo fetch or chart capture
//! yields `None` and a log entry instead of an error, so the document still
//! renders without that asset.  Captures for independent chart requests run
//! concurrently; the exporter awaits the whole batch before composing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::branding::BrandingConfig;
use crate::elements::decode_image_from_bytes;
use crate::model::{ChartCaptureRequest, ChartImage};

/// Capability to rasterize a live chart into a PNG.
///
/// The core does not own chart rendering; hosts inject whatever can turn an
/// element id into image bytes.  Implementations are expected to capture at
/// 2x scale on an opaque white background so embedded charts stay sharp in
/// print.  A missing element or a rasterization failure maps to `None`.
#[async_trait]
pub trait ChartSnapshotProvider: Send + Sync {
    async fn capture(&self, element_id: &str) -> Option<Vec<u8>>;
}

/// Snapshot provider backed by pre-rendered images.
///
/// Serves callers that already hold encoded chart PNGs and bypass live
/// capture, and doubles as the test fake.
#[derive(Clone, Debug, Default)]
pub struct StaticChartProvider {
    images: HashMap<String, Vec<u8>>,
}

impl StaticChartProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an image under an element id.
    pub fn with_image(mut self, element_id: impl Into<String>, png: impl Into<Vec<u8>>) -> Self {
        self.images.insert(element_id.into(), png.into());
        self
    }
}

#[async_trait]
impl ChartSnapshotProvider for StaticChartProvider {
    async fn capture(&self, element_id: &str) -> Option<Vec<u8>> {
        self.images.get(element_id).cloned()
    }
}

/// Resolves the binary assets a document embeds.
pub struct AssetFetcher {
    client: reqwest::Client,
    logo_url: String,
    charts: Arc<dyn ChartSnapshotProvider>,
}

impl AssetFetcher {
    pub fn new(logo_url: impl Into<String>, charts: Arc<dyn ChartSnapshotProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            logo_url: logo_url.into(),
            charts,
        }
    }

    /// Builds a fetcher resolving the logo per the branding origin.
    pub fn for_branding(branding: &BrandingConfig, charts: Arc<dyn ChartSnapshotProvider>) -> Self {
        Self::new(branding.resolve_logo_url(), charts)
    }

    /// Fetches the company logo, or `None` if anything goes wrong.
    ///
    /// The body is run through an image decode so a misbehaving endpoint
    /// (HTML error page, truncated body) is caught here rather than at
    /// render time.
    pub async fn fetch_logo(&self) -> Option<Vec<u8>> {
        let response = match self
            .client
            .get(&self.logo_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
        {
            Ok(response) => response,
            Err(err) => {
                log::warn!("logo fetch failed for {}: {err}", self.logo_url);
                return None;
            }
        };

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("logo body read failed for {}: {err}", self.logo_url);
                return None;
            }
        };

        match decode_image_from_bytes(&bytes) {
            Ok(_) => Some(bytes.to_vec()),
            Err(err) => {
                log::warn!("logo at {} is not a decodable image: {err}", self.logo_url);
                None
            }
        }
    }

    /// Captures one chart, pairing the snapshot with its caption.
    pub async fn capture_chart(&self, request: &ChartCaptureRequest) -> Option<ChartImage> {
        match self.charts.capture(&request.element_id).await {
            Some(png) => Some(ChartImage::new(request.title.clone(), png)),
            None => {
                log::debug!("chart capture skipped, no snapshot for {}", request.element_id);
                None
            }
        }
    }

    /// Captures a batch of charts concurrently.
    ///
    /// Failed captures are dropped; the successful subset keeps the caller's
    /// request order.
    pub async fn capture_charts(&self, requests: &[ChartCaptureRequest]) -> Vec<ChartImage> {
        let captures = requests.iter().map(|request| self.capture_chart(request));
        futures::future::join_all(captures)
            .await
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_with(ids: &[&str]) -> Arc<dyn ChartSnapshotProvider> {
        let mut provider = StaticChartProvider::new();
        for id in ids {
            provider = provider.with_image(*id, vec![0u8; 4]);
        }
        Arc::new(provider)
    }

    #[tokio::test]
    async fn missing_elements_are_dropped_not_failed() {
        let fetcher = AssetFetcher::new("http://unused.invalid/logo.png", provider_with(&["a", "c"]));
        let requests = vec![
            ChartCaptureRequest::new("Chart A", "a"),
            ChartCaptureRequest::new("Chart B", "b"),
            ChartCaptureRequest::new("Chart C", "c"),
        ];

        let images = fetcher.capture_charts(&requests).await;

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].title, "Chart A");
        assert_eq!(images[1].title, "Chart C");
    }

    #[tokio::test]
    async fn capture_order_follows_the_request_order() {
        let fetcher = AssetFetcher::new(
            "http://unused.invalid/logo.png",
            provider_with(&["x", "y", "z"]),
        );
        let requests = vec![
            ChartCaptureRequest::new("Z", "z"),
            ChartCaptureRequest::new("X", "x"),
            ChartCaptureRequest::new("Y", "y"),
        ];

        let titles: Vec<String> = fetcher
            .capture_charts(&requests)
            .await
            .into_iter()
            .map(|image| image.title)
            .collect();

        assert_eq!(titles, vec!["Z", "X", "Y"]);
    }

    #[tokio::test]
    async fn unreachable_logo_yields_none() {
        let fetcher = AssetFetcher::new("not a url", provider_with(&[]));
        assert!(fetcher.fetch_logo().await.is_none());
    }
}
