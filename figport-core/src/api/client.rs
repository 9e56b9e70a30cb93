use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;

use crate::document::model::DesignFile;
use crate::foundation::core::ImageFormat;
use crate::foundation::error::{FigportError, FigportResult};

const FILES_URL: &str = "https://api.figma.com/v1/files/";
const IMAGES_URL: &str = "https://api.figma.com/v1/images/";
const AUTH_HEADER: &str = "X-Figma-Token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote design API consumed by the importer.
///
/// HTTP 429 on any call surfaces as [`FigportError::RateLimited`] so the
/// pipeline's backoff loop can retry the same step; other non-success
/// statuses surface as [`FigportError::Transport`].
#[async_trait::async_trait]
pub trait DesignApi: Send + Sync {
    /// Fetch and decode the document for a file key.
    async fn fetch_file(&self, file_key: &str) -> FigportResult<DesignFile>;

    /// Resolve an image reference to a downloadable URL.
    ///
    /// Returns `None` when the endpoint answered but carried no URL for the
    /// reference.
    async fn resolve_image_url(
        &self,
        file_key: &str,
        image_ref: &str,
        format: ImageFormat,
    ) -> FigportResult<Option<String>>;

    /// Download the full body of a resolved image URL.
    async fn download(&self, url: &str) -> FigportResult<Vec<u8>>;
}

/// Shape of the image-export endpoint response.
#[derive(Debug, serde::Deserialize)]
struct ImageUrlMap {
    #[serde(default)]
    images: HashMap<String, Option<String>>,
}

/// reqwest-backed [`DesignApi`] for the public Figma endpoints.
pub struct FigmaClient {
    client: reqwest::Client,
    token: String,
    files_url: String,
    images_url: String,
}

impl FigmaClient {
    /// Build a client authenticating with the given personal access token.
    pub fn new(token: impl Into<String>) -> FigportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            token: token.into(),
            files_url: FILES_URL.to_string(),
            images_url: IMAGES_URL.to_string(),
        })
    }

    /// Override the files and images endpoints (fixtures, proxies).
    pub fn with_endpoints(
        mut self,
        files_url: impl Into<String>,
        images_url: impl Into<String>,
    ) -> Self {
        self.files_url = files_url.into();
        self.images_url = images_url.into();
        self
    }

    async fn get_authed(&self, url: &str) -> FigportResult<reqwest::Response> {
        let resp = self
            .client
            .get(url)
            .header(AUTH_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| FigportError::transport(format!("GET {url}: {e}")))?;
        check_status(url, resp)
    }
}

fn check_status(url: &str, resp: reqwest::Response) -> FigportResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(FigportError::rate_limited(format!("GET {url}")));
    }
    Err(FigportError::transport(format!("GET {url} returned {status}")))
}

#[async_trait::async_trait]
impl DesignApi for FigmaClient {
    async fn fetch_file(&self, file_key: &str) -> FigportResult<DesignFile> {
        let url = format!("{}{}", self.files_url, file_key);
        let resp = self.get_authed(&url).await?;
        resp.json::<DesignFile>()
            .await
            .map_err(|e| FigportError::serde(format!("decode file response: {e}")))
    }

    async fn resolve_image_url(
        &self,
        file_key: &str,
        image_ref: &str,
        format: ImageFormat,
    ) -> FigportResult<Option<String>> {
        let url = format!(
            "{}{}?ids={}&format={}",
            self.images_url,
            file_key,
            image_ref,
            format.as_query()
        );
        let resp = self.get_authed(&url).await?;
        let map = resp
            .json::<ImageUrlMap>()
            .await
            .map_err(|e| FigportError::serde(format!("decode image url response: {e}")))?;
        Ok(map.images.get(image_ref).cloned().flatten())
    }

    async fn download(&self, url: &str) -> FigportResult<Vec<u8>> {
        // Resolved URLs are pre-signed; no auth header.
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FigportError::transport(format!("GET {url}: {e}")))?;
        let resp = check_status(url, resp)?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FigportError::transport(format!("read body of {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}
