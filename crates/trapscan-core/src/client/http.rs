use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use tracing::{debug, instrument, warn};

use super::{decode_response, AnalysisClient, AnalysisResponse};
use crate::error::TransportError;
use crate::model::AnalysisRequest;

/// Path of the analysis route on a development server.
pub const ANALYZE_PATH: &str = "/analyze";

/// Where analysis requests go, chosen from the host the client runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Local hosts (`localhost`, `127.0.0.1`) use `<origin>/analyze`;
    /// every other host uses the production URL.
    pub fn resolve(origin: &Url, production_url: &Url) -> Result<Self> {
        let url = match origin.host_str() {
            Some("localhost") | Some("127.0.0.1") => origin
                .join(ANALYZE_PATH)
                .with_context(|| format!("failed to build analyze URL from origin {origin}"))?,
            _ => production_url.clone(),
        };
        Ok(Self { url })
    }

    pub fn fixed(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_local(&self) -> bool {
        matches!(self.url.host_str(), Some("localhost") | Some("127.0.0.1"))
    }
}

/// [`AnalysisClient`] sending a single-part multipart upload over HTTP.
///
/// No timeout is configured; whatever the network layer reports surfaces as
/// a [`TransportError`].
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    http: Client,
    endpoint: Endpoint,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: Endpoint) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("trapscan/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build analysis HTTP client")?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    #[instrument(
        name = "analyze_file",
        skip(self, request),
        fields(endpoint = %self.endpoint.url(), kind = request.kind.extension(), size = request.file.bytes.len())
    )]
    async fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisResponse, TransportError> {
        let AnalysisRequest { file, kind } = request;
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(kind.mime_type())?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint.url().clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "analysis request failed");
                TransportError::Request(err)
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        debug!(status, len = body.len(), "analysis response received");
        decode_response(status, &body)
    }
}
