use std::fmt;
use std::time::Duration;

use futures_util::StreamExt;
use miner_core::BatchRequest;
use miner_logging::miner_debug;
use reqwest::header::CONTENT_TYPE;

use crate::{FailureKind, FetchError, RawResponse};

pub const STEAM_MATCH_HISTORY_URL: &str =
    "https://api.steampowered.com/IDOTA2Match_570/GetMatchHistoryBySequenceNum/v0001/";

#[derive(Clone)]
pub struct TransportSettings {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl TransportSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: STEAM_MATCH_HISTORY_URL.to_string(),
            api_key: api_key.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

// The key ends up in logs otherwise.
impl fmt::Debug for TransportSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: BatchRequest) -> Result<RawResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    settings: TransportSettings,
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn request_url(&self, request: BatchRequest) -> Result<reqwest::Url, FetchError> {
        let start = request.cursor.to_string();
        let count = request.limit.to_string();
        reqwest::Url::parse_with_params(
            &self.settings.base_url,
            [
                ("key", self.settings.api_key.as_str()),
                ("start_at_match_seq_num", start.as_str()),
                ("matches_requested", count.as_str()),
            ],
        )
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn too_large(&self, actual: u64) -> FetchError {
        FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, request: BatchRequest) -> Result<RawResponse, FetchError> {
        let url = self.request_url(request)?;
        miner_debug!(
            "GET match history from {} (limit {})",
            request.cursor,
            request.limit
        );

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(RawResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    // Strip the URL so the API key never reaches an error message.
    let err = err.without_url();
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
