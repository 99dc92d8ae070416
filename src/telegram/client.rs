use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::ApiError;
use crate::telegram::StickerSource;
use crate::telegram::model::{ApiFile, ApiResponse, StickerSet};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Blocking Bot API client. Every request shares one timeout so a stalled
/// call comes back as [`ApiError::Network`] instead of hanging the run.
pub struct BotApi {
    client: reqwest::blocking::Client,
    base: Url,
    token: SecretString,
}

impl BotApi {
    pub fn new(base: Url, token: SecretString, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stickerdl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base,
            token,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base.as_str().trim_end_matches('/'),
            self.token.expose_secret(),
            method
        )
    }

    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.base.as_str().trim_end_matches('/'),
            self.token.expose_secret(),
            file_path.trim_start_matches('/')
        )
    }

    fn call<T>(&self, method: &str, query: &[(&str, &str)]) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!(method, "calling Bot API");
        // Error envelopes come back with 4xx statuses, so the body is parsed
        // before the status is looked at.
        let response = self
            .client
            .get(self.method_url(method))
            .query(query)
            .send()
            .map_err(|e| ApiError::Network(e.without_url()))?;
        let status = response.status();
        match response.json::<ApiResponse<T>>() {
            Ok(body) => body.into_result(),
            Err(_) if !status.is_success() => Err(ApiError::Status(status)),
            Err(e) => Err(ApiError::Network(e.without_url())),
        }
    }
}

impl StickerSource for BotApi {
    fn sticker_set(&self, name: &str) -> Result<StickerSet, ApiError> {
        self.call("getStickerSet", &[("name", name)])
    }

    fn file_path(&self, file_id: &str) -> Result<String, ApiError> {
        let file: ApiFile = self.call("getFile", &[("file_id", file_id)])?;
        file.file_path.ok_or(ApiError::MissingResult)
    }

    fn fetch_file(&self, file_path: &str) -> Result<Vec<u8>, ApiError> {
        debug!(file_path, "downloading sticker file");
        let response = self
            .client
            .get(self.file_url(file_path))
            .send()
            .map_err(|e| ApiError::Network(e.without_url()))?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        let bytes = response
            .bytes()
            .map_err(|e| ApiError::Network(e.without_url()))?;
        Ok(bytes.to_vec())
    }
}
