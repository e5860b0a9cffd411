//! reqwest implementation of [`TranslatorApi`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response, Url};
use serde::de::DeserializeOwned;

use super::{
    error_message, ApiError, ConfigPayload, HistoryPage, ModelDescriptor, ModelsResponse,
    TranslatorApi, UploadPayload, UploadResponse,
};

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ApiError::Transport(format!("invalid server URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "server URL {} cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent(format!("xlate/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::Transport(format!("server URL {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Turn a non-2xx response into `ApiError::Status`.
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Transport(format!("timed out: {}", e))
    } else {
        ApiError::Transport(e.to_string())
    }
}

#[async_trait]
impl TranslatorApi for HttpApi {
    async fn save_config(&self, payload: &ConfigPayload) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "config"])?;
        tracing::debug!(%url, "saving configuration");

        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(transport)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ApiError> {
        let url = self.endpoint(&["api", "models"])?;
        let response = self.client.get(url).send().await.map_err(transport)?;
        let response = Self::check(response).await?;
        let body: ModelsResponse = Self::json(response).await?;
        Ok(body.models)
    }

    async fn upload(&self, payload: UploadPayload) -> Result<UploadResponse, ApiError> {
        let url = self.endpoint(&["upload"])?;
        tracing::debug!(%url, file = %payload.file_name, bytes = payload.bytes.len(), "uploading");

        let file = multipart::Part::bytes(payload.bytes).file_name(payload.file_name);
        let form = multipart::Form::new()
            .part("file", file)
            .text("api_url", payload.api_url)
            .text("api_key", payload.api_key)
            .text("prompt", payload.prompt);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let response = Self::check(response).await?;
        Self::json(response).await
    }

    async fn history(&self, limit: u32, offset: u64) -> Result<HistoryPage, ApiError> {
        let url = self.endpoint(&["api", "history"])?;
        let response = self
            .client
            .get(url)
            .query(&[("limit", limit as u64), ("offset", offset)])
            .send()
            .await
            .map_err(transport)?;
        let response = Self::check(response).await?;
        Self::json(response).await
    }

    async fn download(&self, filename: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&["download", filename])?;
        let response = self.client.get(url).send().await.map_err(transport)?;
        let response = Self::check(response).await?;
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }
}
