//! Shared HTTP plumbing for OpenAI-compatible endpoints.

use interview_application::ProviderError;
use reqwest::{Client, RequestBuilder, Response, multipart::Form};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Error bodies are cut to this many characters in errors and logs
const MAX_ERROR_BODY: usize = 500;

/// Base URL, bearer key and a client with a fixed request timeout
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let request = self.client.post(self.url(path));
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// POST a JSON body and decode a JSON reply.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = send(self.post(path).json(body)).await?;
        response
            .json::<R>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    /// POST a JSON body and return the raw reply bytes.
    pub async fn post_for_bytes<B>(&self, path: &str, body: &B) -> Result<Vec<u8>, ProviderError>
    where
        B: Serialize + ?Sized,
    {
        let response = send(self.post(path).json(body)).await?;
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        Ok(bytes.to_vec())
    }

    /// POST a multipart form and decode a JSON reply.
    pub async fn post_multipart<R>(&self, path: &str, form: Form) -> Result<R, ProviderError>
    where
        R: DeserializeOwned,
    {
        let response = send(self.post(path).multipart(form)).await?;
        response
            .json::<R>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ProviderError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::BadStatus {
        status: status.as_u16(),
        body: truncate(&body, MAX_ERROR_BODY),
    })
}

pub(crate) fn map_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Request(error.to_string())
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
