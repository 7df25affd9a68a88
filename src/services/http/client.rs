use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::services::http::csrf::CsrfInterceptor;
use crate::services::http::transport::{ApiRequest, ApiResponse, Transport};

/// reqwest-backed [`Transport`] talking to the forms backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    csrf: Option<CsrfInterceptor>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        config
            .validate()
            .map_err(|e| ApiError::validation(e.to_string()))?;

        let csrf = config
            .csrf_token
            .as_deref()
            .map(|token| CsrfInterceptor::new(&config.csrf_header, token))
            .transpose()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            csrf,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(csrf) = &self.csrf {
            csrf.apply(&request.method, &mut headers);
        }

        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path))
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let body = decode_body(&bytes);

        debug!(method = %request.method, path = %request.path, status = status.as_u16(), "request finished");

        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body });
        }
        Ok(ApiResponse::new(status.as_u16(), body))
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        match request.options.cancel.clone() {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(ApiError::Cancelled);
                }
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(ApiError::Cancelled),
                    res = self.send(request) => res,
                }
            }
            None => self.send(request).await,
        }
    }
}

/// Empty body is `None`; anything that is not JSON is kept as a string.
fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

