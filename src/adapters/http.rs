use crate::domain::ports::{ConfigProvider, TokenStore};
use crate::utils::error::{ApiError, ClientError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const PROD_API_BASE: &str = "https://api.openhack.ro";
pub const ALPHA_API_BASE: &str = "https://alpha.openhack.ro";
pub const LOCAL_API_BASE: &str = "http://localhost:9000/";

/// Picks the backend for a deployment name (`API_DEPLOYMENT`); unknown names use prod.
pub fn resolve_api_base(deployment: Option<&str>) -> &'static str {
    match deployment.map(str::trim) {
        Some("alpha") => ALPHA_API_BASE,
        Some("local") => LOCAL_API_BASE,
        _ => PROD_API_BASE,
    }
}

/// JSON-over-HTTP client for the backend.
///
/// Every request carries `Authorization: Bearer <token>` when the token store holds one,
/// and every failure comes back as an [`ApiError`].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        // 確保以 '/' 結尾，Url::join 才會附加而不是取代最後一段
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized).map_err(|e| ClientError::InvalidConfigValue {
            field: "api.base_url".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    pub fn from_config(config: &dyn ConfigProvider, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        Self::new(config.api_base_url(), config.request_timeout(), tokens)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, query, None).await?;
        decode(response).await
    }

    pub async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let response = self.send(Method::GET, path, &[], None).await?;
        let text = response.text().await?;
        // ping 之類的端點可能回傳 JSON 字串
        Ok(serde_json::from_str::<String>(&text).unwrap_or(text))
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(Method::POST, path, &[], Some(to_body(body)?))
            .await?;
        decode(response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(Method::PATCH, path, &[], Some(to_body(body)?))
            .await?;
        decode(response).await
    }

    /// PATCH without a body, addressing the target through query parameters.
    pub async fn patch_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.send(Method::PATCH, path, query, None).await?;
        decode(response).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::DELETE, path, &[], None).await?;
        decode(response).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<serde_json::Value>,
    ) -> Result<Response, ApiError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::transport(format!("Invalid request path {}: {}", path, e)))?;

        tracing::debug!("{} {}", method, url);
        let mut request = self.client.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.tokens.get_token() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} {} failed: {}", method, path, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        tracing::debug!("{} {} -> {}", method, path, status);
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(error_from_body(status.as_u16(), &body))
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::transport(format!("Failed to encode request body: {}", e)))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::transport(format!("Invalid response body: {}", e)))
}

/// Uses the body's `message` field when it is a string, otherwise the generic
/// status-code message.
pub fn error_from_body(status: u16, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("Request failed with status code {}", status));
    ApiError::new(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_api_base() {
        assert_eq!(resolve_api_base(None), PROD_API_BASE);
        assert_eq!(resolve_api_base(Some("dev")), PROD_API_BASE);
        assert_eq!(resolve_api_base(Some("alpha")), ALPHA_API_BASE);
        assert_eq!(resolve_api_base(Some(" local ")), LOCAL_API_BASE);
    }

    #[test]
    fn test_error_from_body_prefers_message_field() {
        let err = error_from_body(409, br#"{"message":"email already registered"}"#);
        assert_eq!(err, ApiError::new(409, "email already registered"));
    }

    #[test]
    fn test_error_from_body_falls_back() {
        let err = error_from_body(500, b"<html>oops</html>");
        assert_eq!(err.message, "Request failed with status code 500");

        let err = error_from_body(400, br#"{"message":42}"#);
        assert_eq!(err.message, "Request failed with status code 400");
        assert_eq!(err.status, 400);
    }
}
