//! HTTP client for the storefront backend.
//!
//! # Design
//! `HttpClient` holds only a `base_url` and a shared `Fetch`. Each call is
//! split into `build_request` (pure: URL, query string, headers, JSON body)
//! and `parse_response` (pure: status check, body decoding, error
//! normalization), with the `Fetch` round-trip in between. The split keeps
//! URL and error handling deterministic and testable without a network.
//!
//! Every failure leaving this module is an `ApiError`. A successful response
//! whose body is empty or not the expected JSON yields `Ok(None)`.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::error::{normalize, normalize_error, ApiError};
use crate::http::{Fetch, HttpMethod, HttpRequest, HttpResponse, TransportError};

const CONTENT_TYPE: &str = "content-type";
const APPLICATION_JSON: &str = "application/json";
const NETWORK_ERROR: &str = "Network error";

/// Per-call options: query parameters, extra headers, JSON body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    /// Pairs with a `None` value are dropped before encoding.
    pub params: Vec<(String, Option<String>)>,
    /// Override or extend the default headers.
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestConfig {
    pub fn param<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        self.params
            .push((key.to_string(), value.map(|v| v.to_string())));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(|e| normalize_error(&e))?);
        Ok(self)
    }
}

/// Async JSON client for the storefront API.
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    fetch: Arc<dyn Fetch>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    pub fn new(base_url: &str, fetch: Arc<dyn Fetch>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            fetch,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str, params: &[(String, Option<String>)]) -> String {
        let mut url = if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        };

        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;
        for (key, value) in params {
            if let Some(value) = value {
                query.append_pair(key, value);
                has_query = true;
            }
        }
        if has_query {
            url.push('?');
            url.push_str(&query.finish());
        }
        url
    }

    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        config: RequestConfig,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.build_url(path, &config.params);

        let mut headers = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
        for (name, value) in config.headers {
            match headers
                .iter_mut()
                .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
            {
                Some(slot) => slot.1 = value,
                None => headers.push((name, value)),
            }
        }

        let body = config
            .body
            .map(|body| serde_json::to_string(&body))
            .transpose()
            .map_err(|e| normalize_error(&e))?;

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    pub fn parse_response<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Option<T>, ApiError> {
        if !response.is_success() {
            let err = error_from_response(&response);
            warn!(status = response.status, code = %err.code, reason = %err.message, "request failed");
            return Err(err);
        }
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&response.body) {
            Ok(data) => Ok(Some(data)),
            Err(e) => {
                debug!(error = %e, "ignoring undecodable success body");
                Ok(None)
            }
        }
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        config: RequestConfig,
    ) -> Result<Option<T>, ApiError> {
        let request = self.build_request(method, path, config)?;
        debug!(method = method.as_str(), url = %request.url, "sending request");

        let response = self.fetch.fetch(request).await.map_err(|e| {
            warn!(error = %e, "network failure");
            network_error(&e)
        })?;
        debug!(status = response.status, "received response");

        self.parse_response(response)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<Option<T>, ApiError> {
        self.request(HttpMethod::Get, path, config).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        config: RequestConfig,
    ) -> Result<Option<T>, ApiError> {
        self.request(HttpMethod::Post, path, config.json(body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        config: RequestConfig,
    ) -> Result<Option<T>, ApiError> {
        self.request(HttpMethod::Put, path, config.json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<Option<T>, ApiError> {
        self.request(HttpMethod::Delete, path, config).await
    }
}

/// Merge the error body (or `{message: statusText}` when it is not a JSON
/// object) with the status and normalize the result.
fn error_from_response(response: &HttpResponse) -> ApiError {
    let mut payload = match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Object(map)) => map,
        _ => {
            let mut map = Map::new();
            map.insert(
                "message".to_string(),
                Value::String(response.status_text.clone()),
            );
            map
        }
    };
    payload.insert("status".to_string(), Value::from(response.status));
    payload.insert(
        "statusText".to_string(),
        Value::String(response.status_text.clone()),
    );
    normalize(&Value::Object(payload))
}

fn network_error(err: &TransportError) -> ApiError {
    let description = if err.message.is_empty() {
        NETWORK_ERROR
    } else {
        err.message.as_str()
    };
    normalize(&serde_json::json!({
        "status": 0,
        "statusText": description,
    }))
}
