//! In-memory `Fetch` double shared by the unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::http::{Fetch, HttpMethod, HttpRequest, HttpResponse, TransportError};
use crate::sync::lock;

type Handler = dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync;

/// Records every request and answers with a handler closure. Requests whose
/// method matches the gate wait for a permit before being answered.
pub(crate) struct FakeFetch {
    handler: Box<Handler>,
    requests: Mutex<Vec<HttpRequest>>,
    gate: Option<(HttpMethod, Arc<Semaphore>)>,
}

impl FakeFetch {
    pub(crate) fn new<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub(crate) fn ok(body: &str) -> Self {
        let body = body.to_string();
        Self::new(move |_| Ok(json_response(200, &body)))
    }

    /// Hold requests with `method` until the returned semaphore gets permits.
    pub(crate) fn gated(mut self, method: HttpMethod) -> (Self, Arc<Semaphore>) {
        let semaphore = Arc::new(Semaphore::new(0));
        self.gate = Some((method, semaphore.clone()));
        (self, semaphore)
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    pub(crate) fn count(&self, method: HttpMethod, path: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.method == method && request_path(r) == path)
            .count()
    }
}

#[async_trait]
impl Fetch for FakeFetch {
    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request.clone());
        if let Some((method, semaphore)) = &self.gate {
            if *method == request.method {
                if let Ok(permit) = semaphore.acquire().await {
                    permit.forget();
                }
            }
        }
        (self.handler)(&request)
    }
}

/// Path portion of the request URL, without scheme, host or query.
pub(crate) fn request_path(request: &HttpRequest) -> &str {
    let without_scheme = request
        .url
        .split_once("://")
        .map_or(request.url.as_str(), |(_, rest)| rest);
    let path = without_scheme
        .find('/')
        .map_or("/", |idx| &without_scheme[idx..]);
    path.split('?').next().unwrap_or(path)
}

pub(crate) fn json_response(status: u16, body: &str) -> HttpResponse {
    let status_text = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        _ => "",
    };
    HttpResponse {
        status,
        status_text: status_text.to_string(),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: body.to_string(),
    }
}

pub(crate) const ASPIRIN: &str =
    r#"{"_id":"p1","name":"Aspirin","price":9.5,"category":"Pain Relief","stock":3}"#;
