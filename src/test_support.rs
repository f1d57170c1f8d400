//! In-memory transport used by unit tests

use crate::http::{PreparedRequest, Transport, TransportFailure, TransportResponse};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use url::Url;

type Scripted = std::result::Result<TransportResponse, TransportFailure>;

/// Replays a fixed sequence of responses and records every request
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    seen: Mutex<Vec<PreparedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn then(self, step: Scripted) -> Self {
        self.script.lock().unwrap().push_back(step);
        self
    }

    #[must_use]
    pub fn then_json(self, status: u16, body: Value) -> Self {
        self.then(Ok(json_response(status, &body)))
    }

    #[must_use]
    pub fn then_status(self, status: u16, headers: &[(&str, &str)]) -> Self {
        self.then(Ok(TransportResponse::new(status, header_map(headers), "")))
    }

    #[must_use]
    pub fn then_failure(self, message: &str) -> Self {
        self.then(Err(TransportFailure::new(message)))
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &PreparedRequest) -> Scripted {
        self.seen.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportFailure::new("script exhausted")))
    }
}

/// Like `ScriptedTransport`, but keeps a separate script per URL path so
/// concurrent calls cannot consume each other's responses
#[derive(Default)]
pub struct RoutedTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    seen: Mutex<Vec<PreparedRequest>>,
}

impl RoutedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(self, path: &str, step: Scripted) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(step);
        self
    }

    pub fn requests_to(&self, path: &str) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == path)
            .count()
    }
}

#[async_trait]
impl Transport for RoutedTransport {
    async fn execute(&self, request: &PreparedRequest) -> Scripted {
        self.seen.lock().unwrap().push(request.clone());
        self.routes
            .lock()
            .unwrap()
            .get_mut(request.url.path())
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportFailure::new("script exhausted")))
    }
}

pub fn header_map(headers: &[(&str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.append(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    map
}

pub fn json_response(status: u16, body: &Value) -> TransportResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    TransportResponse::new(status, headers, serde_json::to_vec(body).unwrap())
}

pub fn get_request(url: &str) -> PreparedRequest {
    PreparedRequest {
        method: crate::types::Method::GET,
        url: Url::parse(url).unwrap(),
        headers: HeaderMap::new(),
        body: None,
    }
}
