//! In-memory stand-in for the hotel operations API.
//!
//! Collections are plain JSON arrays keyed by their list path
//! (`/api/booking`). Routing follows the backend's conventions:
//!
//! - `GET /api/<res>` lists, filtered by `?query=<term>` when present
//! - `POST /api/<res>` creates, assigning a uuid `_id`
//! - `GET|PUT|DELETE /api/<res>/<id>` reads, merges or removes one record
//! - `GET /api/<res>/<scope>/<value>` lists records whose `<scope>Id` is
//!   `<value>`
//! - `PUT /api/<res>/<action>/<id>` runs an action; `cancelBooking` and
//!   `checkout` set the booking status, anything else merges the body
//!
//! Tests can seed data, delay responses per path prefix, inject failures
//! and inspect every request the server received. A delayed response
//! carries the data as it was when the request arrived.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use payloads::Endpoints;
use serde_json::{Map, Value, json};
use uuid::Uuid;

/// One request as the mock server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// The decoded `query` parameter, for searches.
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug)]
struct Failure {
    method: String,
    path: String,
    status: u16,
    remaining: usize,
}

#[derive(Debug, Default)]
struct MockState {
    collections: HashMap<String, Vec<Value>>,
    latency: Vec<(String, Duration)>,
    failures: Vec<Failure>,
    requests: Vec<RecordedRequest>,
}

impl MockState {
    /// Delay configured for the longest matching path prefix.
    fn latency_for(&self, path: &str) -> Option<Duration> {
        self.latency
            .iter()
            .filter(|(prefix, _)| path.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, delay)| *delay)
    }

    fn take_failure(&mut self, method: &str, path: &str) -> Option<u16> {
        let failure = self.failures.iter_mut().find(|failure| {
            failure.remaining > 0
                && failure.method == method
                && failure.path == path
        })?;
        failure.remaining -= 1;
        Some(failure.status)
    }
}

/// Handle to the mock server's state. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Replace a collection's records.
    pub fn seed(&self, endpoints: &Endpoints, items: Vec<Value>) {
        self.state()
            .collections
            .insert(endpoints.list.to_string(), items);
    }

    pub fn items(&self, endpoints: &Endpoints) -> Vec<Value> {
        self.state()
            .collections
            .get(endpoints.list)
            .cloned()
            .unwrap_or_default()
    }

    pub fn item(&self, endpoints: &Endpoints, id: &str) -> Option<Value> {
        self.items(endpoints)
            .into_iter()
            .find(|item| item["_id"] == id)
    }

    /// Delay every response whose path starts with `path_prefix`.
    pub fn set_latency(&self, path_prefix: &str, delay: Duration) {
        let mut state = self.state();
        state.latency.retain(|(prefix, _)| prefix != path_prefix);
        state.latency.push((path_prefix.to_string(), delay));
    }

    /// Answer the next `method path` request with `status`.
    pub fn fail_next(&self, method: &str, path: &str, status: u16) {
        self.fail_times(method, path, status, 1);
    }

    /// Answer the next `times` `method path` requests with `status`.
    pub fn fail_times(&self, method: &str, path: &str, status: u16, times: usize) {
        self.state().failures.push(Failure {
            method: method.to_uppercase(),
            path: path.to_string(),
            status,
            remaining: times,
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    /// Requests for exactly `method path`, without a search term.
    pub fn count(&self, method: &str, path: &str) -> usize {
        let method = method.to_uppercase();
        self.state()
            .requests
            .iter()
            .filter(|request| {
                request.method == method
                    && request.path == path
                    && request.query.is_none()
            })
            .count()
    }

    /// Searches of `path` for `term`.
    pub fn count_query(&self, path: &str, term: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|request| {
                request.method == "GET"
                    && request.path == path
                    && request.query.as_deref() == Some(term)
            })
            .count()
    }
}

pub(crate) async fn dispatch(
    request: HttpRequest,
    body: web::Bytes,
    mock: web::Data<MockApi>,
) -> HttpResponse {
    let method = request.method().as_str().to_string();
    let path = request.path().to_string();
    let query = web::Query::<HashMap<String, String>>::from_query(
        request.query_string(),
    )
    .ok()
    .and_then(|params| params.get("query").cloned());
    let body: Option<Value> = serde_json::from_slice(&body).ok();

    tracing::debug!(%method, %path, ?query, "mock request");

    let (delay, response) = {
        let mut state = mock.state();
        state.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: query.clone(),
            body: body.clone(),
        });
        let delay = state.latency_for(&path);
        let response = match state.take_failure(&method, &path) {
            Some(status) => {
                let status = StatusCode::from_u16(status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                HttpResponse::build(status)
                    .json(json!({"message": "Injected failure"}))
            }
            None => route(&mut state, &method, &path, query.as_deref(), body),
        };
        (delay, response)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    response
}

fn route(
    state: &mut MockState,
    method: &str,
    path: &str,
    query: Option<&str>,
    body: Option<Value>,
) -> HttpResponse {
    let Some(rest) = path.strip_prefix("/api/") else {
        return not_found("Unknown route");
    };
    let segments: Vec<&str> = rest.split('/').collect();

    if segments == ["health_check"] {
        return HttpResponse::Ok().body("healthy");
    }

    let list = format!("/api/{}", segments[0]);
    let known = payloads::endpoints::all()
        .iter()
        .any(|(_, endpoints)| endpoints.list == list);
    if !known {
        return not_found("Unknown resource");
    }

    let items = state.collections.entry(list).or_default();

    match (method, &segments[1..]) {
        ("GET", []) => {
            let matches: Vec<Value> = items
                .iter()
                .filter(|item| query.is_none_or(|term| matches_term(item, term)))
                .cloned()
                .collect();
            HttpResponse::Ok().json(matches)
        }
        ("POST", []) => {
            let mut item = match body {
                Some(Value::Object(fields)) => fields,
                _ => return bad_request("Expected a JSON object"),
            };
            item.insert("_id".into(), Uuid::new_v4().to_string().into());
            let item = Value::Object(item);
            items.push(item.clone());
            HttpResponse::Created().json(item)
        }
        ("GET", [id]) => match items.iter().find(|item| item["_id"] == *id) {
            Some(item) => HttpResponse::Ok().json(item),
            None => not_found(&format!("{} not found", segments[0])),
        },
        ("PUT", [id]) => update(items, id, |item| merge(item, body)),
        ("DELETE", [id]) => {
            let before = items.len();
            items.retain(|item| item["_id"] != *id);
            if items.len() == before {
                return not_found(&format!("{} not found", segments[0]));
            }
            HttpResponse::Ok().json(json!({"message": "Deleted"}))
        }
        ("GET", [scope, value]) => {
            let field = format!("{scope}Id");
            let matches: Vec<Value> = items
                .iter()
                .filter(|item| item[field.as_str()] == *value)
                .cloned()
                .collect();
            HttpResponse::Ok().json(matches)
        }
        ("PUT", [action, id]) => match *action {
            "cancelBooking" => {
                update(items, id, |item| set_status(item, "cancelled"))
            }
            "checkout" => update(items, id, |item| set_status(item, "checked-out")),
            _ => update(items, id, |item| merge(item, body)),
        },
        _ => not_found("Unknown route"),
    }
}

fn update(
    items: &mut [Value],
    id: &str,
    apply: impl FnOnce(&mut Map<String, Value>),
) -> HttpResponse {
    let Some(item) = items.iter_mut().find(|item| item["_id"] == id) else {
        return not_found("Record not found");
    };
    if let Value::Object(fields) = &mut *item {
        apply(fields);
    }
    HttpResponse::Ok().json(&*item)
}

fn merge(item: &mut Map<String, Value>, body: Option<Value>) {
    if let Some(Value::Object(fields)) = body {
        for (name, value) in fields {
            if name != "_id" {
                item.insert(name, value);
            }
        }
    }
}

fn set_status(item: &mut Map<String, Value>, status: &str) {
    item.insert("status".into(), status.into());
}

/// Case-insensitive substring match on any top-level string field.
fn matches_term(item: &Value, term: &str) -> bool {
    let term = term.to_lowercase();
    item.as_object().is_some_and(|fields| {
        fields
            .values()
            .filter_map(Value::as_str)
            .any(|value| value.to_lowercase().contains(&term))
    })
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(json!({"message": message}))
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({"message": message}))
}
