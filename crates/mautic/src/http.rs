//! [`Connection`] over HTTP, backed by `reqwest`.

mod builder;
pub use builder::Builder;

use crate::{record::is_present, Connection, Error, Json, Method, Params, RequestOptions, Result};

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::StatusCode;
use url::Url;

use std::{fmt, time::Instant};

/// A connection to a Mautic installation's REST API.
#[derive(Debug, Clone)]
pub struct HttpConnection {
    id: Option<String>,
    base_url: Url,
    client: reqwest::Client,
    auth: Auth,
}

#[derive(Clone, Default)]
enum Auth {
    #[default]
    None,
    Basic {
        user: String,
        password: String,
    },
    Bearer(String),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Basic { user, .. } => f.debug_struct("Basic").field("user", user).finish(),
            Auth::Bearer(_) => f.write_str("Bearer"),
        }
    }
}

impl Auth {
    fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Auth::None => request,
            Auth::Basic { user, password } => request.basic_auth(user, Some(password)),
            Auth::Bearer(token) => request.bearer_auth(token),
        }
    }
}

impl HttpConnection {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Connection for HttpConnection {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    async fn request(&self, method: Method, path: &str, options: RequestOptions) -> Result<Json> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| crate::err!("invalid request path `{}`: {}", path, e))?;

        let mut request = self.client.request(http_method(method), url);
        if let Some(params) = &options.params {
            request = request.query(&query_pairs(params));
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }
        request = self.auth.apply(request);

        let start = Instant::now();
        debug!("[MAUTIC_HTTP] Sending {} {}", method, path);

        let response = request.send().await.map_err(Error::transport)?;
        let status = response.status();
        let text = response.text().await.map_err(Error::transport)?;

        debug!(
            "[MAUTIC_HTTP] Response received: status={} duration_ms={}",
            status,
            start.elapsed().as_millis()
        );

        let body = parse_body(&text);

        if !status.is_success() {
            warn!(
                "[MAUTIC_HTTP] Server error: {} {} status={}",
                method, path, status
            );
            return Err(classify(status, body));
        }

        match body {
            Some(Json::Object(map)) => {
                // Some rejections are reported in-band with a 200.
                let errors = map.get("errors").filter(|errors| is_present(errors));
                if let Some(errors) = errors {
                    return Err(Error::validation(Some(status.as_u16()), errors.clone()));
                }
                Ok(Json::Object(map))
            }
            None if text.trim().is_empty() => Ok(Json::Object(Params::new())),
            _ => Err(Error::invalid_response(format!(
                "expected a JSON object from {} {}",
                method, path
            ))),
        }
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn parse_body(text: &str) -> Option<Json> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str(text).ok()
}

/// Maps a non-success response to an error. Client errors other than
/// authentication, lookup and rate limit failures are validation failures.
fn classify(status: StatusCode, body: Option<Json>) -> Error {
    let errors = match body {
        Some(Json::Object(mut map)) => match map.remove("errors") {
            Some(errors) => errors,
            None => Json::Object(map),
        },
        Some(body) => body,
        None => Json::Null,
    };

    let is_validation = status.is_client_error()
        && !matches!(
            status,
            StatusCode::UNAUTHORIZED
                | StatusCode::FORBIDDEN
                | StatusCode::NOT_FOUND
                | StatusCode::TOO_MANY_REQUESTS
        );

    if is_validation {
        return Error::validation(Some(status.as_u16()), errors);
    }

    let message = first_message(&errors)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default())
        .to_string();
    let errors = (!errors.is_null()).then_some(errors);

    Error::request_failed(Some(status.as_u16()), message, errors)
}

fn first_message(errors: &Json) -> Option<&str> {
    match errors {
        Json::Array(items) => items
            .iter()
            .find_map(|item| item.get("message").and_then(Json::as_str)),
        Json::Object(map) => map.get("message").and_then(Json::as_str),
        _ => None,
    }
}

/// Encodes params as a PHP style query string: nested values become
/// `key[sub]=value` pairs.
fn query_pairs(params: &Params) -> Vec<(String, String)> {
    let mut pairs = vec![];
    for (key, value) in params {
        push_pairs(key.clone(), value, &mut pairs);
    }
    pairs
}

fn push_pairs(key: String, value: &Json, pairs: &mut Vec<(String, String)>) {
    match value {
        Json::Object(map) => {
            for (sub, value) in map {
                push_pairs(format!("{}[{}]", key, sub), value, pairs);
            }
        }
        Json::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                push_pairs(format!("{}[{}]", key, index), value, pairs);
            }
        }
        Json::String(value) => pairs.push((key, value.clone())),
        Json::Null => pairs.push((key, String::new())),
        Json::Bool(value) => pairs.push((key, if *value { "1" } else { "0" }.to_string())),
        Json::Number(value) => pairs.push((key, value.to_string())),
    }
}
