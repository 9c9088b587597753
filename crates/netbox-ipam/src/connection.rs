//! Transport layer for the NetBox API
//!
//! [`Connection`] owns the HTTP client and turns one method call into exactly
//! one request/response cycle. Responses are decoded from JSON and network
//! failures are classified into [`NetBoxError`] kinds; status codes are only
//! interpreted as far as each verb's contract requires.

use crate::config::ConnectionConfig;
use crate::error::NetBoxError;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// JSON object used for request bodies
pub type Fields = Map<String, Value>;

/// Raw outcome of a request whose status is left to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Status was 2xx
    pub ok: bool,
    /// HTTP status code
    pub status: u16,
    /// Decoded body, a JSON string if the body was not JSON, null if empty
    pub body: Value,
}

/// Outcome of a POST
#[derive(Debug, Clone, PartialEq)]
pub enum PostOutcome {
    /// NetBox answered 201 Created with the new record
    Created(Value),
    /// Any other answer, with the best error message found in the body
    Rejected {
        /// HTTP status code
        status: u16,
        /// First validation message, or the raw body
        message: String,
    },
}

/// Authenticated connection to one NetBox instance
///
/// Connection reuse is disabled, so every call opens and closes its own
/// socket. The page size is attached to each GET rather than stored on a
/// shared session, which makes `&Connection` safe to share.
pub struct Connection {
    client: Client,
    base_url: String,
    host: String,
    port: u16,
    token: String,
    limit: u32,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("base_url", &self.base_url)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Open a connection
    ///
    /// Fails with [`NetBoxError::Configuration`] when the host or token is
    /// missing.
    pub fn new(config: &ConnectionConfig) -> Result<Self, NetBoxError> {
        let token = config.auth_token()?.to_string();
        let host = config.host()?.to_string();
        let base_url = config.base_url()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(NetBoxError::Transport)?;

        debug!("Opened NetBox connection to {}", base_url);

        Ok(Self {
            client,
            base_url,
            host,
            port: config.effective_port(),
            token,
            limit: config.limit,
        })
    }

    /// API root, e.g. `https://netbox:443/api`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Page size sent with every GET
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Build a full URL from a path relative to the API root
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Get authorization header value
    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    /// GET `path` with the configured `limit` and decode a 200 response
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, NetBoxError> {
        let (status, body) = self.send(Method::GET, path, None).await?;

        if status != StatusCode::OK {
            return Err(NetBoxError::UnexpectedStatus {
                path: path.to_string(),
                status: status.as_u16(),
                body: body_text(&body),
            });
        }

        serde_json::from_value(body).map_err(NetBoxError::Serialization)
    }

    /// PUT `body` to `path`, returning the raw response
    pub async fn put(&self, path: &str, body: Option<&Value>) -> Result<ApiResponse, NetBoxError> {
        let (status, body) = self.send(Method::PUT, path, body).await?;
        Ok(ApiResponse { ok: status.is_success(), status: status.as_u16(), body })
    }

    /// PATCH `body` to `path`, returning the raw response
    pub async fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse, NetBoxError> {
        let (status, body) = self.send(Method::PATCH, path, Some(body)).await?;
        Ok(ApiResponse { ok: status.is_success(), status: status.as_u16(), body })
    }

    /// POST the merge of `required` and `optional` to `path`
    ///
    /// Required fields win when a key appears in both maps.
    pub async fn post(
        &self,
        path: &str,
        required: Fields,
        optional: &Fields,
    ) -> Result<PostOutcome, NetBoxError> {
        let body = Value::Object(merge_fields(required, optional));
        let (status, body) = self.send(Method::POST, path, Some(&body)).await?;

        if status == StatusCode::CREATED {
            Ok(PostOutcome::Created(body))
        } else {
            Ok(PostOutcome::Rejected {
                status: status.as_u16(),
                message: first_error_message(&body),
            })
        }
    }

    /// DELETE `{path}{id}/`, true only on 204 No Content
    pub async fn delete(&self, path: &str, id: u64) -> Result<bool, NetBoxError> {
        Ok(self.delete_status(path, id).await? == StatusCode::NO_CONTENT.as_u16())
    }

    /// DELETE `{path}{id}/` and return the status code
    pub async fn delete_status(&self, path: &str, id: u64) -> Result<u16, NetBoxError> {
        let item_path = format!("{}{}/", path, id);
        let (status, _) = self.send(Method::DELETE, &item_path, None).await?;
        Ok(status.as_u16())
    }

    /// Close the connection
    pub fn close(self) {
        debug!("Closing NetBox connection to {}", self.base_url);
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(StatusCode, Value), NetBoxError> {
        let url = self.build_url(path);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");

        if method == Method::GET {
            request = request.query(&[("limit", self.limit)]);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(self.classify(e).await),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Err(self.classify(e).await),
        };
        debug!("{} {} -> {}", method, url, status);

        Ok((status, decode_body(&text)))
    }

    /// Map a transport failure to the matching error kind
    async fn classify(&self, err: reqwest::Error) -> NetBoxError {
        if is_timeout(&err) {
            return NetBoxError::Timeout { host: self.host.clone() };
        }

        if err.is_connect() {
            let resolves = match tokio::net::lookup_host((self.host.as_str(), self.port)).await {
                Ok(mut addrs) => addrs.next().is_some(),
                Err(_) => false,
            };
            return if resolves {
                NetBoxError::Connection { host: self.host.clone() }
            } else {
                NetBoxError::DnsResolution { host: self.host.clone() }
            };
        }

        NetBoxError::Transport(err)
    }
}

/// Timeouts while reading the body arrive wrapped in a decode error
fn is_timeout(err: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if let Some(inner) = e.downcast_ref::<reqwest::Error>() {
            if inner.is_timeout() {
                return true;
            }
        }
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        source = e.source();
    }
    false
}

/// Merge request fields, keeping the required value on collisions
pub fn merge_fields(required: Fields, optional: &Fields) -> Fields {
    let mut body = required;
    for (key, value) in optional {
        if body.contains_key(key) {
            warn!("Ignoring optional field '{}': it is a required field of this request", key);
            continue;
        }
        body.insert(key.clone(), value.clone());
    }
    body
}

/// Best error message in a NetBox error body
///
/// NetBox reports validation failures as `{"field": ["message", ...]}`. The
/// `name` field is checked first, then every other field in order, and the
/// raw body is used when no message can be found.
pub fn first_error_message(body: &Value) -> String {
    if let Value::Object(fields) = body {
        if let Some(message) = fields.get("name").and_then(field_message) {
            return message;
        }
        if let Some(message) = fields.values().find_map(field_message) {
            return message;
        }
    }
    body_text(body)
}

fn field_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(field_message),
        _ => None,
    }
}

fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn body_text(body: &Value) -> String {
    match body {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
