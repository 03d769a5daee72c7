// Bridge HTTP client
//
// Wraps `reqwest::Client` with Hue-specific URL construction (the API token
// is a path segment, not a header), whole-request error detection, and
// parsing of the per-field status array returned by PUT.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{BridgeErrorDetail, BridgeResponse};
use crate::transport::TransportConfig;

/// Longest slice of a response body kept in error messages.
const BODY_PREVIEW: usize = 200;

/// Raw HTTP client for one Hue bridge and one API token.
///
/// Every call is a single request; nothing is cached and nothing is retried.
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl BridgeClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the bridge root, e.g. `http://192.168.1.20`.
    pub fn new(
        base_url: Url,
        token: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, token: SecretString) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// The bridge base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/api/{token}/{path}`, with a trailing slash when `collection`.
    pub(crate) fn api_url(&self, path: &str, collection: bool) -> Result<Url, Error> {
        self.build_url(self.token.expose_secret(), path, collection)
    }

    /// Same as [`api_url`](Self::api_url) with the token masked, for logs.
    fn redacted_url(&self, path: &str, collection: bool) -> String {
        self.build_url("***", path, collection)
            .map_or_else(|_| format!("<invalid url for {path}>"), |u| u.to_string())
    }

    fn build_url(&self, token: &str, path: &str, collection: bool) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            segments.pop_if_empty().push("api").push(token);
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
            if collection {
                segments.push("");
            }
        }
        Ok(url)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// GET one resource and return its top-level JSON object.
    ///
    /// For collections (`lights`, `sensors`, `scenes`) the object is keyed by
    /// resource id; for `config` it is the configuration itself.
    pub async fn get_resource(&self, path: &str) -> Result<Map<String, Value>, Error> {
        let url = self.api_url(path, true)?;
        debug!(url = %self.redacted_url(path, true), "GET");

        let resp = self.http.get(url).send().await.map_err(scrub)?;
        let body = read_body(resp).await?;
        trace!(bytes = body.len(), "GET response received");

        let value: Value = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;

        match value {
            Value::Object(map) => Ok(map),
            Value::Array(entries) => Err(whole_request_error(&entries).unwrap_or_else(|| {
                Error::Deserialization {
                    message: "expected a JSON object, got an array".into(),
                    body: body.clone(),
                }
            })),
            other => Err(Error::Deserialization {
                message: format!("expected a JSON object, got {}", json_type(&other)),
                body,
            }),
        }
    }

    /// PUT a JSON body and parse the per-field status array.
    ///
    /// A body that is not JSON, or JSON that is not a status array, is an
    /// error for the whole call: no per-field information can be recovered.
    pub async fn put(&self, path: &str, body: &Value) -> Result<BridgeResponse, Error> {
        let url = self.api_url(path, false)?;
        debug!(url = %self.redacted_url(path, false), %body, "PUT");

        let resp = self.http.put(url).json(body).send().await.map_err(scrub)?;
        let raw = read_body(resp).await?;
        trace!(body = %raw, "PUT response received");

        let value: Value = serde_json::from_str(&raw).map_err(|e| Error::Deserialization {
            message: format!("non-JSON response from bridge: {e}"),
            body: raw.clone(),
        })?;

        if !value.is_array() {
            return Err(Error::Deserialization {
                message: format!("expected a status array, got {}", json_type(&value)),
                body: raw,
            });
        }

        serde_json::from_value(value).map_err(|e| Error::Deserialization {
            message: format!("malformed status array: {e}"),
            body: raw,
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Read the body, turning non-2xx statuses into `Error::Http`.
async fn read_body(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Http {
            status: status.as_u16(),
            body: preview(&body),
        });
    }
    resp.text().await.map_err(scrub)
}

/// The bridge reports whole-request failures on GET as a status array
/// (`[{"error": {...}}]`) with HTTP 200.
fn whole_request_error(entries: &[Value]) -> Option<Error> {
    entries.iter().find_map(|entry| {
        let detail: BridgeErrorDetail = serde_json::from_value(entry.get("error")?.clone()).ok()?;
        Some(Error::Bridge {
            code: detail.code,
            address: detail.address,
            description: detail.description,
        })
    })
}

/// reqwest errors render their URL, and the URL carries the API token.
fn scrub(err: reqwest::Error) -> Error {
    Error::Transport(err.without_url())
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW).collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
