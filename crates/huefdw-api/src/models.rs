// Bridge wire types
//
// Only the write-path response is typed. GET payloads differ per resource
// kind and firmware, so they stay as `serde_json::Map` and are flattened by
// the column mapper in `huefdw-core`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bridge_error::BridgeErrorKind;

/// Body of a bridge `{"error": {...}}` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeErrorDetail {
    #[serde(rename = "type")]
    pub code: u16,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
}

impl BridgeErrorDetail {
    pub fn kind(&self) -> BridgeErrorKind {
        BridgeErrorKind::from_code(self.code)
    }
}

/// One element of the array the bridge returns for a PUT.
///
/// Normally exactly one of `success` / `error` is present. An entry
/// without `success` is treated as a failure of the field it refers to,
/// even if `error` is missing too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BridgeErrorDetail>,
}

impl StatusEntry {
    pub fn is_success(&self) -> bool {
        self.success.is_some()
    }

    /// The resource address this entry refers to, e.g. `/lights/1/state/on`.
    pub fn address(&self) -> Option<&str> {
        if let Some(success) = &self.success {
            return success.keys().next().map(String::as_str);
        }
        self.error
            .as_ref()
            .map(|e| e.address.as_str())
            .filter(|a| !a.is_empty())
    }

    /// The last path segment of [`address`](Self::address), which is the
    /// bridge field name (`on`, `bri`, `proxyport`, ...).
    pub fn field(&self) -> Option<&str> {
        self.address()
            .and_then(|a| a.rsplit('/').next())
            .filter(|f| !f.is_empty())
    }
}

/// Parsed per-field response to a PUT.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BridgeResponse {
    pub entries: Vec<StatusEntry>,
}

impl BridgeResponse {
    pub fn successes(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|e| e.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|e| !e.is_success())
    }

    pub fn is_complete_success(&self) -> bool {
        self.entries.iter().all(StatusEntry::is_success)
    }
}
