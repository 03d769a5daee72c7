// huefdw-api: Async Rust client for the Philips Hue bridge REST API

pub mod bridge_error;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use bridge_error::BridgeErrorKind;
pub use client::BridgeClient;
pub use error::Error;
pub use models::{BridgeErrorDetail, BridgeResponse, StatusEntry};
pub use transport::{TlsMode, TransportConfig};
