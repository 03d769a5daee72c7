// ── Adapter configuration ──
//
// The engine hands every table a flat bag of text options. They are
// validated once, here, into an `AdapterConfig` the adapter owns for its
// lifetime.

use std::time::Duration;

use huefdw_api::{TlsMode, TransportConfig};
use secrecy::SecretString;
use tracing::{debug, warn};
use url::Url;

use crate::error::CoreError;
use crate::kind::{KvType, ResourceKind};

/// Username used when no `username` option is given.
pub const DEFAULT_USERNAME: &str = "postgreshue";

/// Bridge default fade time, 400 ms.
pub const DEFAULT_TRANSITION_TIME: u16 = 4;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Validated configuration for one adapter.
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub kind: ResourceKind,
    pub bridge: Url,
    pub token: SecretString,
    pub kv_type: KvType,
    /// Injected into every PUT body. Only ever set for lights.
    pub transition_time: Option<u16>,
    /// Accepted and kept, never used.
    pub hue_id: Option<String>,
    pub timeout: Duration,
    pub tls: TlsMode,
}

impl AdapterConfig {
    pub fn new(kind: ResourceKind, bridge: Url, token: SecretString) -> Self {
        Self {
            kind,
            bridge,
            token,
            kv_type: KvType::default(),
            transition_time: (kind == ResourceKind::Lights).then_some(DEFAULT_TRANSITION_TIME),
            hue_id: None,
            timeout: DEFAULT_TIMEOUT,
            tls: TlsMode::default(),
        }
    }

    pub fn with_kv_type(mut self, kv_type: KvType) -> Self {
        self.kv_type = kv_type;
        self
    }

    /// Ignored for anything but lights.
    pub fn with_transition_time(mut self, transition_time: u16) -> Self {
        if self.kind == ResourceKind::Lights {
            self.transition_time = Some(transition_time);
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    /// Validate the engine's option bag. Keys are case-insensitive.
    pub fn from_options<I, K, V>(kind: ResourceKind, options: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut bridge = None;
        let mut token = None;
        let mut kv_type = KvType::default();
        let mut transition_time = None;
        let mut hue_id = None;
        let mut timeout = DEFAULT_TIMEOUT;
        let mut tls = TlsMode::default();

        for (key, value) in options {
            let key = key.as_ref().trim().to_ascii_lowercase();
            let value = value.as_ref().trim();
            match key.as_str() {
                "bridge" => bridge = Some(parse_bridge_address(value)?),
                "username" | "token" => token = Some(value.to_owned()),
                "kvtype" => {
                    kv_type = value.parse().map_err(|_| CoreError::Config {
                        field: "kvtype".into(),
                        reason: format!("'{value}' is not one of json, structured, hstore"),
                    })?;
                }
                "transitiontime" => {
                    let tt: u16 = value.parse().map_err(|_| CoreError::Config {
                        field: "transitiontime".into(),
                        reason: format!("'{value}' is not a non-negative integer"),
                    })?;
                    if kind == ResourceKind::Lights {
                        transition_time = Some(tt);
                    } else {
                        warn!(%kind, "transitiontime only applies to lights; ignored");
                    }
                }
                "hueid" => hue_id = Some(value.to_owned()),
                "timeout" => timeout = parse_timeout(value)?,
                "insecure" => {
                    if parse_flag("insecure", value)? {
                        tls = TlsMode::DangerAcceptInvalid;
                    }
                }
                other => warn!(%kind, option = other, "unknown option ignored"),
            }
        }

        let bridge = bridge.ok_or(CoreError::MissingOption {
            option: "bridge",
            kind,
        })?;

        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => {
                warn!(%kind, "no username option; using default username '{DEFAULT_USERNAME}'");
                DEFAULT_USERNAME.to_owned()
            }
        };

        if hue_id.is_none() {
            debug!(%kind, "hueid not set");
        }

        let mut config = Self::new(kind, bridge, SecretString::from(token))
            .with_kv_type(kv_type)
            .with_timeout(timeout)
            .with_tls(tls);
        if let Some(tt) = transition_time {
            config = config.with_transition_time(tt);
        }
        config.hue_id = hue_id;

        debug!(
            %kind,
            bridge = %config.bridge,
            kv_type = %config.kv_type,
            transition_time = ?config.transition_time,
            "adapter configured"
        );
        Ok(config)
    }

    /// Transport settings for the bridge client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_timeout(self.timeout)
            .with_tls(self.tls)
    }
}

/// Accept `192.168.1.20`, `hue.local:8080` or a full `http(s)://` URL.
pub fn parse_bridge_address(raw: &str) -> Result<Url, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::Config {
            field: "bridge".into(),
            reason: "must not be empty".into(),
        });
    }

    let candidate = if raw.contains("://") {
        raw.to_owned()
    } else {
        format!("http://{raw}")
    };

    let url = Url::parse(&candidate).map_err(|e| CoreError::Config {
        field: "bridge".into(),
        reason: format!("'{raw}' is not a valid address: {e}"),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CoreError::Config {
            field: "bridge".into(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(CoreError::Config {
            field: "bridge".into(),
            reason: format!("'{raw}' has no host"),
        });
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, CoreError> {
    raw.parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
        .ok_or_else(|| CoreError::Config {
            field: "timeout".into(),
            reason: format!("'{raw}' is not a positive number of seconds"),
        })
}

fn parse_flag(field: &str, raw: &str) -> Result<bool, CoreError> {
    match raw.to_ascii_lowercase().as_str() {
        "t" | "true" | "yes" | "on" | "1" => Ok(true),
        "f" | "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(CoreError::Config {
            field: field.into(),
            reason: format!("'{raw}' is not a boolean"),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn minimal_lights_options() {
        let cfg = AdapterConfig::from_options(ResourceKind::Lights, [("bridge", "10.0.0.2")]).unwrap();
        assert_eq!(cfg.bridge.as_str(), "http://10.0.0.2/");
        assert_eq!(cfg.token.expose_secret(), DEFAULT_USERNAME);
        assert_eq!(cfg.kv_type, KvType::Json);
        assert_eq!(cfg.transition_time, Some(DEFAULT_TRANSITION_TIME));
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn keys_are_case_insensitive() {
        let cfg = AdapterConfig::from_options(
            ResourceKind::Lights,
            [
                ("Bridge", "hue.local:8080"),
                ("USERNAME", "abc"),
                ("KvType", "hstore"),
                ("TransitionTime", "0"),
                ("hueid", "001788fffe"),
            ],
        )
        .unwrap();
        assert_eq!(cfg.bridge.as_str(), "http://hue.local:8080/");
        assert_eq!(cfg.token.expose_secret(), "abc");
        assert_eq!(cfg.kv_type, KvType::Structured);
        assert_eq!(cfg.transition_time, Some(0));
        assert_eq!(cfg.hue_id.as_deref(), Some("001788fffe"));
    }

    #[test]
    fn transition_time_is_lights_only() {
        let cfg = AdapterConfig::from_options(
            ResourceKind::Scenes,
            [("bridge", "10.0.0.2"), ("transitiontime", "10")],
        )
        .unwrap();
        assert_eq!(cfg.transition_time, None);
    }

    #[test]
    fn missing_bridge() {
        let none: [(&str, &str); 0] = [];
        let err = AdapterConfig::from_options(ResourceKind::Sensors, none).unwrap_err();
        assert!(matches!(err, CoreError::MissingOption { option: "bridge", .. }));
        assert!(err.is_config());
    }

    #[test]
    fn invalid_values() {
        let bad = [
            ("kvtype", "xml"),
            ("transitiontime", "-1"),
            ("timeout", "0"),
            ("insecure", "maybe"),
            ("bridge", "ftp://10.0.0.2"),
        ];
        for (key, value) in bad {
            let err = AdapterConfig::from_options(
                ResourceKind::Lights,
                [("bridge", "10.0.0.2"), (key, value)],
            )
            .unwrap_err();
            assert!(
                matches!(err, CoreError::Config { ref field, .. } if field == key),
                "{key}={value}: {err:?}"
            );
        }
    }

    #[test]
    fn insecure_and_timeout() {
        let cfg = AdapterConfig::from_options(
            ResourceKind::Config,
            [("bridge", "https://10.0.0.2"), ("insecure", "true"), ("timeout", "2.5")],
        )
        .unwrap();
        assert_eq!(cfg.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(cfg.transport().timeout, Duration::from_millis(2500));
    }
}
