//! Profile configuration for huefdw.
//!
//! TOML profiles on disk merged with `HUEFDW_*` environment variables,
//! token resolution (env var + plaintext), and translation of a profile into
//! the same option bag a relational engine would hand the adapter, so every
//! option is validated by `huefdw_core::AdapterConfig` alone.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use huefdw_core::{AdapterConfig, CoreError, ResourceKind};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "HUEFDW_CONFIG";

/// Environment variable consulted for the username when a profile names
/// none of its own.
pub const USERNAME_ENV: &str = "HUEFDW_USERNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("no profile selected and no default_profile configured")]
    NoProfile,

    #[error(transparent)]
    Adapter(#[from] CoreError),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named bridge profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_kvtype")]
    pub kvtype: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            kvtype: default_kvtype(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_kvtype() -> String {
    "json".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named bridge profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Bridge address: `192.168.1.20`, `hue.local:8080` or a full URL.
    pub bridge: String,

    /// Whitelisted bridge username (plaintext; prefer `username_env`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Environment variable holding the username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_env: Option<String>,

    /// `json` or `structured` (`hstore`). Overrides `defaults.kvtype`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kvtype: Option<String>,

    /// Light fade time in 100 ms steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_time: Option<u16>,

    /// Bridge id. Kept for reference only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hueid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Config {
    /// Pick a profile by name, falling back to `default_profile`.
    pub fn profile<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .ok_or(ConfigError::NoProfile)?;
        self.profiles
            .get(name)
            .map(|p| (name, p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$HUEFDW_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("org", "huefdw", "huefdw").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("huefdw");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// Nested keys are addressed with a double underscore in the environment:
/// `HUEFDW_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HUEFDW_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve the bridge username: the profile's `username_env`, then
/// `$HUEFDW_USERNAME`, then the plaintext value.
///
/// `None` leaves the choice to the adapter, which falls back to its default
/// username with a warning.
pub fn resolve_username(profile: &Profile) -> Option<SecretString> {
    resolve_username_with(profile, |name| std::env::var(name).ok())
}

/// [`resolve_username`] with an explicit environment lookup.
pub fn resolve_username_with<F>(profile: &Profile, lookup: F) -> Option<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    // 1. Profile's username_env → env var lookup
    if let Some(ref env_name) = profile.username_env {
        if let Some(val) = lookup(env_name).filter(|v| !v.is_empty()) {
            return Some(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Some(val) = lookup(USERNAME_ENV).filter(|v| !v.is_empty()) {
        return Some(SecretString::from(val));
    }

    // 3. Plaintext in config
    profile.username.clone().map(SecretString::from)
}

// ── Translation to the adapter ──────────────────────────────────────

/// The option bag an engine would pass for this profile.
///
/// Profile values override `defaults`; `transitiontime` is only emitted for
/// lights.
pub fn profile_options(
    profile: &Profile,
    defaults: &Defaults,
    kind: ResourceKind,
    username: Option<&SecretString>,
) -> Vec<(String, String)> {
    let mut opts = vec![("bridge".to_owned(), profile.bridge.clone())];

    if let Some(token) = username {
        opts.push(("username".into(), token.expose_secret().to_owned()));
    }
    let kvtype = profile.kvtype.as_deref().unwrap_or(&defaults.kvtype);
    opts.push(("kvtype".into(), kvtype.to_owned()));

    if kind == ResourceKind::Lights {
        if let Some(tt) = profile.transition_time {
            opts.push(("transitiontime".into(), tt.to_string()));
        }
    }
    if let Some(ref id) = profile.hueid {
        opts.push(("hueid".into(), id.clone()));
    }
    opts.push((
        "timeout".into(),
        profile.timeout.unwrap_or(defaults.timeout).to_string(),
    ));
    opts.push((
        "insecure".into(),
        profile.insecure.unwrap_or(defaults.insecure).to_string(),
    ));
    opts
}

/// Build a validated `AdapterConfig` from a profile.
pub fn profile_to_adapter_config(
    profile: &Profile,
    defaults: &Defaults,
    kind: ResourceKind,
) -> Result<AdapterConfig, ConfigError> {
    let username = resolve_username(profile);
    let options = profile_options(profile, defaults, kind, username.as_ref());
    Ok(AdapterConfig::from_options(kind, options)?)
}
