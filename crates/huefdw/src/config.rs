//! CLI configuration -- thin wrapper around `huefdw_config`.
//!
//! Adds the resolution that respects `GlobalOpts` overrides (--bridge,
//! --username, --kvtype, ...). Everything ends up as one option bag so the
//! adapter validates profile values and flags the same way.

use secrecy::{ExposeSecret, SecretString};

use huefdw_core::{AdapterConfig, ResourceKind};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use huefdw_config::{
    Config, Profile, config_path, load_config, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the adapter configuration for `kind` from the config file, the
/// active profile and flag overrides.
pub fn build_adapter_config(
    global: &GlobalOpts,
    kind: ResourceKind,
) -> Result<AdapterConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let options = resolve_options(global, &cfg, &profile_name, kind)?;
    Ok(AdapterConfig::from_options(kind, options)?)
}

/// The option bag for `kind`: profile values first, then flags on top.
pub fn resolve_options(
    global: &GlobalOpts,
    cfg: &Config,
    profile_name: &str,
    kind: ResourceKind,
) -> Result<Vec<(String, String)>, CliError> {
    let username = global.username.clone().map(SecretString::from);

    let mut options = if let Some(profile) = cfg.profiles.get(profile_name) {
        let username = username
            .clone()
            .or_else(|| huefdw_config::resolve_username(profile));
        huefdw_config::profile_options(profile, &cfg.defaults, kind, username.as_ref())
    } else if let Some(ref bridge) = global.bridge {
        // No profile -- build from flags and file-level defaults alone.
        let bare = Profile {
            bridge: bridge.clone(),
            ..Profile::default()
        };
        huefdw_config::profile_options(&bare, &cfg.defaults, kind, username.as_ref())
    } else if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name.into(),
            available: available_profiles(cfg),
        });
    } else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };

    if let Some(ref bridge) = global.bridge {
        set_option(&mut options, "bridge", bridge.clone());
    }
    if let Some(ref token) = username {
        set_option(&mut options, "username", token.expose_secret().to_owned());
    }
    if let Some(kvtype) = global.kvtype {
        set_option(&mut options, "kvtype", kvtype.as_str().to_owned());
    }
    if let Some(tt) = global.transition_time {
        set_option(&mut options, "transitiontime", tt.to_string());
    }
    if let Some(timeout) = global.timeout {
        set_option(&mut options, "timeout", timeout.to_string());
    }
    if global.insecure {
        set_option(&mut options, "insecure", "true".into());
    }
    Ok(options)
}

fn set_option(options: &mut Vec<(String, String)>, key: &str, value: String) {
    match options.iter_mut().find(|(k, _)| k == key) {
        Some(slot) => slot.1 = value,
        None => options.push((key.to_owned(), value)),
    }
}

/// Comma-separated profile names, or `(none)`.
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["huefdw"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["columns", "lights"]);
        let cli = Cli::try_parse_from(argv).unwrap();
        assert!(matches!(cli.command, Command::Columns(_)));
        cli.global
    }

    fn home_config() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                bridge: "192.168.1.20".into(),
                username: Some("from-file".into()),
                transition_time: Some(2),
                ..Profile::default()
            },
        );
        cfg
    }

    fn value<'a>(options: &'a [(String, String)], key: &str) -> Option<&'a str> {
        options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn flags_override_profile() {
        let g = global(&["--bridge", "10.0.0.7", "--transition-time", "9", "-k"]);
        let opts = resolve_options(&g, &home_config(), "default", ResourceKind::Lights).unwrap();
        assert_eq!(value(&opts, "bridge"), Some("10.0.0.7"));
        assert_eq!(value(&opts, "transitiontime"), Some("9"));
        assert_eq!(value(&opts, "insecure"), Some("true"));
    }

    #[test]
    fn username_flag_beats_profile_username() {
        let g = global(&["--username", "from-flag"]);
        let opts = resolve_options(&g, &home_config(), "default", ResourceKind::Lights).unwrap();
        assert_eq!(value(&opts, "username"), Some("from-flag"));
        assert_eq!(value(&opts, "bridge"), Some("192.168.1.20"));

        let g = global(&[]);
        let opts = resolve_options(&g, &home_config(), "default", ResourceKind::Lights).unwrap();
        assert_eq!(value(&opts, "username"), Some("from-file"));
    }

    #[test]
    fn bridge_flag_without_profile() {
        let g = global(&["--bridge", "10.0.0.7", "--kvtype", "hstore"]);
        let opts = resolve_options(&g, &Config::default(), "default", ResourceKind::Scenes).unwrap();
        assert_eq!(value(&opts, "bridge"), Some("10.0.0.7"));
        assert_eq!(value(&opts, "kvtype"), Some("structured"));
    }

    #[test]
    fn missing_everything_is_no_config() {
        let g = global(&[]);
        let err = resolve_options(&g, &Config::default(), "default", ResourceKind::Lights)
            .unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn named_profile_must_exist() {
        let g = global(&["--profile", "attic"]);
        let err = resolve_options(&g, &home_config(), "attic", ResourceKind::Lights).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "attic");
                assert_eq!(available, "default");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
