//! Shared configuration for linkdash.
//!
//! TOML profiles layered with environment variables, and translation to
//! `linkdash_core::DashboardConfig`. Command-line flags are applied on top
//! by the binary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use linkdash_core::config::DEFAULT_API_BASE_URL;
use linkdash_core::{DashboardConfig, TlsVerification};

/// Prefix for environment overrides. Nested keys use `__`,
/// e.g. `LINKDASH_DEFAULTS__TIMEOUT=10`.
pub const ENV_PREFIX: &str = "LINKDASH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

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
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
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

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds. Unset or 0 = wait indefinitely.
    #[serde(default)]
    pub timeout: Option<u64>,

    #[serde(default)]
    pub insecure: bool,

    /// Automatic refresh period in seconds. 0 = manual only.
    #[serde(default)]
    pub refresh_interval: u64,
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "https://sho.rt/api").
    pub api_base_url: String,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override refresh interval.
    pub refresh_interval: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "linkdash", "linkdash").map_or_else(
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
    p.push("linkdash");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, still layering the environment on top.
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

impl Config {
    /// Pick a profile: the named one (which must exist), or the default
    /// profile if it is defined. `Ok(None)` means "use built-in defaults".
    pub fn resolve_profile<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<Option<(&'a str, &'a Profile)>, ConfigError> {
        if let Some(name) = name {
            return self
                .profiles
                .get(name)
                .map(|p| Some((name, p)))
                .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() });
        }
        Ok(self
            .default_profile
            .as_deref()
            .and_then(|name| self.profiles.get(name).map(|p| (name, p))))
    }

    /// Build a `DashboardConfig` for the given (or default) profile.
    pub fn dashboard_config(&self, profile: Option<&str>) -> Result<DashboardConfig, ConfigError> {
        match self.resolve_profile(profile)? {
            Some((_, p)) => profile_to_dashboard_config(p, &self.defaults),
            None => defaults_to_dashboard_config(&self.defaults),
        }
    }
}

/// Build a `DashboardConfig` from a profile, falling back to `defaults`
/// for anything the profile leaves unset.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let api_base_url = parse_base_url(&profile.api_base_url)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(DashboardConfig {
        api_base_url,
        timeout: timeout_from_secs(profile.timeout.or(defaults.timeout)),
        tls,
        refresh_interval_secs: profile.refresh_interval.unwrap_or(defaults.refresh_interval),
    })
}

/// `DashboardConfig` for the built-in backend URL with global defaults.
pub fn defaults_to_dashboard_config(defaults: &Defaults) -> Result<DashboardConfig, ConfigError> {
    let mut config = DashboardConfig::new(parse_base_url(DEFAULT_API_BASE_URL)?);
    config.timeout = timeout_from_secs(defaults.timeout);
    if defaults.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    config.refresh_interval_secs = defaults.refresh_interval;
    Ok(config)
}

/// Validate an API base URL. Only http(s) URLs with a host are accepted.
pub fn parse_base_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.trim().parse().map_err(|e| ConfigError::Validation {
        field: "api_base_url".into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::Validation {
            field: "api_base_url".into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url)
}

fn timeout_from_secs(secs: Option<u64>) -> Option<Duration> {
    secs.filter(|s| *s > 0).map(Duration::from_secs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;

    use super::*;

    fn jail_err(e: &ConfigError) -> figment::Error {
        figment::Error::from(e.to_string())
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = load_config_from(Path::new("nope.toml")).map_err(|e| jail_err(&e))?;
            assert_eq!(cfg, Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                default_profile = "prod"

                [defaults]
                timeout = 30
                refresh_interval = 60

                [profiles.prod]
                api_base_url = "https://sho.rt/api"
                refresh_interval = 15
                "#,
            )?;
            jail.set_env("LINKDASH_DEFAULTS__TIMEOUT", "5");

            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| jail_err(&e))?;
            assert_eq!(cfg.default_profile.as_deref(), Some("prod"));
            assert_eq!(cfg.defaults.timeout, Some(5));

            let dash = cfg.dashboard_config(None).map_err(|e| jail_err(&e))?;
            assert_eq!(dash.api_base_url.as_str(), "https://sho.rt/api");
            assert_eq!(dash.timeout, Some(Duration::from_secs(5)));
            assert_eq!(dash.refresh_interval_secs, 15);
            assert_eq!(dash.tls, TlsVerification::SystemDefaults);
            Ok(())
        });
    }

    #[test]
    fn unknown_named_profile_is_an_error() {
        let cfg = Config::default();
        let err = cfg.dashboard_config(Some("staging")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { ref name } if name == "staging"));
    }

    #[test]
    fn missing_default_profile_uses_builtin_url() {
        let dash = Config::default().dashboard_config(None).unwrap();
        assert_eq!(dash.api_base_url.as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(dash.timeout, None);
        assert_eq!(dash.refresh_interval_secs, 0);
    }

    #[test]
    fn insecure_wins_over_ca_cert() {
        let profile = Profile {
            api_base_url: "https://sho.rt/api".into(),
            ca_cert: Some("/etc/ca.pem".into()),
            insecure: Some(true),
            timeout: Some(0),
            refresh_interval: None,
        };
        let dash = profile_to_dashboard_config(&profile, &Defaults::default()).unwrap();
        assert_eq!(dash.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(dash.timeout, None, "0 means no timeout");

        let secure = Profile {
            insecure: None,
            ..profile
        };
        let dash = profile_to_dashboard_config(&secure, &Defaults::default()).unwrap();
        assert_eq!(dash.tls, TlsVerification::CustomCa("/etc/ca.pem".into()));
    }

    #[test]
    fn base_url_validation() {
        assert!(parse_base_url("http://localhost:3000/api").is_ok());
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("ftp://files.example.com").is_err());
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                api_base_url: "http://localhost:3000/api".into(),
                ca_cert: None,
                insecure: None,
                timeout: Some(10),
                refresh_interval: Some(30),
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[profiles.default]"));

        let loaded: Config = toml::from_str(&written).unwrap();
        assert_eq!(loaded, cfg);
    }
}
