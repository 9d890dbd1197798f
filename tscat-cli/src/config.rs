//! Configuration file and locale precedence for the CLI.
//!
//! The locale is taken from, in order: `--locale`, `TSCAT_LOCALE`, the
//! config file's `locale` key, `LC_ALL`, `LANG`, then `en`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tscat::{ResolverOptions, locale::normalize_env_locale};

/// Environment variable naming the config file.
pub const TSCAT_CONFIG_ENV: &str = "TSCAT_CONFIG";
/// Environment variable overriding the locale.
pub const TSCAT_LOCALE_ENV: &str = "TSCAT_LOCALE";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "tscat.toml";

const FALLBACK_LOCALE: &str = "en";

/// Read-only environment access, so precedence can be tested without
/// touching the process environment.
pub trait EnvProvider {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Default, Copy, Clone)]
pub struct SystemEnv;

impl EnvProvider for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Contents of `tscat.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub locale: Option<String>,
    pub fallback_locales: Vec<String>,
    /// Catalog paths or glob patterns loaded when no `-i` is given.
    pub catalogs: Vec<String>,
    pub use_unfinished: Option<bool>,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Invalid config: {}", e))
    }

    /// Resolver options seeded from this config and the resolved locale.
    pub fn resolver_options(&self, locale: &str) -> ResolverOptions {
        ResolverOptions::new()
            .with_default_locale(locale)
            .with_fallback_locales(self.fallback_locales.clone())
            .with_unfinished(self.use_unfinished.unwrap_or(true))
    }
}

/// Loads the config file.
///
/// An explicit path (flag or `TSCAT_CONFIG`) must exist; the default
/// `tscat.toml` is optional.
pub fn load_config(explicit: Option<&Path>, env: &impl EnvProvider) -> Result<Config, String> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match env.var(TSCAT_CONFIG_ENV) {
            Some(path) if !path.trim().is_empty() => (PathBuf::from(path), true),
            _ => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        },
    };

    if !path.exists() {
        if required {
            return Err(format!("Config file does not exist: {}", path.display()));
        }
        return Ok(Config::default());
    }

    let text = std::fs::read_to_string(&path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    let config = Config::from_toml(&text)
        .map_err(|e| format!("{} ({})", e, path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Picks the locale by precedence. Values that are not locale tags are
/// skipped.
pub fn resolve_locale(flag: Option<&str>, config: &Config, env: &impl EnvProvider) -> String {
    let env_locale = env.var(TSCAT_LOCALE_ENV);
    let lc_all = env.var("LC_ALL");
    let lang = env.var("LANG");
    [
        flag,
        env_locale.as_deref(),
        config.locale.as_deref(),
        lc_all.as_deref(),
        lang.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find_map(normalize_env_locale)
    .unwrap_or_else(|| FALLBACK_LOCALE.to_string())
}
