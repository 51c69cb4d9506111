//! CLI configuration: TOML profiles merged with `OPENHAB_*` environment
//! variables, with CLI flags taking priority over both.
//!
//! The config file is optional — a bare `OPENHAB_BASE_URL` is enough to
//! run, which is how the scheduler invokes the crawler in practice.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use habindex_core::CrawlerConfig;

use crate::cli::{CrawlArgs, GlobalOpts};
use crate::error::CliError;

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// A named server profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g. "http://openhab:8080").
    pub base_url: String,

    /// API token (plaintext — prefer token_env).
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    pub token_env: Option<String>,

    /// Override the artifact directory.
    pub data_dir: Option<PathBuf>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override detail-fetch concurrency.
    pub concurrency: Option<usize>,
}

// ── Config file path / loading ──────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "habindex", "habindex").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("habindex");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Load the full Config from file + environment, defaulting when the file
/// doesn't exist.
pub fn load_config_or_default() -> Config {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("OPENHAB_").split("__"));

    figment.extract().unwrap_or_default()
}

// ── Resolution to CrawlerConfig ─────────────────────────────────────

/// Build a [`CrawlerConfig`] from profile + env + CLI flags.
///
/// Priority: CLI flag > environment (via clap `env=`) > profile > default.
pub fn resolve(global: &GlobalOpts, crawl: Option<&CrawlArgs>) -> Result<CrawlerConfig, CliError> {
    let file = load_config_or_default();
    let profile = active_profile(global, &file)?;

    // 1. Base URL
    let base_url_str = global
        .base_url
        .as_deref()
        .or(profile.map(|p| p.base_url.as_str()))
        .ok_or_else(|| CliError::NoBaseUrl {
            path: config_path().display().to_string(),
        })?;
    let base_url: url::Url = base_url_str.parse().map_err(|_| CliError::Validation {
        field: "base-url".into(),
        reason: format!("invalid URL: {base_url_str}"),
    })?;

    let mut config = CrawlerConfig::new(base_url);

    // 2. Token (flag/env > profile token_env > profile plaintext)
    if let Some(token) = resolve_token(global, profile) {
        config.token = Some(token);
    }

    // 3. Artifact directory
    if let Some(dir) = global
        .data_dir
        .clone()
        .or_else(|| profile.and_then(|p| p.data_dir.clone()))
    {
        config.data_dir = dir;
    }

    // 4. Timeout
    if let Some(secs) = global.timeout.or_else(|| profile.and_then(|p| p.timeout)) {
        config.timeout = Duration::from_secs(secs);
    }

    // 5. Crawl-only knobs
    if let Some(args) = crawl {
        config.fetch_details = args.details;
        if let Some(n) = args
            .concurrency
            .or_else(|| profile.and_then(|p| p.concurrency))
        {
            config.concurrency = n;
        }
    }

    Ok(config)
}

/// Resolve just the artifact directory — for commands that read the index
/// without talking to a server.
pub fn resolve_data_dir(global: &GlobalOpts) -> Result<PathBuf, CliError> {
    let file = load_config_or_default();
    let profile = active_profile(global, &file)?;

    Ok(global
        .data_dir
        .clone()
        .or_else(|| profile.and_then(|p| p.data_dir.clone()))
        .unwrap_or_else(|| PathBuf::from("data")))
}

/// Pick the active profile: `--profile` must exist; otherwise the config's
/// `default_profile` is used when present, and no profile is fine too.
fn active_profile<'a>(
    global: &GlobalOpts,
    file: &'a Config,
) -> Result<Option<&'a Profile>, CliError> {
    if let Some(ref name) = global.profile {
        return file
            .profiles
            .get(name)
            .map(Some)
            .ok_or_else(|| CliError::ProfileNotFound {
                name: name.clone(),
                available: {
                    let mut names: Vec<&str> =
                        file.profiles.keys().map(String::as_str).collect();
                    names.sort_unstable();
                    names.join(", ")
                },
            });
    }

    Ok(file
        .default_profile
        .as_ref()
        .and_then(|name| file.profiles.get(name)))
}

fn resolve_token(global: &GlobalOpts, profile: Option<&Profile>) -> Option<SecretString> {
    // CLI flag or OPENHAB_API_TOKEN (clap env) takes priority.
    if let Some(ref token) = global.token {
        return Some(SecretString::from(token.clone()));
    }

    let profile = profile?;

    if let Some(ref env_name) = profile.token_env {
        if let Ok(value) = std::env::var(env_name) {
            return Some(SecretString::from(value));
        }
    }

    profile.token.clone().map(SecretString::from)
}
