//! CLI configuration: TOML profiles plus flag/env resolution.
//!
//! Profiles live at the platform config dir (e.g.
//! `~/.config/airpush/config.toml` on Linux) and are merged with
//! `AIRPUSH_*` environment variables via figment. CLI flags win over both.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use airpush_acquisition::{ClientConfiguration, TlsMode, TransportConfig};

use crate::cli::GlobalOpts;
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

/// A named update-server profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Update server base URL (e.g. "https://codepush.appcenter.ms").
    pub server_url: Option<String>,

    /// Deployment key (release channel).
    pub deployment_key: Option<String>,

    /// Native binary version to present.
    pub app_version: Option<String>,

    /// Stable client identifier.
    pub client_id: Option<String>,

    /// Host package identifier for request attribution.
    pub package_name: Option<String>,

    /// Query as a companion app.
    #[serde(default)]
    pub companion: bool,

    /// Accept self-signed TLS certificates.
    #[serde(default)]
    pub insecure: bool,
}

// ── Loading ─────────────────────────────────────────────────────────

/// Path of the TOML config file.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "airpush")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("airpush.toml"))
}

/// Load configuration, falling back to defaults when no file exists.
pub fn load_config_or_default() -> Result<Config, CliError> {
    load_config_from(&config_path())
}

/// Load configuration from an explicit path (separated out for tests).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, CliError> {
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AIRPUSH_CONFIG_"))
        .extract()?;
    Ok(config)
}

// ── Resolution ──────────────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Resolved settings ready to construct a client from.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub client: ClientConfiguration,
    pub transport: TransportConfig,
}

/// Translate config + flags into client and transport configuration.
///
/// Flags (and their env fallbacks, handled by clap) take priority over
/// profile values. A profile named explicitly with `--profile` must exist;
/// the implicit default profile may be absent as long as the required
/// values arrive via flags.
pub fn resolve(global: &GlobalOpts, config: &Config) -> Result<ResolvedConfig, CliError> {
    let profile_name = active_profile_name(global, config);
    let fallback = Profile::default();
    let profile = match config.profiles.get(&profile_name) {
        Some(profile) => profile,
        None if global.profile.is_some() => {
            let mut available: Vec<&str> =
                config.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available.join(", "),
            });
        }
        None => &fallback,
    };

    let server_url = require(
        global.server_url.as_deref().or(profile.server_url.as_deref()),
        "server_url",
        "server-url",
        "AIRPUSH_SERVER_URL",
    )?;
    let deployment_key = require(
        global
            .deployment_key
            .as_deref()
            .or(profile.deployment_key.as_deref()),
        "deployment_key",
        "deployment-key",
        "AIRPUSH_DEPLOYMENT_KEY",
    )?;
    let app_version = require(
        global.app_version.as_deref().or(profile.app_version.as_deref()),
        "app_version",
        "app-version",
        "AIRPUSH_APP_VERSION",
    )?;

    let client_unique_id = global.client_id.clone().or_else(|| profile.client_id.clone());
    let package_name = profile.package_name.clone();

    let tls = if global.insecure || profile.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };

    Ok(ResolvedConfig {
        client: ClientConfiguration {
            server_url,
            app_version,
            client_unique_id,
            deployment_key,
            ignore_app_version: global.companion || profile.companion,
            package_name: package_name.clone(),
        },
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(global.timeout),
            package_name,
        },
    })
}

fn require(
    value: Option<&str>,
    field: &str,
    flag: &str,
    env: &str,
) -> Result<String, CliError> {
    value.map(str::to_owned).ok_or_else(|| CliError::MissingValue {
        field: field.to_owned(),
        flag: flag.to_owned(),
        env: env.to_owned(),
        path: config_path().display().to_string(),
    })
}
