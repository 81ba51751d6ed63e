//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.marquee/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catalog::SortBy;
use crate::catalog::client::DEFAULT_TMDB_BASE_URL;
use crate::paging::PagingConfig;
use crate::paging::state::{DEFAULT_PAGE_SIZE, DEFAULT_PREFETCH_DISTANCE};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MarqueeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub paging: PagingSection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_sort: Option<SortBy>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub language: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PagingSection {
    pub page_size: Option<usize>,
    pub prefetch_distance: Option<usize>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub sort_by: SortBy,
    /// Still optional here: a missing key is reported when the client is built.
    pub api_key: Option<String>,
    pub base_url: String,
    pub language: Option<String>,
    pub region: Option<String>,
    pub paging: PagingConfig,
}

/// CLI overrides (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub sort_by: Option<SortBy>,
    pub api_key: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.marquee`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".marquee"))
}

/// Returns the path to `~/.marquee/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Load config from `~/.marquee/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `MarqueeConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<MarqueeConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(MarqueeConfig::default())
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<MarqueeConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(MarqueeConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: MarqueeConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config.general);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Marquee Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_sort = "popularity"       # popularity, rating, release_date, revenue, upcoming

# [tmdb]
# api_key = "..."                    # Or set TMDB_API_KEY env var
# base_url = "https://api.themoviedb.org/3"
# language = "en-US"
# region = "US"

# [paging]
# page_size = 20
# prefetch_distance = 5
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &MarqueeConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |name| std::env::var(name).ok())
}

fn resolve_with_env(
    config: &MarqueeConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Sort: CLI → env → config → default
    let sort_by = cli
        .sort_by
        .or_else(|| env("MARQUEE_SORT").and_then(|s| parse_sort(&s)))
        .or(config.general.default_sort)
        .unwrap_or_default();

    // API key: CLI → env → config
    let api_key = cli
        .api_key
        .clone()
        .or_else(|| env("TMDB_API_KEY"))
        .or_else(|| config.tmdb.api_key.clone());

    // Base URL: env → config → default
    let base_url = env("TMDB_BASE_URL")
        .or_else(|| config.tmdb.base_url.clone())
        .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string());

    let paging = PagingConfig {
        page_size: config.paging.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
        prefetch_distance: config
            .paging
            .prefetch_distance
            .unwrap_or(DEFAULT_PREFETCH_DISTANCE),
        enable_placeholders: false,
    };

    ResolvedConfig {
        sort_by,
        api_key,
        base_url,
        language: config.tmdb.language.clone(),
        region: config.tmdb.region.clone(),
        paging,
    }
}

fn parse_sort(value: &str) -> Option<SortBy> {
    use clap::ValueEnum;
    let parsed = SortBy::from_str(value, true).ok();
    if parsed.is_none() {
        warn!("Ignoring unknown MARQUEE_SORT value: {}", value);
    }
    parsed
}
