//! Configuration file handling and settings resolution
//!
//! Precedence: command-line flag, then environment variable (both via clap),
//! then the TOML file, then the built-in default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use analyses_store::RestStoreConfig;
use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::cli::Cli;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Contents of the optional TOML configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub store: StoreSection,
}

/// `[server]` section
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// `[store]` section
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    pub url: Option<String>,
    pub service_key: Option<String>,
    pub table: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load configuration from a specific path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Where records are served from
#[derive(Debug)]
pub enum StoreSettings {
    Rest(RestStoreConfig),
    Memory { seed: Option<PathBuf> },
}

/// Fully resolved configuration
#[derive(Debug)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub store: StoreSettings,
}

impl Settings {
    /// Merge CLI/env values over the file config.
    ///
    /// Without `--memory`, a missing store URL or key is an error.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self> {
        let host = cli
            .host
            .clone()
            .or(file.server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file.server.port).unwrap_or(DEFAULT_PORT);

        if cli.memory {
            return Ok(Self {
                host,
                port,
                store: StoreSettings::Memory {
                    seed: cli.seed.clone(),
                },
            });
        }

        let Some(url) = cli.store_url.clone().or(file.store.url) else {
            bail!("Store URL is required (--store-url, SUPABASE_URL or [store].url)");
        };
        let Some(service_key) = cli.service_key.clone().or(file.store.service_key) else {
            bail!(
                "Store service key is required \
                 (--service-key, SUPABASE_SERVICE_ROLE_KEY or [store].service_key)"
            );
        };
        if url.trim().is_empty() || service_key.trim().is_empty() {
            bail!("Store URL and service key must not be empty");
        }

        let mut store = RestStoreConfig::new(url, service_key);
        if let Some(table) = cli.table.clone().or(file.store.table) {
            store = store.with_table(table);
        }
        if let Some(secs) = cli.timeout_secs.or(file.store.timeout_secs) {
            if secs == 0 {
                bail!("Store timeout must be at least 1 second");
            }
            let connect_timeout = store.connect_timeout.min(Duration::from_secs(secs));
            store = store.with_timeout(Duration::from_secs(secs), connect_timeout);
        }

        Ok(Self {
            host,
            port,
            store: StoreSettings::Rest(store),
        })
    }
}
