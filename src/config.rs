use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level hydrostore configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HydrostoreConfig {
    /// Store location.
    #[serde(default)]
    pub store: StoreToml,

    /// Read and query settings.
    #[serde(default)]
    pub read: ReadToml,

    /// Write settings.
    #[serde(default)]
    pub write: WriteToml,

    /// Pastastore export settings.
    #[serde(default)]
    pub pastas: PastasToml,
}

impl HydrostoreConfig {
    /// Loads the config at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreToml {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub name: Option<String>,
}

impl Default for StoreToml {
    fn default() -> Self {
        Self {
            root: default_root(),
            name: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadToml {
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub items: Option<Vec<String>>,
    #[serde(default)]
    pub extent: Option<[f64; 4]>,
    #[serde(default = "default_true")]
    pub read_series: bool,
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
}

impl Default for ReadToml {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            items: None,
            extent: None,
            read_series: true,
            collection_name: default_collection_name(),
        }
    }
}

fn default_kind() -> String {
    "groundwater".to_string()
}
fn default_true() -> bool {
    true
}
fn default_collection_name() -> String {
    hydrostore_pystore::DEFAULT_COLLECTION_NAME.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriteToml {
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
    #[serde(default)]
    pub group_by: Option<String>,
}

impl Default for WriteToml {
    fn default() -> Self {
        Self {
            overwrite: false,
            compression: default_compression(),
            row_group_size: default_row_group_size(),
            group_by: None,
        }
    }
}

fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PastasToml {
    #[serde(default = "default_connector")]
    pub connector: String,
    #[serde(default = "default_obs_column")]
    pub obs_column: String,
    #[serde(default = "default_series_kind")]
    pub kind: String,
    #[serde(default = "default_true")]
    pub add_metadata: bool,
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for PastasToml {
    fn default() -> Self {
        Self {
            connector: default_connector(),
            obs_column: default_obs_column(),
            kind: default_series_kind(),
            add_metadata: true,
            overwrite: false,
        }
    }
}

fn default_connector() -> String {
    "my_conn".to_string()
}
fn default_obs_column() -> String {
    "stand_m_tov_nap".to_string()
}
fn default_series_kind() -> String {
    "oseries".to_string()
}
