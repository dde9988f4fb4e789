use crate::error::InventoryError;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub type OwnerFilter = BTreeSet<String>;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_HOME_REGION: &str = "us-east-1";

/// On-disk configuration. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ConfigFile {
    pub owner_filters: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub shared_output_dir: Option<PathBuf>,
    pub required_tools: Vec<String>,
    pub call_timeout_secs: Option<u64>,
    pub home_region: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, InventoryError> {
        let content = fs::read_to_string(path).map_err(|source| InventoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Values given on the command line or through the environment. They take
/// precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub owner_filters: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub shared_output_dir: Option<PathBuf>,
    pub required_tools: Vec<String>,
    pub call_timeout_secs: Option<u64>,
    pub home_region: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct InventoryConfig {
    pub owner_filter: OwnerFilter,
    pub output_dir: PathBuf,
    pub shared_output_dir: Option<PathBuf>,
    pub required_tools: Vec<String>,
    pub call_timeout: Duration,
    pub home_region: String,
}

impl InventoryConfig {
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Self, InventoryError> {
        let owner_filters = prefer_non_empty(overrides.owner_filters, file.owner_filters);
        let owner_filter: OwnerFilter = owner_filters
            .iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect();
        if let Some(invalid) = owner_filter
            .iter()
            .find(|id| !id.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(InventoryError::Config(format!(
                "owner id `{}` is not a numeric account id",
                invalid
            )));
        }

        let call_timeout_secs = overrides
            .call_timeout_secs
            .or(file.call_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if call_timeout_secs == 0 {
            return Err(InventoryError::Config(
                "call timeout must be at least one second".to_string(),
            ));
        }

        Ok(InventoryConfig {
            owner_filter,
            output_dir: overrides
                .output_dir
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            shared_output_dir: overrides.shared_output_dir.or(file.shared_output_dir),
            required_tools: prefer_non_empty(overrides.required_tools, file.required_tools),
            call_timeout: Duration::from_secs(call_timeout_secs),
            home_region: overrides
                .home_region
                .or(file.home_region)
                .unwrap_or_else(|| DEFAULT_HOME_REGION.to_string()),
        })
    }

    pub fn owner_filter_display(&self) -> Vec<String> {
        self.owner_filter.iter().cloned().collect()
    }
}

fn prefer_non_empty(primary: Vec<String>, fallback: Vec<String>) -> Vec<String> {
    if primary.is_empty() {
        fallback
    } else {
        primary
    }
}
