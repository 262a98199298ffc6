use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FlowTagError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub inputs: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub protocol_table: PathBuf,
    pub lookup_table: PathBuf,
    pub flow_log: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub report: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            protocol_table: PathBuf::from("inputfiles/protocol_number_mapping.csv"),
            lookup_table: PathBuf::from("inputfiles/lookup_table_refer.csv"),
            flow_log: PathBuf::from("inputfiles/flow_log_data.txt"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report: PathBuf::from("outputfiles/output_counts.txt"),
        }
    }
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, FlowTagError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FlowTagError::file_access(path, e))?;
        toml::from_str(&content).map_err(|source| FlowTagError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
