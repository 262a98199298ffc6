use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowTagError {
    #[error("Cannot access '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Table '{}' has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Table '{}' line {line}: no value for column '{column}'", path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        column: String,
    },

    #[error("Failed to read table '{}': {source}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid configuration file '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl FlowTagError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FlowTagError::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Reader failures that are I/O problems are reported as `FileAccess`.
    pub fn table(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        let io_error = match source.kind() {
            csv::ErrorKind::Io(err) => Some(std::io::Error::new(err.kind(), err.to_string())),
            _ => None,
        };

        match io_error {
            Some(source) => FlowTagError::file_access(path, source),
            None => FlowTagError::Table {
                path: path.into(),
                source,
            },
        }
    }
}
