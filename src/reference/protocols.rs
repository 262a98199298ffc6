use std::collections::HashMap;
use std::path::Path;

use log::{debug, info, warn};

use crate::error::FlowTagError;
use crate::reference::table::ReferenceTable;

/// Protocol name used when a protocol number is not in the registry.
pub const UNDEFINED_PROTOCOL: &str = "Undefined";

const DECIMAL_COLUMN: &str = "Decimal";
const KEYWORD_COLUMN: &str = "Keyword";

/// Protocol numbers (as text) to registry keywords, e.g. `6` -> `TCP`.
///
/// Keywords are stored as written; case folding happens in [`ProtocolMap::resolve`].
#[derive(Debug, Clone, Default)]
pub struct ProtocolMap {
    names: HashMap<String, String>,
}

impl ProtocolMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a table with `Decimal` and `Keyword` columns. Later rows
    /// overwrite earlier rows with the same number.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlowTagError> {
        let mut table = ReferenceTable::open(path, &[DECIMAL_COLUMN, KEYWORD_COLUMN])?;
        let mut map = Self::new();
        let mut overwritten = 0;

        let rows = table.for_each_row(|row| {
            if let Some(previous) = map.insert(row[0], row[1]) {
                debug!("Protocol {} redefined (was {})", row[0].trim(), previous);
                overwritten += 1;
            }
        })?;

        if map.is_empty() {
            warn!(
                "Protocol table {} has no entries; every protocol resolves to {}",
                table.path().display(),
                UNDEFINED_PROTOCOL
            );
        }
        info!(
            "Loaded {} protocol numbers from {} ({} rows, {} overwritten)",
            map.len(),
            table.path().display(),
            rows,
            overwritten
        );
        Ok(map)
    }

    /// Insert a mapping, trimming both sides. Returns the replaced keyword, if any.
    pub fn insert(&mut self, number: &str, keyword: &str) -> Option<String> {
        self.names
            .insert(number.trim().to_string(), keyword.trim().to_string())
    }

    pub fn keyword(&self, number: &str) -> Option<&str> {
        self.names.get(number).map(String::as_str)
    }

    /// Lowercased protocol name for a protocol number, `undefined` when unknown.
    pub fn resolve(&self, number: &str) -> String {
        self.keyword(number)
            .unwrap_or(UNDEFINED_PROTOCOL)
            .to_lowercase()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
