use std::path::Path;

use indexmap::{Equivalent, IndexMap};
use log::{debug, info, warn};

use crate::error::FlowTagError;
use crate::reference::table::ReferenceTable;

/// Tag assigned when no lookup entry matches.
pub const UNTAGGED: &str = "Untagged";

const PORT_COLUMN: &str = "dstport";
const PROTOCOL_COLUMN: &str = "protocol";
const TAG_COLUMN: &str = "tag";

/// Borrowed (port, protocol) key, usable to query maps keyed by `(String, String)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortProtocol<'a>(pub &'a str, pub &'a str);

impl Equivalent<(String, String)> for PortProtocol<'_> {
    fn equivalent(&self, key: &(String, String)) -> bool {
        self.0 == key.0 && self.1 == key.1
    }
}

/// (destination port, lowercase protocol name) -> tag.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    tags: IndexMap<(String, String), String>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlowTagError> {
        let mut table =
            ReferenceTable::open(path, &[PORT_COLUMN, PROTOCOL_COLUMN, TAG_COLUMN])?;
        let mut lookup = Self::new();
        let mut overwritten = 0;

        let rows = table.for_each_row(|row| {
            if let Some(previous) = lookup.insert(row[0], row[1], row[2]) {
                debug!(
                    "Lookup entry {}/{} redefined: {} -> {}",
                    row[0].trim(),
                    row[1].trim().to_lowercase(),
                    previous,
                    row[2].trim()
                );
                overwritten += 1;
            }
        })?;

        if lookup.is_empty() {
            warn!(
                "Lookup table {} has no entries; every flow will be {}",
                table.path().display(),
                UNTAGGED
            );
        }
        info!(
            "Loaded {} lookup entries from {} ({} rows, {} overwritten)",
            lookup.len(),
            table.path().display(),
            rows,
            overwritten
        );
        Ok(lookup)
    }

    /// Insert an entry. Port and tag are trimmed, protocol is trimmed and
    /// lowercased. Returns the replaced tag, if any.
    pub fn insert(&mut self, port: &str, protocol: &str, tag: &str) -> Option<String> {
        let key = (port.trim().to_string(), protocol.trim().to_lowercase());
        self.tags.insert(key, tag.trim().to_string())
    }

    /// `protocol` must already be lowercase.
    pub fn get(&self, port: &str, protocol: &str) -> Option<&str> {
        self.tags
            .get(&PortProtocol(port, protocol))
            .map(String::as_str)
    }

    pub fn tag_for(&self, port: &str, protocol: &str) -> &str {
        self.get(port, protocol).unwrap_or(UNTAGGED)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
