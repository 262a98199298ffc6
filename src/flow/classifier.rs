use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, info};

use crate::error::FlowTagError;
use crate::flow::record::FlowRecord;
use crate::reference::{LookupTable, PortProtocol, ProtocolMap};

/// Frequency tables accumulated over a flow log, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowCounts {
    pub tag_counts: IndexMap<String, u64>,
    pub port_protocol_counts: IndexMap<(String, String), u64>,
    pub records_processed: u64,
    pub records_skipped: u64,
}

impl FlowCounts {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, tag: &str, port: &str, protocol: String) {
        match self.tag_counts.get_mut(tag) {
            Some(count) => *count += 1,
            None => {
                self.tag_counts.insert(tag.to_string(), 1);
            }
        }
        let index = self
            .port_protocol_counts
            .get_index_of(&PortProtocol(port, &protocol));
        match index {
            Some(index) => self.port_protocol_counts[index] += 1,
            None => {
                self.port_protocol_counts.insert((port.to_string(), protocol), 1);
            }
        }
        self.records_processed += 1;
    }
}

/// Split a chunk read up to `\n` into lines, treating `\n`, `\r\n` and a
/// bare `\r` each as one line break.
fn split_line_breaks(chunk: &str) -> std::str::Split<'_, char> {
    let body = chunk.strip_suffix('\n').unwrap_or(chunk);
    let body = body.strip_suffix('\r').unwrap_or(body);
    body.split('\r')
}

/// Result of classifying one flow record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'t> {
    pub protocol: String,
    pub tag: &'t str,
}

/// Tags flow records against the reference tables.
pub struct FlowClassifier<'t> {
    lookup: &'t LookupTable,
    protocols: &'t ProtocolMap,
}

impl<'t> FlowClassifier<'t> {
    pub fn new(lookup: &'t LookupTable, protocols: &'t ProtocolMap) -> Self {
        Self { lookup, protocols }
    }

    pub fn classify(&self, record: &FlowRecord<'_>) -> Classification<'t> {
        let protocol = self.protocols.resolve(record.protocol);
        let tag = self.lookup.tag_for(record.dst_port, &protocol);
        Classification { protocol, tag }
    }

    /// Classify one line into `counts`. Lines without exactly 14 fields are
    /// counted as skipped and otherwise ignored. Returns whether the line was used.
    pub fn classify_line(&self, line: &str, counts: &mut FlowCounts) -> bool {
        match FlowRecord::parse(line) {
            Some(record) => {
                let Classification { protocol, tag } = self.classify(&record);
                counts.record(tag, record.dst_port, protocol);
                true
            }
            None => {
                counts.records_skipped += 1;
                false
            }
        }
    }

    /// Single forward pass over `reader`, one line at a time.
    pub fn classify_reader<R: BufRead>(&self, mut reader: R) -> io::Result<FlowCounts> {
        let mut counts = FlowCounts::new();
        let mut buf = Vec::new();
        let mut line_number = 0u64;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let chunk = std::str::from_utf8(&buf)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

            for line in split_line_breaks(chunk) {
                line_number += 1;
                if !self.classify_line(line, &mut counts) {
                    debug!(
                        "Skipping line {}: {} fields",
                        line_number,
                        line.split_whitespace().count()
                    );
                }
            }
        }

        Ok(counts)
    }

    pub fn classify_file(&self, path: impl AsRef<Path>) -> Result<FlowCounts, FlowTagError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FlowTagError::file_access(path, e))?;

        let counts = self
            .classify_reader(BufReader::new(file))
            .map_err(|e| FlowTagError::file_access(path, e))?;

        info!(
            "Classified {} flow records from {} ({} skipped, {} tags, {} port/protocol pairs)",
            counts.records_processed,
            path.display(),
            counts.records_skipped,
            counts.tag_counts.len(),
            counts.port_protocol_counts.len()
        );
        Ok(counts)
    }
}
