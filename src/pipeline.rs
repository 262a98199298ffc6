use std::path::PathBuf;

use log::info;

use crate::config::Config;
use crate::error::FlowTagError;
use crate::flow::FlowClassifier;
use crate::reference::{LookupTable, ProtocolMap};
use crate::report;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub report: PathBuf,
    pub records_processed: u64,
    pub records_skipped: u64,
    pub distinct_tags: usize,
    pub distinct_port_protocols: usize,
}

/// Load both reference tables, classify the flow log, and write the report.
/// Stops at the first error; the report is only created once classification
/// has finished.
pub fn run(config: &Config) -> Result<RunSummary, FlowTagError> {
    let protocols = ProtocolMap::load(&config.inputs.protocol_table)?;
    let lookup = LookupTable::load(&config.inputs.lookup_table)?;

    let classifier = FlowClassifier::new(&lookup, &protocols);
    let counts = classifier.classify_file(&config.inputs.flow_log)?;

    report::write_report_file(&counts, &config.output.report)?;
    info!("Report complete: {}", config.output.report.display());

    Ok(RunSummary {
        report: config.output.report.clone(),
        records_processed: counts.records_processed,
        records_skipped: counts.records_skipped,
        distinct_tags: counts.tag_counts.len(),
        distinct_port_protocols: counts.port_protocol_counts.len(),
    })
}
