// Library exports for flow-tagger
pub mod config;
pub mod error;
pub mod flow;
pub mod pipeline;
pub mod reference;
pub mod report;

pub use config::settings;
pub use error::FlowTagError;
pub use flow::{classifier, record};
pub use pipeline::{run, RunSummary};
pub use reference::{lookup, protocols};

// Error types
pub use anyhow::{Error, Result};
