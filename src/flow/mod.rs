pub mod classifier;
pub mod record;

pub use classifier::{Classification, FlowClassifier, FlowCounts};
pub use record::{FlowField, FlowRecord};
