pub mod lookup;
pub mod protocols;
pub mod table;

pub use lookup::{LookupTable, PortProtocol, UNTAGGED};
pub use protocols::{ProtocolMap, UNDEFINED_PROTOCOL};
pub use table::ReferenceTable;
