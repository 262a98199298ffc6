/// Positional fields of a version 2 flow log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowField {
    Version = 0,
    AccountId,
    InterfaceId,
    SrcAddr,
    DstAddr,
    DstPort,
    SrcPort,
    Protocol,
    Packets,
    Bytes,
    Start,
    End,
    Action,
    LogStatus,
}

impl FlowField {
    pub const COUNT: usize = 14;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// The fields of a flow record used for classification, borrowed from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowRecord<'a> {
    pub dst_port: &'a str,
    pub protocol: &'a str,
}

impl<'a> FlowRecord<'a> {
    /// Parse a whitespace-separated record. Returns `None` unless the line has
    /// exactly [`FlowField::COUNT`] fields.
    pub fn parse(line: &'a str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != FlowField::COUNT {
            return None;
        }

        Some(Self {
            dst_port: fields[FlowField::DstPort.index()],
            protocol: fields[FlowField::Protocol.index()],
        })
    }
}
