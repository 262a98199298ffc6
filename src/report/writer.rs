use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::FlowTagError;
use crate::flow::FlowCounts;

pub const TAG_SECTION: &str = "Tag Counts:";
pub const TAG_HEADER: &str = "Tag,Count";
pub const PORT_PROTOCOL_SECTION: &str = "Port/Protocol Combination Counts:";
pub const PORT_PROTOCOL_HEADER: &str = "Port,Protocol,Count";

/// Write both count sections to `out`, entries in first-seen order.
pub fn write_report<W: Write>(counts: &FlowCounts, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", TAG_SECTION)?;
    writeln!(out, "{}", TAG_HEADER)?;
    for (tag, count) in &counts.tag_counts {
        writeln!(out, "{},{}", tag, count)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", PORT_PROTOCOL_SECTION)?;
    writeln!(out, "{}", PORT_PROTOCOL_HEADER)?;
    for ((port, protocol), count) in &counts.port_protocol_counts {
        writeln!(out, "{},{},{}", port, protocol, count)?;
    }

    Ok(())
}

/// Create (or truncate) `path` and write the report to it.
pub fn write_report_file(counts: &FlowCounts, path: impl AsRef<Path>) -> Result<(), FlowTagError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| FlowTagError::file_access(path, e))?;
    let mut out = BufWriter::new(file);

    write_report(counts, &mut out)
        .and_then(|_| out.flush())
        .map_err(|e| FlowTagError::file_access(path, e))?;

    info!(
        "Wrote {} tag rows and {} port/protocol rows to {}",
        counts.tag_counts.len(),
        counts.port_protocol_counts.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_report(counts: &FlowCounts) -> String {
        let mut buf = Vec::new();
        write_report(counts, &mut buf).expect("write to Vec");
        String::from_utf8(buf).expect("report is UTF-8")
    }

    fn sample_counts() -> FlowCounts {
        let mut counts = FlowCounts::new();
        counts.tag_counts.insert("sv_P1".to_string(), 2);
        counts.tag_counts.insert("Untagged".to_string(), 1);
        counts
            .port_protocol_counts
            .insert(("23".to_string(), "tcp".to_string()), 2);
        counts
            .port_protocol_counts
            .insert(("999".to_string(), "udp".to_string()), 1);
        counts
    }

    #[test]
    fn test_report_layout() {
        let expected = "Tag Counts:\n\
                        Tag,Count\n\
                        sv_P1,2\n\
                        Untagged,1\n\
                        \n\
                        Port/Protocol Combination Counts:\n\
                        Port,Protocol,Count\n\
                        23,tcp,2\n\
                        999,udp,1\n";
        assert_eq!(render_report(&sample_counts()), expected);
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(
            render_report(&FlowCounts::new()),
            "Tag Counts:\nTag,Count\n\nPort/Protocol Combination Counts:\nPort,Protocol,Count\n"
        );
    }

    #[test]
    fn test_write_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_counts.txt");

        write_report_file(&sample_counts(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), render_report(&sample_counts()));
    }

    #[test]
    fn test_write_report_file_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.txt");

        let err = write_report_file(&sample_counts(), &path).unwrap_err();
        assert!(matches!(err, FlowTagError::FileAccess { .. }));
    }
}
