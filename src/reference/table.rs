use std::fs::File;
use std::path::{Path, PathBuf};

use log::trace;

use crate::error::FlowTagError;

/// A headed, comma-delimited reference table with a fixed set of required
/// columns. Columns are matched by exact header name, the last one winning
/// when a name repeats; any others are ignored.
pub struct ReferenceTable {
    path: PathBuf,
    reader: csv::Reader<File>,
    required: Vec<&'static str>,
    indices: Vec<usize>,
}

impl ReferenceTable {
    pub fn open(path: impl AsRef<Path>, required: &[&'static str]) -> Result<Self, FlowTagError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|e| FlowTagError::file_access(&path, e))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|source| FlowTagError::table(&path, source))?
            .clone();

        let indices = required
            .iter()
            .map(|column| {
                headers
                    .iter()
                    .enumerate()
                    .filter(|(_, header)| header == column)
                    .map(|(index, _)| index)
                    .last()
                    .ok_or_else(|| FlowTagError::MissingColumn {
                        path: path.clone(),
                        column: column.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path,
            reader,
            required: required.to_vec(),
            indices,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Feeds every data row to `visit` in file order, with the values of the
    /// required columns in the order they were requested. Returns the number
    /// of rows visited.
    pub fn for_each_row<F>(&mut self, mut visit: F) -> Result<usize, FlowTagError>
    where
        F: FnMut(&[&str]),
    {
        let mut rows = 0;

        for record in self.reader.records() {
            let record = record.map_err(|source| FlowTagError::table(&self.path, source))?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let values = self
                .indices
                .iter()
                .zip(&self.required)
                .map(|(&index, &column)| {
                    record.get(index).ok_or_else(|| FlowTagError::MalformedRow {
                        path: self.path.clone(),
                        line,
                        column: column.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            trace!("{}:{} {:?}", self.path.display(), line, values);
            visit(&values);
            rows += 1;
        }

        Ok(rows)
    }
}
