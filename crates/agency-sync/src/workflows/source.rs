//! Boundary to the stored-procedure extracts.
//!
//! Rows arrive positional; each agency turns them into named records through its own
//! column table before any validation happens.

use std::io::Read;
use std::path::PathBuf;

/// One positional row as returned by a stored procedure. Blank fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    fields: Vec<Option<String>>,
}

impl RawRecord {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|field| field.map(Into::into).and_then(non_blank))
            .collect();
        Self { fields }
    }

    /// Builds a record from plain strings, treating empty strings as missing.
    pub fn from_strs(fields: &[&str]) -> Self {
        Self::new(fields.iter().map(|value| Some(*value)))
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).and_then(|field| field.as_deref())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Executes a stored procedure and hands back its rows in order.
pub trait RowSource {
    fn fetch(&mut self, procedure: &str) -> Result<Vec<RawRecord>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("procedure name '{0}' cannot be mapped to an export")]
    InvalidProcedure(String),
    #[error("failed to read export '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid export data: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads procedure results from CSV exports named `<procedure>.csv`.
#[derive(Debug, Clone)]
pub struct CsvExportSource {
    export_dir: PathBuf,
}

impl CsvExportSource {
    pub fn new<P: Into<PathBuf>>(export_dir: P) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    fn export_path(&self, procedure: &str) -> Result<PathBuf, SourceError> {
        let name = procedure.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(SourceError::InvalidProcedure(procedure.to_string()));
        }
        Ok(self.export_dir.join(format!("{name}.csv")))
    }
}

impl RowSource for CsvExportSource {
    fn fetch(&mut self, procedure: &str) -> Result<Vec<RawRecord>, SourceError> {
        let path = self.export_path(procedure)?;
        tracing::debug!(procedure, path = %path.display(), "reading procedure export");
        let file = std::fs::File::open(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        parse_export(file)
    }
}

/// Parses a headed CSV export; the header row is skipped and columns stay positional.
pub fn parse_export<R: Read>(reader: R) -> Result<Vec<RawRecord>, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        rows.push(RawRecord::new(record.iter().map(Some)));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn blank_fields_become_missing() {
        let record = RawRecord::from_strs(&["1000", "", "  ", "Ivanov"]);
        assert_eq!(record.get(0), Some("1000"));
        assert_eq!(record.get(1), None);
        assert_eq!(record.get(2), None);
        assert_eq!(record.get(3), Some("Ivanov"));
        assert_eq!(record.get(10), None);
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn export_parser_keeps_column_order_and_ragged_rows() {
        let rows = parse_export(Cursor::new(
            "company,tab,surname\n1000,12, Petrov \n1000,13\n",
        ))
        .expect("parse");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(2), Some("Petrov"));
        assert_eq!(rows[1].get(1), Some("13"));
        assert_eq!(rows[1].get(2), None);
    }

    #[test]
    fn export_source_rejects_path_like_procedures() {
        let mut source = CsvExportSource::new("exports");
        let error = source.fetch("../secrets").expect_err("rejected");
        assert!(matches!(error, SourceError::InvalidProcedure(_)));
    }

    #[test]
    fn export_source_reads_procedure_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("GetAeroEmployees.csv"),
            "a,b\nx,y\n",
        )
        .expect("write export");

        let mut source = CsvExportSource::new(dir.path());
        let rows = source.fetch("GetAeroEmployees").expect("rows");
        assert_eq!(rows, vec![RawRecord::from_strs(&["x", "y"])]);
    }

    #[test]
    fn export_source_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut source = CsvExportSource::new(dir.path());
        let error = source.fetch("Missing").expect_err("io error");
        assert!(matches!(error, SourceError::Io { .. }));
    }
}
