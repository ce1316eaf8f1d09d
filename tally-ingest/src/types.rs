use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::IngestError;

/// Where an upload came from; decides which extractor runs first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Csv,
    Pdf,
}

impl SourceKind {
    /// Pick the kind from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        ext.parse()
    }
}

impl std::str::FromStr for SourceKind {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceKind::Csv),
            "pdf" => Ok(SourceKind::Pdf),
            other => Err(IngestError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Header row plus data rows, exactly as extracted (untrimmed, unmapped)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(SourceKind::from_path(Path::new("stmt.CSV")).unwrap(), SourceKind::Csv);
        assert_eq!(SourceKind::from_path(Path::new("/tmp/a.b.pdf")).unwrap(), SourceKind::Pdf);
        assert!(matches!(
            SourceKind::from_path(Path::new("notes.xlsx")),
            Err(IngestError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }
}
