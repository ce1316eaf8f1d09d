use thiserror::Error;

/// Terminal failures for one upload. Nothing is retried; the user re-uploads.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing required column '{column}' (found: {found})")]
    MissingColumn { column: &'static str, found: String },

    #[error("no table rows found in the statement")]
    EmptyTable,

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("row {row}: cannot read {column} value '{value}'")]
    Coercion {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, IngestError>;
