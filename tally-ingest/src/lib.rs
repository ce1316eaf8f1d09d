//! tally-ingest: statement intake (CSV / PDF tables), header aliasing and
//! cell coercion into normalized records.

pub mod aliases;
pub mod coerce;
pub mod csv_source;
pub mod error;
pub mod normalize;
pub mod pdf_source;
pub mod types;

pub use aliases::{CanonicalField, ColumnMap};
pub use csv_source::read_csv_table;
pub use error::IngestError;
pub use normalize::{
    normalize, BadAmountPolicy, BadDatePolicy, NormalizeOptions, NormalizeReport, Normalized,
};
pub use pdf_source::{read_pdf_table, PdfOptions};
pub use types::{RawTable, SourceKind};
