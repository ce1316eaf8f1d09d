//! tally-finance: aggregation, filtering, export and the per-upload pipeline

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod pipeline;

pub use aggregate::{daily, monthly, running_total, summarize, DailyFlow, MonthlyFlow, RunningPoint, Summary};
pub use export::{to_csv_string, write_csv};
pub use filter::by_description;
pub use pipeline::{process_upload, Dashboard, PipelineOptions, Upload};
