pub mod analyzers;
pub mod config;
pub mod error;
pub mod output;
pub mod records;
pub mod source;

pub use error::AnalyticsError;
pub use records::SubmissionRecord;
