//! Data models for extracted contract data and configuration.

pub mod config;
pub mod record;

pub use config::{BlockPattern, LotesConfig};
pub use record::{
    DocumentText, ExtractedRecord, Reconciled, ReferenceEntry, ScheduleLine, Variance,
};
