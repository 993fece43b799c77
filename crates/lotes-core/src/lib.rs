//! Core library for real-estate contract extraction.
//!
//! This crate provides:
//! - PDF text recovery for the leading pages of a contract
//! - Field extraction (lot, block, total, brokerage commission)
//! - Payment schedule decoding
//! - Reconciliation against a reference price table
//! - CSV report export

pub mod error;
pub mod models;
pub mod pdf;
pub mod contract;
pub mod reconcile;
pub mod report;

pub use error::{LotesError, PdfError, ReferenceError, Result};
pub use models::config::{BlockPattern, LotesConfig};
pub use models::record::{DocumentText, ExtractedRecord, Reconciled, ReferenceEntry, ScheduleLine, Variance};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use contract::{ContractParser, ExtractionResult, PatternContractParser};
pub use reconcile::{reconcile, Reconcilable, ReferenceTable};
pub use report::{Reconciliation, Report};
