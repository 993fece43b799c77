//! Contract field and payment schedule extraction.

mod parser;
pub mod rules;

pub use parser::{ContractParser, ExtractionResult, PatternContractParser};
