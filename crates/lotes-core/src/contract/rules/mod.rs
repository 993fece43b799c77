//! Rule-based field extractors for real-estate contracts.

pub mod amounts;
pub mod fields;
pub mod patterns;
pub mod schedule;

pub use amounts::{format_brl_amount, format_brl_amount_opt, parse_brl_amount, parse_brl_amount_opt};
pub use fields::{extract_fields, AmountExtractor, BlockExtractor, ContractFields, LotExtractor};
pub use schedule::{decode_schedule_lines, extract_schedule, find_schedule_block, ScheduleRow};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value matched in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
