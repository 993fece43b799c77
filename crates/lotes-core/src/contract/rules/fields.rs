//! Labeled scalar fields: lot, block, total and commission.

use regex::Regex;
use rust_decimal::Decimal;

use super::amounts::parse_brl_amount;
use super::patterns::{BLOCK_ALPHANUMERIC, BLOCK_DIGITS, COMMISSION_PATTERN, LOT_PATTERN, TOTAL_PATTERN};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::config::BlockPattern;

fn capture_first(pattern: &Regex, text: &str) -> Option<ExtractionMatch<String>> {
    let caps = pattern.captures(text)?;
    let full_match = caps.get(0)?;
    let value = caps.get(1)?.as_str().trim().to_string();

    Some(
        ExtractionMatch::new(value, full_match.as_str())
            .with_position(full_match.start(), full_match.end()),
    )
}

fn capture_all(pattern: &Regex, text: &str) -> Vec<ExtractionMatch<String>> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let full_match = caps.get(0)?;
            let value = caps.get(1)?.as_str().trim().to_string();
            Some(
                ExtractionMatch::new(value, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            )
        })
        .collect()
}

fn parse_match(m: ExtractionMatch<String>) -> Option<ExtractionMatch<Decimal>> {
    let amount = parse_brl_amount(&m.value)?;
    Some(ExtractionMatch {
        value: amount,
        position: m.position,
        source: m.source,
    })
}

/// Lot number extractor ("Lote 12").
pub struct LotExtractor;

impl LotExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LotExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LotExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        capture_first(&LOT_PATTERN, text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        capture_all(&LOT_PATTERN, text)
    }
}

/// Block extractor ("Quadra C1"), in either label variant.
pub struct BlockExtractor {
    pattern: BlockPattern,
}

impl BlockExtractor {
    pub fn new(pattern: BlockPattern) -> Self {
        Self { pattern }
    }

    fn regex(&self) -> &'static Regex {
        match self.pattern {
            BlockPattern::Alphanumeric => &BLOCK_ALPHANUMERIC,
            BlockPattern::Digits => &BLOCK_DIGITS,
        }
    }
}

impl Default for BlockExtractor {
    fn default() -> Self {
        Self::new(BlockPattern::default())
    }
}

impl FieldExtractor for BlockExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        capture_first(self.regex(), text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        capture_all(self.regex(), text)
    }
}

/// Labeled amount extractor.
///
/// Only the first labeled occurrence counts: if its token is malformed the
/// amount is absent, later occurrences are not consulted.
pub struct AmountExtractor {
    pattern: &'static Regex,
}

impl AmountExtractor {
    /// Contract total ("TOTAL 1.234,56").
    pub fn total() -> Self {
        Self {
            pattern: &TOTAL_PATTERN,
        }
    }

    /// Brokerage commission ("COMISSÃO DE CORRETAGEM ... R$ 100,00").
    pub fn commission() -> Self {
        Self {
            pattern: &COMMISSION_PATTERN,
        }
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        capture_first(self.pattern, text).and_then(parse_match)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        capture_all(self.pattern, text)
            .into_iter()
            .filter_map(parse_match)
            .collect()
    }
}

/// The four labeled fields of a contract.
#[derive(Debug, Clone, Default)]
pub struct ContractFields {
    pub lot: Option<ExtractionMatch<String>>,
    pub block: Option<ExtractionMatch<String>>,
    pub total: Option<ExtractionMatch<Decimal>>,
    pub commission: Option<ExtractionMatch<Decimal>>,
}

/// Extract the labeled fields from contract text.
pub fn extract_fields(text: &str, block_pattern: BlockPattern) -> ContractFields {
    ContractFields {
        lot: LotExtractor::new().extract(text),
        block: BlockExtractor::new(block_pattern).extract(text),
        total: AmountExtractor::total().extract(text),
        commission: AmountExtractor::commission().extract(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const CONTRACT: &str = "Lote 12\nQuadra C1\nValor do imóvel\nTOTAL 1.234,56\n\
        COMISSÃO DE CORRETAGEM\nA ser paga pelo comprador no valor de R$ 100,00";

    #[test]
    fn test_extract_fields() {
        let fields = extract_fields(CONTRACT, BlockPattern::Alphanumeric);

        assert_eq!(fields.lot.unwrap().value, "12");
        assert_eq!(fields.block.unwrap().value, "C1");
        assert_eq!(
            fields.total.unwrap().value,
            Decimal::from_str("1234.56").unwrap()
        );
        assert_eq!(
            fields.commission.unwrap().value,
            Decimal::from_str("100.00").unwrap()
        );
    }

    #[test]
    fn test_digits_block_variant() {
        let fields = extract_fields(CONTRACT, BlockPattern::Digits);
        assert!(fields.block.is_none());

        let fields = extract_fields("Quadra: 07", BlockPattern::Digits);
        assert_eq!(fields.block.unwrap().value, "07");
    }

    #[test]
    fn test_no_labels() {
        let fields = extract_fields("Contrato particular de compra e venda", BlockPattern::default());
        assert!(fields.lot.is_none());
        assert!(fields.block.is_none());
        assert!(fields.total.is_none());
        assert!(fields.commission.is_none());
    }

    #[test]
    fn test_first_match_only() {
        let text = "TOTAL 1.000,00\nTOTAL 2.000,00";
        let extractor = AmountExtractor::total();

        let first = extractor.extract(text).unwrap();
        assert_eq!(first.value, Decimal::from(1000));
        assert_eq!(first.position, Some((0, 14)));
        assert_eq!(extractor.extract_all(text).len(), 2);
    }

    #[test]
    fn test_lot_requires_whitespace() {
        assert!(LotExtractor::new().extract("Loteamento 5").is_none());
        assert_eq!(LotExtractor::new().extract("lote   33").unwrap().value, "33");
    }
}
