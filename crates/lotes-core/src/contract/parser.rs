//! Pattern-based contract parser.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::config::BlockPattern;
use crate::models::record::{DocumentText, ExtractedRecord, ScheduleLine};

use super::rules::{extract_fields, extract_schedule};

/// Result of extracting one contract.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Text the fields were extracted from.
    pub text: DocumentText,
    /// Labeled fields.
    pub record: ExtractedRecord,
    /// Payment schedule rows.
    pub schedule: Vec<ScheduleLine>,
    /// Extraction warnings (fields that were not found).
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for contract parsing.
pub trait ContractParser {
    /// Parse a contract from its recovered text.
    fn parse(&self, document: &str, text: &str) -> ExtractionResult;
}

/// Contract parser driven by labeled regex patterns.
pub struct PatternContractParser {
    /// Block label variant.
    block_pattern: BlockPattern,
}

impl PatternContractParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            block_pattern: BlockPattern::default(),
        }
    }

    /// Set the block label variant.
    pub fn with_block_pattern(mut self, pattern: BlockPattern) -> Self {
        self.block_pattern = pattern;
        self
    }

    fn collect_warnings(record: &ExtractedRecord) -> Vec<String> {
        let mut warnings = Vec::new();

        if record.lot.is_none() {
            warnings.push("lot (\"Lote\") not found".to_string());
        }
        if record.block.is_none() {
            warnings.push("block (\"Quadra\") not found".to_string());
        }
        if record.total.is_none() {
            warnings.push("total (\"TOTAL\") not found".to_string());
        }
        if record.commission.is_none() {
            warnings.push("commission (\"COMISSÃO DE CORRETAGEM\") not found".to_string());
        }

        warnings
    }
}

impl Default for PatternContractParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractParser for PatternContractParser {
    fn parse(&self, document: &str, text: &str) -> ExtractionResult {
        let start = Instant::now();

        let fields = extract_fields(text, self.block_pattern);
        let record = ExtractedRecord::new(
            document,
            fields.lot.map(|m| m.value),
            fields.block.map(|m| m.value),
            fields.total.map(|m| m.value),
            fields.commission.map(|m| m.value),
        );

        let schedule: Vec<ScheduleLine> = extract_schedule(text)
            .into_iter()
            .map(|row| ScheduleLine {
                document: document.to_string(),
                lot: record.lot.clone(),
                block: record.block.clone(),
                description: row.description,
                series_total: row.series_total,
                installment_count: row.installment_count,
                first_due_date: row.first_due_date,
                first_installment: row.first_installment,
                interest_rate: row.interest_rate,
                correction_index: row.correction_index,
            })
            .collect();

        let warnings = Self::collect_warnings(&record);
        for warning in &warnings {
            debug!("{}: {}", document, warning);
        }

        info!(
            "Extracted {}/4 fields and {} schedule rows from {}",
            record.fields_found(),
            schedule.len(),
            document
        );

        ExtractionResult {
            text: DocumentText {
                document: document.to_string(),
                text: text.to_string(),
            },
            record,
            schedule,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_parse_contract() {
        let text = "Lote 12\nQuadra C1\n...TOTAL 1.234,56...COMISSÃO DE CORRETAGEM ... R$ 100,00";
        let result = PatternContractParser::new().parse("contrato.pdf", text);

        assert_eq!(
            result.record,
            ExtractedRecord {
                document: "contrato.pdf".to_string(),
                lot: Some("12".to_string()),
                block: Some("C1".to_string()),
                total: Some(Decimal::from_str("1234.56").unwrap()),
                commission: Some(Decimal::from_str("100.00").unwrap()),
                sum: Some(Decimal::from_str("1334.56").unwrap()),
            }
        );
        assert!(result.warnings.is_empty());
        assert!(result.schedule.is_empty());
        assert_eq!(result.text.text, text);
    }

    #[test]
    fn test_parse_without_labels() {
        let result = PatternContractParser::new().parse("vazio.pdf", "Nada a declarar.");

        assert_eq!(result.record.lot, None);
        assert_eq!(result.record.block, None);
        assert_eq!(result.record.total, None);
        assert_eq!(result.record.commission, None);
        assert_eq!(result.record.sum, None);
        assert_eq!(result.warnings.len(), 4);
    }

    #[test]
    fn test_schedule_inherits_lot_and_block() {
        let text = "Lote 3\nQuadra 9\nCronograma de Pagamento:\n\
            Entrada\n5.000,00\n1\n01/03/2024\n5.000,00\n0%\nINCC\n\
            TOTAL 5.000,00";
        let result = PatternContractParser::new()
            .with_block_pattern(BlockPattern::Digits)
            .parse("c.pdf", text);

        assert_eq!(result.schedule.len(), 1);
        let line = &result.schedule[0];
        assert_eq!(line.document, "c.pdf");
        assert_eq!(line.lot.as_deref(), Some("3"));
        assert_eq!(line.block.as_deref(), Some("9"));
        assert_eq!(line.description, "Entrada");
        assert_eq!(line.correction_index, "INCC");
        assert_eq!(result.record.total, Some(Decimal::from(5000)));
    }
}
