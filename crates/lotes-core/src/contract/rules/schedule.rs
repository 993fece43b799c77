//! Payment schedule ("Cronograma de Pagamento") decoding.
//!
//! The schedule table is recovered from the PDF one cell per line, so rows
//! are rebuilt by reading the cleaned lines in fixed groups of seven. A
//! reordered, missing or extra line shifts every following field and is not
//! detected here.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::amounts::parse_brl_amount;
use super::patterns::{SCHEDULE_BLOCK, SCHEDULE_HEADER};

/// Number of lines that make up one schedule row.
pub const SCHEDULE_STRIDE: usize = 7;

/// A decoded schedule row, before document context is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub description: String,
    pub series_total: Option<Decimal>,
    pub installment_count: String,
    pub first_due_date: String,
    pub first_installment: Option<Decimal>,
    pub interest_rate: String,
    pub correction_index: String,
}

/// Locate the schedule block: the text after "Cronograma de Pagamento:" up
/// to the first "TOTAL <amount>".
pub fn find_schedule_block(text: &str) -> Option<&str> {
    SCHEDULE_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Strip the column header and blank lines from a schedule block.
pub fn schedule_lines(block: &str) -> Vec<String> {
    let cleaned = SCHEDULE_HEADER.replace_all(block, "");

    cleaned
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect()
}

/// Decode cleaned schedule lines into rows of [`SCHEDULE_STRIDE`] lines.
///
/// A trailing group shorter than the stride is dropped.
pub fn decode_schedule_lines<S: AsRef<str>>(lines: &[S]) -> Vec<ScheduleRow> {
    let remainder = lines.len() % SCHEDULE_STRIDE;
    if remainder != 0 {
        debug!(
            "Schedule has {} lines, dropping {} trailing line(s)",
            lines.len(),
            remainder
        );
    }

    lines
        .chunks_exact(SCHEDULE_STRIDE)
        .map(|chunk| {
            let field = |i: usize| chunk[i].as_ref().to_string();
            let row = ScheduleRow {
                description: field(0),
                series_total: parse_brl_amount(chunk[1].as_ref()),
                installment_count: field(2),
                first_due_date: field(3),
                first_installment: parse_brl_amount(chunk[4].as_ref()),
                interest_rate: field(5),
                correction_index: field(6),
            };
            trace!("Decoded schedule row: {:?}", row);
            row
        })
        .collect()
}

/// Extract the payment schedule rows from contract text.
///
/// Returns an empty vector when the document has no schedule block.
pub fn extract_schedule(text: &str) -> Vec<ScheduleRow> {
    match find_schedule_block(text) {
        Some(block) => decode_schedule_lines(&schedule_lines(block)),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn row_lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("linha {i}")).collect()
    }

    #[test]
    fn test_fourteen_lines_make_two_rows() {
        assert_eq!(decode_schedule_lines(&row_lines(14)).len(), 2);
    }

    #[test]
    fn test_partial_trailing_group_is_dropped() {
        assert_eq!(decode_schedule_lines(&row_lines(15)).len(), 2);
        assert_eq!(decode_schedule_lines(&row_lines(6)).len(), 0);
    }

    #[test]
    fn test_extract_schedule() {
        let text = "Contrato\nCronograma de Pagamento:\n\
            Descrição\nValor da Série\nQtd. Parcelas\nVencimento\nValor Parcela\nJuros\nCorreção\n\
            Sinal\n10.000,00\n1\n10/01/2024\n10.000,00\n0,00%\nNenhuma\n\
            \n\
            Mensais\n120.000,00\n120\n10/02/2024\n1.000,00\n0,5%\nIPCA\n\
            TOTAL 130.000,00\nFim";

        let rows = extract_schedule(text);
        assert_eq!(rows.len(), 2);

        assert_eq!(
            rows[0],
            ScheduleRow {
                description: "Sinal".to_string(),
                series_total: Some(Decimal::from(10000)),
                installment_count: "1".to_string(),
                first_due_date: "10/01/2024".to_string(),
                first_installment: Some(Decimal::from(10000)),
                interest_rate: "0,00%".to_string(),
                correction_index: "Nenhuma".to_string(),
            }
        );
        assert_eq!(rows[1].description, "Mensais");
        assert_eq!(rows[1].series_total, Some(Decimal::from_str("120000").unwrap()));
        assert_eq!(rows[1].correction_index, "IPCA");
    }

    #[test]
    fn test_missing_block_is_empty() {
        assert!(extract_schedule("Cronograma de Pagamento:\nSinal\n10,00").is_empty());
        assert!(extract_schedule("TOTAL 10,00").is_empty());
    }

    #[test]
    fn test_malformed_amount_is_absent() {
        let mut lines = row_lines(7);
        lines[1] = "a combinar".to_string();
        let rows = decode_schedule_lines(&lines);
        assert_eq!(rows[0].series_total, None);
        assert_eq!(rows[0].first_installment, None);
    }
}
