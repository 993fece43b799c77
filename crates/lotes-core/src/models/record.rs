//! Records extracted from real-estate contracts and their reconciled forms.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw text recovered from the leading pages of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentText {
    /// Document identifier (usually the file name).
    pub document: String,

    /// Recovered text.
    pub text: String,
}

/// Labeled scalar fields found in one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Document identifier.
    pub document: String,

    /// Lot number ("Lote").
    pub lot: Option<String>,

    /// Block identifier ("Quadra").
    pub block: Option<String>,

    /// Contract total ("TOTAL").
    pub total: Option<Decimal>,

    /// Brokerage commission ("COMISSÃO DE CORRETAGEM").
    pub commission: Option<Decimal>,

    /// `total + commission`, present only when both are.
    pub sum: Option<Decimal>,
}

impl ExtractedRecord {
    /// Build a record, deriving `sum` from `total` and `commission`.
    pub fn new(
        document: impl Into<String>,
        lot: Option<String>,
        block: Option<String>,
        total: Option<Decimal>,
        commission: Option<Decimal>,
    ) -> Self {
        let sum = match (total, commission) {
            (Some(t), Some(c)) => t.checked_add(c),
            _ => None,
        };

        Self {
            document: document.into(),
            lot,
            block,
            total,
            commission,
            sum,
        }
    }

    /// Number of the four labeled fields that were found.
    pub fn fields_found(&self) -> usize {
        [
            self.lot.is_some(),
            self.block.is_some(),
            self.total.is_some(),
            self.commission.is_some(),
        ]
        .iter()
        .filter(|found| **found)
        .count()
    }
}

/// One row of a contract's payment schedule ("Cronograma de Pagamento").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleLine {
    /// Document identifier.
    pub document: String,

    /// Lot inherited from the parent document.
    pub lot: Option<String>,

    /// Block inherited from the parent document.
    pub block: Option<String>,

    /// Line item description.
    pub description: String,

    /// Total value of the installment series.
    pub series_total: Option<Decimal>,

    /// Installment count, as printed.
    pub installment_count: String,

    /// Due date of the first installment, as printed.
    pub first_due_date: String,

    /// Amount of the first installment.
    pub first_installment: Option<Decimal>,

    /// Monthly interest rate, as printed.
    pub interest_rate: String,

    /// Correction index, as printed.
    pub correction_index: String,
}

/// One row of the reference price table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub lot: String,
    pub block: String,
    pub price: Decimal,
}

/// Difference between a reference price and a computed amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variance {
    /// Reference price for the row's (lot, block), if one matched.
    pub reference_price: Option<Decimal>,

    /// `reference_price - compared amount`.
    pub variance: Option<Decimal>,

    /// `variance / reference_price * 100`.
    pub variance_percent: Option<Decimal>,
}

impl Variance {
    /// Compute the variance of `compared` against `reference_price`.
    ///
    /// Every component stays absent when an operand is absent, and the
    /// percentage stays absent when the reference price is zero.
    pub fn between(reference_price: Option<Decimal>, compared: Option<Decimal>) -> Self {
        let variance = match (reference_price, compared) {
            (Some(reference), Some(amount)) => reference.checked_sub(amount),
            _ => None,
        };

        let variance_percent = match (variance, reference_price) {
            (Some(diff), Some(reference)) if !reference.is_zero() => diff
                .checked_div(reference)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED)),
            _ => None,
        };

        Self {
            reference_price,
            variance,
            variance_percent,
        }
    }
}

/// A source row joined against the reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciled<T> {
    /// The source row, unchanged.
    pub source: T,

    /// Reference price and variance for the row.
    pub variance: Variance,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_sum_requires_both_amounts() {
        let record = ExtractedRecord::new("a.pdf", None, None, Some(dec("1234.56")), Some(dec("100.00")));
        assert_eq!(record.sum, Some(dec("1334.56")));

        let record = ExtractedRecord::new("a.pdf", None, None, Some(dec("1234.56")), None);
        assert_eq!(record.sum, None);

        let record = ExtractedRecord::new("a.pdf", None, None, None, Some(dec("100")));
        assert_eq!(record.sum, None);
    }

    #[test]
    fn test_fields_found() {
        let record = ExtractedRecord::new(
            "a.pdf",
            Some("12".to_string()),
            None,
            Some(dec("10")),
            None,
        );
        assert_eq!(record.fields_found(), 2);
    }

    #[test]
    fn test_variance_between() {
        let variance = Variance::between(Some(dec("200")), Some(dec("150")));
        assert_eq!(
            variance,
            Variance {
                reference_price: Some(dec("200")),
                variance: Some(dec("50")),
                variance_percent: Some(dec("25")),
            }
        );
    }

    #[test]
    fn test_variance_absent_operand_is_not_zero() {
        let variance = Variance::between(Some(dec("200")), None);
        assert_eq!(variance.reference_price, Some(dec("200")));
        assert_eq!(variance.variance, None);
        assert_eq!(variance.variance_percent, None);

        assert_eq!(Variance::between(None, Some(dec("5"))), Variance::default());
    }

    #[test]
    fn test_variance_zero_reference_has_no_percent() {
        let variance = Variance::between(Some(Decimal::ZERO), Some(dec("10")));
        assert_eq!(variance.variance, Some(dec("-10")));
        assert_eq!(variance.variance_percent, None);
    }
}
