//! Reconciliation of extracted amounts against a reference price table.

mod reference;

pub use reference::ReferenceTable;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::record::{ExtractedRecord, Reconciled, ScheduleLine, Variance};

/// A row that can be joined against the reference table.
pub trait Reconcilable {
    /// Lot component of the join key.
    fn lot(&self) -> Option<&str>;

    /// Block component of the join key.
    fn block(&self) -> Option<&str>;

    /// Amount compared with the reference price.
    fn compared_amount(&self) -> Option<Decimal>;
}

impl Reconcilable for ExtractedRecord {
    fn lot(&self) -> Option<&str> {
        self.lot.as_deref()
    }

    fn block(&self) -> Option<&str> {
        self.block.as_deref()
    }

    fn compared_amount(&self) -> Option<Decimal> {
        self.sum
    }
}

impl Reconcilable for ScheduleLine {
    fn lot(&self) -> Option<&str> {
        self.lot.as_deref()
    }

    fn block(&self) -> Option<&str> {
        self.block.as_deref()
    }

    fn compared_amount(&self) -> Option<Decimal> {
        self.series_total
    }
}

/// Normalize a (lot, block) pair into a join key.
pub fn normalize_key(lot: &str, block: &str) -> (String, String) {
    (lot.trim().to_string(), block.trim().to_string())
}

/// Left-join `rows` against `table`.
///
/// Every row is kept, in order. Rows without a matching key get an empty
/// [`Variance`].
pub fn reconcile<T>(rows: &[T], table: &ReferenceTable) -> Vec<Reconciled<T>>
where
    T: Reconcilable + Clone,
{
    let mut matched = 0;

    let reconciled: Vec<Reconciled<T>> = rows
        .iter()
        .map(|row| {
            let reference_price = match (row.lot(), row.block()) {
                (Some(lot), Some(block)) => table.price(lot, block),
                _ => None,
            };
            if reference_price.is_some() {
                matched += 1;
            }

            Reconciled {
                source: row.clone(),
                variance: Variance::between(reference_price, row.compared_amount()),
            }
        })
        .collect();

    debug!(
        "Reconciled {} rows against {} reference entries ({} matched)",
        reconciled.len(),
        table.len(),
        matched
    );

    reconciled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::ReferenceEntry;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn table() -> ReferenceTable {
        ReferenceTable::from_entries(vec![
            ReferenceEntry {
                lot: "12".to_string(),
                block: "C1".to_string(),
                price: dec("1500.00"),
            },
            ReferenceEntry {
                lot: "13".to_string(),
                block: "C1".to_string(),
                price: dec("2000.00"),
            },
        ])
    }

    fn record(lot: Option<&str>, block: Option<&str>, total: Option<&str>) -> ExtractedRecord {
        ExtractedRecord::new(
            "c.pdf",
            lot.map(String::from),
            block.map(String::from),
            total.map(dec),
            Some(dec("100.00")),
        )
    }

    #[test]
    fn test_matched_record() {
        let rows = vec![record(Some("12"), Some("C1"), Some("1234.56"))];
        let joined = reconcile(&rows, &table());

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].source, rows[0]);
        assert_eq!(joined[0].variance.reference_price, Some(dec("1500.00")));
        assert_eq!(joined[0].variance.variance, Some(dec("165.44")));
        assert_eq!(
            joined[0].variance.variance_percent.map(|p| p.round_dp(4)),
            Some(dec("11.0293"))
        );
    }

    #[test]
    fn test_unmatched_record_is_kept() {
        let rows = vec![
            record(Some("99"), Some("Z"), Some("10.00")),
            record(None, Some("C1"), Some("10.00")),
        ];
        let joined = reconcile(&rows, &table());

        assert_eq!(joined.len(), 2);
        for (row, source) in joined.iter().zip(&rows) {
            assert_eq!(&row.source, source);
            assert_eq!(row.variance, Variance::default());
        }
    }

    #[test]
    fn test_absent_sum_gives_absent_variance() {
        let rows = vec![record(Some("13"), Some("C1"), None)];
        let joined = reconcile(&rows, &table());

        assert_eq!(joined[0].variance.reference_price, Some(dec("2000.00")));
        assert_eq!(joined[0].variance.variance, None);
        assert_eq!(joined[0].variance.variance_percent, None);
    }

    #[test]
    fn test_keys_are_trimmed() {
        let rows = vec![record(Some(" 12 "), Some("C1 "), Some("1400.00"))];
        let joined = reconcile(&rows, &table());
        assert_eq!(joined[0].variance.variance, Some(Decimal::ZERO));
        assert_eq!(joined[0].variance.variance_percent, Some(Decimal::ZERO));
    }

    #[test]
    fn test_schedule_compares_series_total() {
        let line = ScheduleLine {
            document: "c.pdf".to_string(),
            lot: Some("13".to_string()),
            block: Some("C1".to_string()),
            description: "Mensais".to_string(),
            series_total: Some(dec("1500.00")),
            installment_count: "10".to_string(),
            first_due_date: "01/01/2025".to_string(),
            first_installment: Some(dec("150.00")),
            interest_rate: "0%".to_string(),
            correction_index: "IPCA".to_string(),
        };
        let joined = reconcile(&[line], &table());

        assert_eq!(joined[0].variance.variance, Some(dec("500.00")));
        assert_eq!(joined[0].variance.variance_percent, Some(dec("25")));
    }
}
