//! Reference price table loading.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::normalize_key;
use crate::contract::rules::amounts::parse_brl_amount;
use crate::contract::rules::patterns::REFERENCE_LINE;
use crate::error::{ReferenceError, Result as LotesResult};
use crate::models::config::{delimiter_byte, ReferenceConfig};
use crate::models::record::ReferenceEntry;
use crate::pdf::read_leading_text;

/// Reference prices keyed by normalized (lot, block).
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: Vec<ReferenceEntry>,
    index: HashMap<(String, String), usize>,
}

impl ReferenceTable {
    /// Build a table from entries. The first entry for a key wins.
    pub fn from_entries(entries: impl IntoIterator<Item = ReferenceEntry>) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    fn insert(&mut self, entry: ReferenceEntry) {
        let key = normalize_key(&entry.lot, &entry.block);
        if self.index.contains_key(&key) {
            warn!(
                "Duplicate reference entry for lot {} block {}, keeping the first",
                key.0, key.1
            );
            return;
        }

        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(ReferenceEntry {
            lot: key.0,
            block: key.1,
            price: entry.price,
        });
    }

    /// Load a delimited table with a header row.
    ///
    /// Fails with [`ReferenceError::MissingColumn`] when the lot, block or
    /// price column cannot be found. Rows with an unreadable price are
    /// skipped.
    pub fn from_csv_reader<R: Read>(
        reader: R,
        config: &ReferenceConfig,
    ) -> Result<Self, ReferenceError> {
        let delimiter = delimiter_byte(&config.delimiter)
            .ok_or_else(|| ReferenceError::InvalidDelimiter(config.delimiter.clone()))?;

        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ReferenceError::NoHeader);
        }

        let lot_idx = find_column(&headers, "lot", &config.lot_columns)?;
        let block_idx = find_column(&headers, "block", &config.block_columns)?;
        let price_idx = find_column(&headers, "price", &config.price_columns)?;

        let mut table = Self::default();
        for (row_num, record) in rdr.records().enumerate() {
            let record = record?;
            let lot = record.get(lot_idx).unwrap_or("").trim();
            let block = record.get(block_idx).unwrap_or("").trim();
            let raw_price = record.get(price_idx).unwrap_or("");

            if lot.is_empty() || block.is_empty() {
                debug!("Skipping reference row {}: empty key", row_num + 2);
                continue;
            }

            match parse_brl_amount(raw_price) {
                Some(price) => table.insert(ReferenceEntry {
                    lot: lot.to_string(),
                    block: block.to_string(),
                    price,
                }),
                None => warn!(
                    "Skipping reference row {}: unreadable price {:?}",
                    row_num + 2,
                    raw_price
                ),
            }
        }

        debug!("Loaded {} reference entries", table.len());
        Ok(table)
    }

    /// Build a table from the text of a reference document.
    ///
    /// Each line of the form `<lot digits> <block> <price>` becomes an entry.
    pub fn from_document_text(text: &str) -> Self {
        let entries = REFERENCE_LINE.captures_iter(text).filter_map(|caps| {
            let price = parse_brl_amount(&caps[3])?;
            Some(ReferenceEntry {
                lot: caps[1].to_string(),
                block: caps[2].to_string(),
                price,
            })
        });

        let table = Self::from_entries(entries);
        debug!("Found {} reference entries in document text", table.len());
        table
    }

    /// Load a reference table from a file, by extension: `.csv` is read as a
    /// delimited table, `.pdf` (every page) and `.txt` as a reference
    /// document.
    pub fn from_path(path: &Path, config: &ReferenceConfig) -> LotesResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let table = match extension.as_str() {
            "csv" => Self::from_csv_reader(File::open(path)?, config)?,
            "pdf" => Self::from_document_text(&read_leading_text(path, 0)?),
            "txt" => Self::from_document_text(&fs::read_to_string(path)?),
            _ => return Err(ReferenceError::UnsupportedFormat(extension).into()),
        };

        Ok(table)
    }

    /// Reference price for a (lot, block) pair.
    pub fn price(&self, lot: &str, block: &str) -> Option<Decimal> {
        self.index
            .get(&normalize_key(lot, block))
            .map(|&i| self.entries[i].price)
    }

    /// Entries in load order.
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn find_column(
    headers: &[String],
    column: &str,
    candidates: &[String],
) -> Result<usize, ReferenceError> {
    headers
        .iter()
        .position(|h| {
            candidates
                .iter()
                .any(|c| c.trim().to_lowercase() == h.to_lowercase())
        })
        .ok_or_else(|| ReferenceError::MissingColumn {
            column: column.to_string(),
            expected: candidates.to_vec(),
            found: headers.to_vec(),
        })
}
