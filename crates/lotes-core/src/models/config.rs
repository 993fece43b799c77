//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the lotes pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LotesConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Reference price table configuration.
    pub reference: ReferenceConfig,

    /// Report export configuration.
    pub export: ExportConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Number of leading pages whose text is extracted (0 = all pages).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { max_pages: 3 }
    }
}

/// Which token the "Quadra" label accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BlockPattern {
    /// Letters and digits, e.g. "C1".
    #[default]
    Alphanumeric,
    /// Digits only, e.g. "7".
    Digits,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Block label variant.
    pub block_pattern: BlockPattern,
}

/// Reference price table configuration.
///
/// Column names are compared case-insensitively after trimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Accepted header names for the lot column.
    pub lot_columns: Vec<String>,

    /// Accepted header names for the block column.
    pub block_columns: Vec<String>,

    /// Accepted header names for the reference price column.
    pub price_columns: Vec<String>,

    /// Field delimiter of delimited reference tables.
    pub delimiter: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            lot_columns: vec!["lote".to_string(), "lot".to_string()],
            block_columns: vec!["quadra".to_string(), "block".to_string()],
            price_columns: vec![
                "valor".to_string(),
                "valor referencia".to_string(),
                "valor de referência".to_string(),
                "preco".to_string(),
                "preço".to_string(),
                "price".to_string(),
                "reference price".to_string(),
            ],
            delimiter: ",".to_string(),
        }
    }
}

/// Report export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Field delimiter of exported CSV files.
    pub delimiter: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
        }
    }
}

impl LotesConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

/// Convert a one-character delimiter setting to the byte the csv crate expects.
pub fn delimiter_byte(delimiter: &str) -> Option<u8> {
    match delimiter.as_bytes() {
        [byte] => Some(*byte),
        _ if delimiter == "\\t" => Some(b'\t'),
        _ => None,
    }
}
