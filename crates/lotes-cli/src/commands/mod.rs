//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use lotes_core::models::config::LotesConfig;
use lotes_core::pdf::read_leading_text;
use lotes_core::ReferenceTable;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lotes")
        .join("config.json")
}

/// Load configuration from `config_path`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LotesConfig> {
    if let Some(path) = config_path {
        return Ok(LotesConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(LotesConfig::from_file(&default_path)?)
    } else {
        Ok(LotesConfig::default())
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Identifier used for a document in reports.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(String::from)
        .unwrap_or_else(|| path.display().to_string())
}

/// Whether `path` is a supported contract input.
pub fn is_supported_document(path: &Path) -> bool {
    matches!(extension(path).as_str(), "pdf" | "txt")
}

/// Recover the text of a contract.
///
/// PDFs are limited to their first `max_pages` pages; `.txt` files are
/// taken as already-extracted text.
pub fn read_document_text(path: &Path, max_pages: usize) -> anyhow::Result<String> {
    let text = match extension(path).as_str() {
        "pdf" => read_leading_text(path, max_pages)?,
        "txt" => fs::read_to_string(path)?.trim().to_string(),
        other => anyhow::bail!("Unsupported file format: {}", other),
    };

    if text.is_empty() {
        warn!("No text recovered from {}", path.display());
    }

    Ok(text)
}

/// Load a reference price table from a CSV table or a reference document.
pub fn load_reference(path: &Path, config: &LotesConfig) -> anyhow::Result<ReferenceTable> {
    if !path.exists() {
        anyhow::bail!("Reference file not found: {}", path.display());
    }

    let table = ReferenceTable::from_path(path, &config.reference)?;

    if table.is_empty() {
        warn!("Reference table {} has no entries", path.display());
    }

    Ok(table)
}
