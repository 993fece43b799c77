//! Common regex patterns for contract extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Brazilian numeric token: "1.234,56", "100,00", "1234".
pub const BRL_NUMBER: &str = r"\d[\d.]*(?:,\d+)?";

lazy_static! {
    // Lot number: "Lote 12"
    pub static ref LOT_PATTERN: Regex = Regex::new(
        r"(?i)Lote\s+(\d+)"
    ).unwrap();

    // Block: "Quadra C1", "Quadra: 07"
    pub static ref BLOCK_ALPHANUMERIC: Regex = Regex::new(
        r"(?i)Quadra[^A-Za-z0-9]*([A-Za-z0-9]+)"
    ).unwrap();

    pub static ref BLOCK_DIGITS: Regex = Regex::new(
        r"(?i)Quadra[^A-Za-z0-9]*(\d+)"
    ).unwrap();

    // Contract total: "TOTAL 1.234,56"
    pub static ref TOTAL_PATTERN: Regex = Regex::new(
        &format!(r"(?i)TOTAL\s+({BRL_NUMBER})")
    ).unwrap();

    // Commission, possibly several lines below its label
    pub static ref COMMISSION_PATTERN: Regex = Regex::new(
        &format!(r"(?is)COMISSÃO\s+DE\s+CORRETAGEM.*?R\$\s*({BRL_NUMBER})")
    ).unwrap();

    // Payment schedule block, anchored on the first numeric TOTAL after it
    pub static ref SCHEDULE_BLOCK: Regex = Regex::new(
        &format!(r"(?s)Cronograma de Pagamento:(.*?)TOTAL\s+{BRL_NUMBER}")
    ).unwrap();

    // Column header printed above the schedule rows
    pub static ref SCHEDULE_HEADER: Regex = Regex::new(
        r"(?s)Descrição.*?Correção"
    ).unwrap();

    // Reference document line: "<lot> <block> <price>"
    pub static ref REFERENCE_LINE: Regex = Regex::new(
        &format!(r"(?m)^[ \t]*(\d+)[ \t]+(\S+)[ \t]+({BRL_NUMBER})")
    ).unwrap();
}
