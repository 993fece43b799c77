//! Tabular reports and CSV export.
//!
//! Amounts are written in Brazilian format with two decimals; absent values
//! are written as empty cells.

use std::io::Write;

use csv::WriterBuilder;

use crate::contract::rules::amounts::format_brl_amount_opt;
use crate::contract::ExtractionResult;
use crate::error::{LotesError, Result};
use crate::models::config::delimiter_byte;
use crate::models::record::{DocumentText, ExtractedRecord, Reconciled, ScheduleLine, Variance};
use crate::reconcile::{reconcile, ReferenceTable};

const TEXT_HEADER: [&str; 2] = ["document", "text"];

const RECORD_HEADER: [&str; 7] = [
    "document",
    "lot",
    "block",
    "total",
    "commission",
    "sum",
    "fields_found",
];

const SCHEDULE_HEADER: [&str; 10] = [
    "document",
    "lot",
    "block",
    "description",
    "series_total",
    "installment_count",
    "first_due_date",
    "first_installment",
    "interest_rate",
    "correction_index",
];

const VARIANCE_HEADER: [&str; 3] = ["reference_price", "variance", "variance_percent"];

/// Tables accumulated over a set of documents.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub texts: Vec<DocumentText>,
    pub records: Vec<ExtractedRecord>,
    pub schedule: Vec<ScheduleLine>,
}

/// Record and schedule tables joined against a reference table.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub records: Vec<Reconciled<ExtractedRecord>>,
    pub schedule: Vec<Reconciled<ScheduleLine>>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one document's extraction.
    pub fn push(&mut self, result: ExtractionResult) {
        self.texts.push(result.text);
        self.records.push(result.record);
        self.schedule.extend(result.schedule);
    }

    /// Join the records and schedule lines against `table`.
    pub fn reconcile(&self, table: &ReferenceTable) -> Reconciliation {
        Reconciliation {
            records: reconcile(&self.records, table),
            schedule: reconcile(&self.schedule, table),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<ExtractionResult> for Report {
    fn from_iter<I: IntoIterator<Item = ExtractionResult>>(iter: I) -> Self {
        let mut report = Self::new();
        for result in iter {
            report.push(result);
        }
        report
    }
}

fn writer<W: Write>(w: W, delimiter: &str) -> Result<csv::Writer<W>> {
    let delimiter = delimiter_byte(delimiter)
        .ok_or_else(|| LotesError::Config(format!("invalid export delimiter: {:?}", delimiter)))?;
    Ok(WriterBuilder::new().delimiter(delimiter).from_writer(w))
}

fn record_fields(record: &ExtractedRecord) -> Vec<String> {
    vec![
        record.document.clone(),
        record.lot.clone().unwrap_or_default(),
        record.block.clone().unwrap_or_default(),
        format_brl_amount_opt(record.total),
        format_brl_amount_opt(record.commission),
        format_brl_amount_opt(record.sum),
        record.fields_found().to_string(),
    ]
}

fn schedule_fields(line: &ScheduleLine) -> Vec<String> {
    vec![
        line.document.clone(),
        line.lot.clone().unwrap_or_default(),
        line.block.clone().unwrap_or_default(),
        line.description.clone(),
        format_brl_amount_opt(line.series_total),
        line.installment_count.clone(),
        line.first_due_date.clone(),
        format_brl_amount_opt(line.first_installment),
        line.interest_rate.clone(),
        line.correction_index.clone(),
    ]
}

fn variance_fields(variance: &Variance) -> [String; 3] {
    [
        format_brl_amount_opt(variance.reference_price),
        format_brl_amount_opt(variance.variance),
        format_brl_amount_opt(variance.variance_percent),
    ]
}

/// Write the raw text table.
pub fn write_texts<W: Write>(w: W, texts: &[DocumentText], delimiter: &str) -> Result<()> {
    let mut wtr = writer(w, delimiter)?;
    wtr.write_record(TEXT_HEADER)?;
    for text in texts {
        wtr.write_record([text.document.as_str(), text.text.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the structured fields table.
pub fn write_records<W: Write>(w: W, records: &[ExtractedRecord], delimiter: &str) -> Result<()> {
    let mut wtr = writer(w, delimiter)?;
    wtr.write_record(RECORD_HEADER)?;
    for record in records {
        wtr.write_record(record_fields(record))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the schedule lines table.
pub fn write_schedule<W: Write>(w: W, lines: &[ScheduleLine], delimiter: &str) -> Result<()> {
    let mut wtr = writer(w, delimiter)?;
    wtr.write_record(SCHEDULE_HEADER)?;
    for line in lines {
        wtr.write_record(schedule_fields(line))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the record reconciliation table.
pub fn write_record_reconciliation<W: Write>(
    w: W,
    rows: &[Reconciled<ExtractedRecord>],
    delimiter: &str,
) -> Result<()> {
    let mut wtr = writer(w, delimiter)?;
    wtr.write_record(RECORD_HEADER.iter().chain(VARIANCE_HEADER.iter()))?;
    for row in rows {
        let mut fields = record_fields(&row.source);
        fields.extend(variance_fields(&row.variance));
        wtr.write_record(fields)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the schedule reconciliation table.
pub fn write_schedule_reconciliation<W: Write>(
    w: W,
    rows: &[Reconciled<ScheduleLine>],
    delimiter: &str,
) -> Result<()> {
    let mut wtr = writer(w, delimiter)?;
    wtr.write_record(SCHEDULE_HEADER.iter().chain(VARIANCE_HEADER.iter()))?;
    for row in rows {
        let mut fields = schedule_fields(&row.source);
        fields.extend(variance_fields(&row.variance));
        wtr.write_record(fields)?;
    }
    wtr.flush()?;
    Ok(())
}
