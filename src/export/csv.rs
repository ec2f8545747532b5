use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::models::SampleRecord;

pub const CSV_HEADER: [&str; 8] = [
    "timestamp", "accX", "accY", "accZ", "gyroX", "gyroY", "gyroZ", "label",
];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub path: PathBuf,
    pub rows: usize,
}

/// Writes a sample buffer to a single CSV file, replacing whatever was there.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn export(&self, records: &[SampleRecord]) -> Result<ExportReport> {
        let text = serialize(records)?;
        write_to_file(&text, &self.path)?;
        Ok(ExportReport {
            path: self.path.clone(),
            rows: records.len(),
        })
    }
}

/// Header plus one `\n`-terminated line per record, in buffer order.
///
/// Labels containing a delimiter, quote or line break are quoted with inner
/// quotes doubled. Finite floats are written in plain decimal form with at
/// least one fractional digit; NaN and infinities as `NaN`, `inf`, `-inf`.
pub fn serialize(records: &[SampleRecord]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .context("failed to write csv header")?;

    for record in records {
        let acc = record.acc();
        let gyro = record.gyro();
        writer
            .write_record([
                record.timestamp().to_string().as_str(),
                format_axis(acc.x).as_str(),
                format_axis(acc.y).as_str(),
                format_axis(acc.z).as_str(),
                format_axis(gyro.x).as_str(),
                format_axis(gyro.y).as_str(),
                format_axis(gyro.z).as_str(),
                record.label(),
            ])
            .with_context(|| format!("failed to write csv row at {}", record.timestamp()))?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    String::from_utf8(bytes).context("csv output was not valid UTF-8")
}

/// Overwrites `path` with `text`. Not atomic.
pub fn write_to_file(text: &str, path: &Path) -> Result<()> {
    fs::write(path, text).with_context(|| format!("failed to write csv to {}", path.display()))
}

/// `Display` never switches to exponent notation, so only the `.0` for
/// integral values has to be added.
fn format_axis(value: f32) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}
