use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::dashboard::locale::display_date_time;
use crate::upstream::SensorReading;

pub const CSV_HEADER: [&str; 7] = [
    "No",
    "Waktu",
    "Device ID",
    "Suhu (°C)",
    "Kelembaban (%)",
    "Lokasi",
    "Status",
];

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Shown to the user as a blocking alert
    #[error("Tidak ada data untuk diekspor!")]
    Empty,

    #[error("CSV encoding failed: {0}")]
    Csv(String),
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

/// A ready-to-download CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub body: Vec<u8>,
    pub rows: usize,
}

/// `sensor_data_{location}_{YYYY-MM-DD}.csv`
#[must_use]
pub fn export_filename(location_name: &str, date: NaiveDate) -> String {
    format!("sensor_data_{location_name}_{}.csv", date.format("%Y-%m-%d"))
}

/// Serialize the filtered view; numbering starts at 1 regardless of pagination.
///
/// Date, device, location and status are always quoted; the row number
/// and the measurements are written bare.
///
/// # Errors
///
/// Returns `ExportError::Empty` when `view` has no rows, `ExportError::Csv`
/// if encoding fails.
pub fn export_csv(
    view: &[SensorReading],
    location_name: &str,
    tz: Tz,
    today: NaiveDate,
) -> Result<CsvExport, ExportError> {
    if view.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut body = Vec::new();

    // Quoting is decided per column, so fields arrive pre-quoted and the
    // writer only joins them.
    {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(&mut body);

        writer.write_record(CSV_HEADER)?;
        for (idx, reading) in view.iter().enumerate() {
            let status = if reading.is_anomaly { "ANOMALI" } else { "NORMAL" };
            writer.write_record([
                (idx + 1).to_string(),
                quoted(&display_date_time(&reading.timestamp, tz)),
                quoted(reading.device_label()),
                bare(&reading.temperature.to_string()),
                bare(&reading.humidity.to_string()),
                quoted(location_name),
                quoted(status),
            ])?;
        }
        writer.flush().map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    tracing::debug!(rows = view.len(), location = %location_name, "CSV export built");

    Ok(CsvExport {
        filename: export_filename(location_name, today),
        body,
        rows: view.len(),
    })
}

/// Text column: always double-quoted, embedded quotes doubled.
fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Measurement column: bare unless the value would break the record.
fn bare(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quoted(field)
    } else {
        field.to_string()
    }
}
