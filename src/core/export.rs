// RouterLens - core/export.rs
//
// CSV and JSON export of the record table.
// Core layer: writes to any Write trait object.

use crate::core::model::LogRecord;
use crate::util::constants::{EXPORT_COLUMNS, EXPORT_TIMESTAMP_FORMAT};
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export records to CSV as the record sheet.
///
/// Writes: log_id, timestamp, topic, message, ip_addresses, mac_addresses,
/// interface, severity, raw_log. Absent values are written as empty cells.
pub fn export_csv<'a, W, I>(records: I, writer: W, export_path: &Path) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a LogRecord>,
{
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_COLUMNS).map_err(csv_err)?;

    let mut count = 0;
    for record in records {
        let ts = record
            .timestamp
            .map(|t| t.format(EXPORT_TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default();

        csv_writer
            .write_record([
                record.id.to_string().as_str(),
                ts.as_str(),
                record.topic.label(),
                record.message.as_str(),
                record.ip_list().as_str(),
                record.mac_list().as_str(),
                record.interface.as_deref().unwrap_or(""),
                record.severity.label(),
                record.raw_log.as_str(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %export_path.display(), records = count, "CSV export complete");
    Ok(count)
}

/// Export records to JSON format (array of objects).
pub fn export_json<'a, W, I>(records: I, writer: W, export_path: &Path) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a LogRecord>,
{
    let records: Vec<&LogRecord> = records.into_iter().collect();
    write_json(&records, writer, export_path)?;

    tracing::info!(path = %export_path.display(), records = records.len(), "JSON export complete");
    Ok(records.len())
}

/// Pretty-print `value` as JSON and flush `writer`.
///
/// The flush is explicit so a buffered writer reports a failed final
/// write instead of losing it on drop.
pub fn write_json<T, W>(value: &T, mut writer: W, export_path: &Path) -> Result<(), ExportError>
where
    T: serde::Serialize + ?Sized,
    W: Write,
{
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })
}
