use crate::aggregate::RangeRecord;
use crate::analysis::error::AnalyzeError;
use std::io;
use std::path::Path;

pub const CSV_HEADER: [&str; 6] = [
    "timestamp",
    "source_node",
    "node_id",
    "target_id",
    "distance",
    "rx_power",
];

/// Write the range history as CSV, header first. Returns the number of rows.
pub fn write_csv<W: io::Write>(ranges: &[RangeRecord], writer: W) -> Result<usize, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;

    for record in ranges {
        let m = &record.measurement;
        wtr.write_record([
            m.timestamp.to_string(),
            record.source_node.to_string(),
            m.source.to_string(),
            m.target_text.clone(),
            m.distance_m.to_string(),
            m.rx_power_dbm.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(ranges.len())
}

pub fn export_csv(ranges: &[RangeRecord], path: &Path) -> Result<usize, AnalyzeError> {
    let export_error = |source| AnalyzeError::Export {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::create(path).map_err(|e| export_error(csv::Error::from(e)))?;
    let rows = write_csv(ranges, file).map_err(export_error)?;

    tracing::info!(file = %path.display(), rows, "exported range measurements");
    Ok(rows)
}
