use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::types::Row;

/// Read a raw source CSV into rows numbered from 1. Every cell is text;
/// null spellings are left for the cleaners.
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<(usize, Row)>> {
    let path = path.as_ref();
    let rows = read_rows_from(File::open(path)?)?;
    info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn read_rows_from<R: Read>(reader: R) -> Result<Vec<(usize, Row)>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = Row::from_pairs(headers.iter().zip(record.iter()));
        rows.push((index + 1, row));
    }
    Ok(rows)
}
