use async_trait::async_trait;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

use crate::app::ports::CleanOutputPort;
use crate::constants::NULL_MARKER;
use crate::error::{CleanerError, Result};
use crate::types::Row;

pub const REMOVAL_REASON_COLUMN: &str = "removal_reason";

/// One output file. The header is taken from the first row written and
/// later rows are laid out in that column order. A later row may lack header
/// columns (written as null) but may not bring new ones.
struct CsvSink {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
    header: Vec<String>,
    rows_written: usize,
}

impl CsvSink {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            writer: None,
            header: Vec::new(),
            rows_written: 0,
        }
    }

    fn write(&mut self, row: &Row, reason: Option<&str>) -> Result<()> {
        if self.writer.is_none() {
            let mut writer = csv::Writer::from_path(&self.path)?;
            self.header = row.columns().map(str::to_string).collect();
            let mut header_record: Vec<&str> = self.header.iter().map(String::as_str).collect();
            if reason.is_some() {
                header_record.push(REMOVAL_REASON_COLUMN);
            }
            writer.write_record(&header_record)?;
            self.writer = Some(writer);
        } else if let Some(unknown) = row
            .columns()
            .find(|column| !self.header.iter().any(|h| h == *column))
        {
            return Err(CleanerError::Output(format!(
                "column '{}' is not in the header of {}",
                unknown,
                self.path.display()
            )));
        }

        let mut record: Vec<String> = self
            .header
            .iter()
            .map(|column| {
                row.get(column)
                    .map(ToString::to_string)
                    .unwrap_or_else(|| NULL_MARKER.to_string())
            })
            .collect();
        if let Some(reason) = reason {
            record.push(reason.to_string());
        }

        if let Some(writer) = self.writer.as_mut() {
            writer.write_record(&record)?;
        }
        self.rows_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Writes `<table>.cleaned.csv` and `<table>.removed.csv` into the output
/// directory. Null values are written as the null marker.
pub struct CsvCleanOutput {
    cleaned: Mutex<CsvSink>,
    removed: Mutex<CsvSink>,
}

impl CsvCleanOutput {
    pub fn create<P: AsRef<Path>>(output_dir: P, table: &str) -> Result<Self> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;

        let cleaned_path = output_dir.join(format!("{}.cleaned.csv", table));
        let removed_path = output_dir.join(format!("{}.removed.csv", table));
        info!("Creating cleaning output files:");
        info!("  Cleaned: {}", cleaned_path.display());
        info!("  Removed: {}", removed_path.display());

        Ok(Self {
            cleaned: Mutex::new(CsvSink::new(cleaned_path)),
            removed: Mutex::new(CsvSink::new(removed_path)),
        })
    }
}

#[async_trait]
impl CleanOutputPort for CsvCleanOutput {
    async fn write_cleaned(&self, row: &Row) -> Result<()> {
        self.cleaned.lock().await.write(row, None)
    }

    async fn write_removed(&self, row: &Row, reason: &str) -> Result<()> {
        self.removed.lock().await.write(row, Some(reason))
    }

    async fn finish(&self) -> Result<()> {
        let mut cleaned = self.cleaned.lock().await;
        let mut removed = self.removed.lock().await;
        cleaned.flush()?;
        removed.flush()?;
        info!(
            cleaned = cleaned.rows_written,
            removed = removed.rows_written,
            "Cleaning output flushed"
        );
        Ok(())
    }
}
