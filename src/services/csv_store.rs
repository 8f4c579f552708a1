//! Per-symbol CSV persistence.
//!
//! One file per symbol, named deterministically from the bare code. Files
//! start with a UTF-8 BOM so spreadsheet tools keep non-Latin text intact
//! (the same reason the feed's own exports use utf-8-sig).

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::constants::ENRICHED_CSV_HEADER;
use crate::error::{Error, Result};
use crate::models::EnrichedSeries;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Deterministic file path for a symbol's enriched history.
pub fn csv_path(data_dir: &Path, symbol: &str) -> PathBuf {
    data_dir.join(format!("{}.csv", symbol))
}

/// Write the enriched series for one symbol, replacing any previous file.
pub fn write_enriched(data_dir: &Path, series: &EnrichedSeries) -> Result<PathBuf> {
    let path = csv_path(data_dir, &series.symbol);

    let mut file = File::create(&path)
        .map_err(|e| Error::Io(format!("Failed to create {}: {}", path.display(), e)))?;
    file.write_all(UTF8_BOM)
        .map_err(|e| Error::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(ENRICHED_CSV_HEADER)?;

    for bar in &series.bars {
        writer.write_record(&[
            bar.date.format("%Y-%m-%d").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
            bar.ma5.to_string(),
            bar.ma10.to_string(),
            bar.ma20.to_string(),
            bar.macd.to_string(),
            bar.signal.to_string(),
            bar.hist.to_string(),
            bar.rsi.to_string(),
        ])?;
    }

    writer.flush().map_err(|e| Error::Io(e.to_string()))?;
    Ok(path)
}

/// Summary of one stored symbol file, as shown by `status`.
#[derive(Debug)]
pub struct StoredFileInfo {
    pub symbol: String,
    pub rows: usize,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

/// Scan a data directory for per-symbol CSV files.
pub fn scan_data_dir(data_dir: &Path) -> Result<Vec<StoredFileInfo>> {
    let entries = std::fs::read_dir(data_dir)
        .map_err(|e| Error::Io(format!("Failed to read {}: {}", data_dir.display(), e)))?;

    let mut infos = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::Io(e.to_string()))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        let symbol = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };
        infos.push(read_file_info(&path, symbol)?);
    }

    infos.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    Ok(infos)
}

fn read_file_info(path: &Path, symbol: String) -> Result<StoredFileInfo> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut rows = 0usize;
    let mut first_date = None;
    let mut last_date = None;

    for result in reader.records() {
        let record = result?;
        if let Some(date) = record.get(0) {
            if first_date.is_none() {
                first_date = Some(date.to_string());
            }
            last_date = Some(date.to_string());
        }
        rows += 1;
    }

    Ok(StoredFileInfo {
        symbol,
        rows,
        first_date,
        last_date,
    })
}
