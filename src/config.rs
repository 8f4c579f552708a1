use chrono::NaiveDate;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_START_DATE, DEFAULT_SYMBOLS, DEFAULT_WORKERS};
use crate::error::{Error, Result};
use crate::utils::{get_data_dir, parse_date, today};

/// Configuration for one batch run.
///
/// Built once from CLI arguments and handed to the orchestrator explicitly;
/// nothing in the pipeline reads process-wide state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Symbol universe. Codes may carry an exchange suffix (600519.SH);
    /// the fetch stage strips it.
    pub symbols: Vec<String>,

    /// First calendar day of the requested history.
    pub start_date: NaiveDate,

    /// Last calendar day of the requested history (usually today).
    pub end_date: NaiveDate,

    /// Directory receiving one enriched CSV per symbol.
    pub data_dir: PathBuf,

    /// Worker pool size: at most this many per-symbol pipelines in flight.
    pub workers: usize,

    /// Sequential fetch attempts per symbol before giving up.
    pub max_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            start_date: NaiveDate::parse_from_str(DEFAULT_START_DATE, "%Y-%m-%d")
                .unwrap_or_else(|_| NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
            end_date: today(),
            data_dir: get_data_dir(),
            workers: DEFAULT_WORKERS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl AppConfig {
    /// Build a config from CLI arguments, falling back to defaults where an
    /// argument was omitted.
    pub fn from_args(
        symbols: Option<Vec<String>>,
        start_date: &str,
        end_date: Option<&str>,
        data_dir: Option<PathBuf>,
        workers: usize,
    ) -> Result<Self> {
        let symbols = match symbols {
            Some(list) if !list.is_empty() => list,
            _ => DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        };

        let start_date = parse_date(start_date)?;
        let end_date = match end_date {
            Some(s) => parse_date(s)?,
            None => today(),
        };

        if start_date > end_date {
            return Err(Error::Config(format!(
                "start date {} is after end date {}",
                start_date, end_date
            )));
        }

        if workers == 0 {
            return Err(Error::Config("worker pool size must be at least 1".to_string()));
        }

        Ok(Self {
            symbols,
            start_date,
            end_date,
            data_dir: data_dir.unwrap_or_else(get_data_dir),
            workers,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    /// Validate the environment before any fetch begins: the output directory
    /// must exist (or be creatable) and be writable.
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| {
            Error::Config(format!(
                "cannot create output directory {}: {}",
                self.data_dir.display(),
                e
            ))
        })?;

        let probe = self.data_dir.join(".write_probe");
        std::fs::write(&probe, b"")
            .and_then(|_| std::fs::remove_file(&probe))
            .map_err(|e| {
                Error::Config(format!(
                    "output directory {} is not writable: {}",
                    self.data_dir.display(),
                    e
                ))
            })
    }
}
