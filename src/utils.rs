use chrono::NaiveDate;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Get the output data directory from the environment or use the default.
pub fn get_data_dir() -> PathBuf {
    std::env::var("ASHARE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("stock_data"))
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidInput(format!("Invalid date '{}': {}", s, e)))
}

/// Today's calendar date in local time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let date = parse_date("2020-01-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());

        assert!(parse_date("2020/01/01").is_err());
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn test_parse_date_trims_whitespace() {
        assert!(parse_date(" 2021-06-30 ").is_ok());
    }
}
