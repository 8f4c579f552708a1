use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One provider row before cleaning.
///
/// Halted or otherwise anomalous days can arrive with absent cells, so every
/// field except the date is optional. The cleaning stage decides what
/// survives.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl RawBar {
    /// True when every field other than the date is absent.
    pub fn is_blank(&self) -> bool {
        self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.volume.is_none()
    }
}

/// Daily OHLCV bar that survived cleaning: all fields present, prices
/// positive, volume positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,

    /// Opening price (back-adjusted, CNY)
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Trading volume (shares)
    pub volume: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_is_blank() {
        let blank = RawBar {
            date: date(2),
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
        };
        assert!(blank.is_blank());

        let partial = RawBar {
            volume: Some(100),
            ..blank.clone()
        };
        assert!(!partial.is_blank());
    }
}
