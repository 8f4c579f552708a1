//! Raw series cleaning.
//!
//! Three ordered rules, each over the survivors of the previous one:
//! fully blank rows go first, then zero-volume rows (trading halts), then
//! rows with any non-positive or absent price. Nothing else, no outlier
//! thresholds, and never a reorder: date ordering was enforced when the raw
//! series was built.

use tracing::{debug, warn};

use crate::models::{Bar, CleanedSeries, FetchOutcome, RawBar};

/// Reduce a fetch outcome to a usable series, or `None` when there is
/// nothing to work with.
///
/// Empty and failed outcomes propagate as `None` without further noise (the
/// fetch stage already reported them). A non-empty series whose rows are all
/// removed by cleaning warns distinctly: the symbol had data, but all of it
/// was anomalous.
pub fn clean(outcome: &FetchOutcome) -> Option<CleanedSeries> {
    let raw = match outcome {
        FetchOutcome::Series(series) if !series.is_empty() => series,
        _ => return None,
    };

    let total = raw.bars.len();

    let present: Vec<&RawBar> = raw.bars.iter().filter(|b| !b.is_blank()).collect();

    let traded: Vec<&RawBar> = present
        .into_iter()
        .filter(|b| matches!(b.volume, Some(v) if v > 0))
        .collect();

    let bars: Vec<Bar> = traded
        .into_iter()
        .filter_map(|b| match (b.open, b.high, b.low, b.close, b.volume) {
            (Some(open), Some(high), Some(low), Some(close), Some(volume))
                if open > 0.0 && high > 0.0 && low > 0.0 && close > 0.0 =>
            {
                Some(Bar {
                    date: b.date,
                    open,
                    high,
                    low,
                    close,
                    volume,
                })
            }
            _ => None,
        })
        .collect();

    if bars.is_empty() {
        warn!(
            symbol = raw.symbol.as_str(),
            dropped = total,
            "all rows removed by cleaning, series unusable"
        );
        return None;
    }

    if bars.len() < total {
        debug!(
            symbol = raw.symbol.as_str(),
            kept = bars.len(),
            dropped = total - bars.len(),
            "cleaning dropped anomalous rows"
        );
    }

    Some(CleanedSeries {
        symbol: raw.symbol.clone(),
        bars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawSeries;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64, volume: u64) -> RawBar {
        RawBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: Some(close - 0.5),
            high: Some(close + 1.0),
            low: Some(close - 1.0),
            close: Some(close),
            volume: Some(volume),
        }
    }

    fn outcome(bars: Vec<RawBar>) -> FetchOutcome {
        FetchOutcome::Series(RawSeries::new("600519", bars).unwrap())
    }

    #[test]
    fn test_clean_passes_valid_rows() {
        let cleaned = clean(&outcome(vec![bar(1, 10.0, 100), bar(2, 11.0, 200)])).unwrap();
        assert_eq!(cleaned.bars.len(), 2);
        assert!(cleaned
            .bars
            .iter()
            .all(|b| b.volume > 0 && b.open > 0.0 && b.high > 0.0 && b.low > 0.0 && b.close > 0.0));
    }

    #[test]
    fn test_clean_drops_zero_volume_rows() {
        let cleaned = clean(&outcome(vec![
            bar(1, 10.0, 100),
            bar(2, 11.0, 0),
            bar(3, 12.0, 300),
        ]))
        .unwrap();
        assert_eq!(cleaned.bars.len(), 2);
        assert_eq!(cleaned.bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(cleaned.bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_clean_drops_blank_and_partial_rows() {
        let blank = RawBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
        };
        let missing_close = RawBar {
            close: None,
            ..bar(3, 12.0, 300)
        };
        let cleaned = clean(&outcome(vec![bar(1, 10.0, 100), blank, missing_close])).unwrap();
        assert_eq!(cleaned.bars.len(), 1);
    }

    #[test]
    fn test_clean_drops_non_positive_prices() {
        let negative_low = RawBar {
            low: Some(-0.1),
            ..bar(2, 11.0, 200)
        };
        let zero_open = RawBar {
            open: Some(0.0),
            ..bar(3, 12.0, 300)
        };
        let cleaned = clean(&outcome(vec![bar(1, 10.0, 100), negative_low, zero_open])).unwrap();
        assert_eq!(cleaned.bars.len(), 1);
    }

    #[test]
    fn test_clean_all_anomalous_is_none() {
        assert!(clean(&outcome(vec![bar(1, 10.0, 0), bar(2, -1.0, 100)])).is_none());
    }

    #[test]
    fn test_clean_propagates_empty_and_failed() {
        assert!(clean(&FetchOutcome::Empty).is_none());
        assert!(clean(&FetchOutcome::Failed {
            message: "boom".to_string()
        })
        .is_none());
        assert!(clean(&outcome(vec![])).is_none());
    }
}
