//! Derived-column computation over a cleaned series.
//!
//! Pure and I/O-free: the cleaned close sequence goes in, the same dates come
//! out with MA5/MA10/MA20, the MACD family and RSI attached. Rows where any
//! derived column is still undefined (the warm-up span of the slowest
//! indicator) are dropped, so an enriched series has no undefined cells.

use crate::constants::{
    MACD_FAST_SPAN, MACD_SIGNAL_SPAN, MACD_SLOW_SPAN, MA_LONG_WINDOW, MA_MID_WINDOW,
    MA_SHORT_WINDOW, RSI_PERIOD,
};
use crate::models::indicators::{macd, rsi, sma};
use crate::models::{CleanedSeries, EnrichedBar, EnrichedSeries};

/// Compute every derived column and assemble the trimmed enriched series.
///
/// Empty input produces an empty output without touching the indicator
/// functions.
pub fn enrich(series: &CleanedSeries) -> EnrichedSeries {
    if series.is_empty() {
        return EnrichedSeries {
            symbol: series.symbol.clone(),
            bars: Vec::new(),
        };
    }

    let closes = series.closes();

    let ma5 = sma(&closes, MA_SHORT_WINDOW);
    let ma10 = sma(&closes, MA_MID_WINDOW);
    let ma20 = sma(&closes, MA_LONG_WINDOW);
    let macd_series = macd(&closes, MACD_FAST_SPAN, MACD_SLOW_SPAN, MACD_SIGNAL_SPAN);
    let rsi14 = rsi(&closes, RSI_PERIOD);

    let bars = series
        .bars
        .iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            let (ma5, ma10, ma20, rsi) = match (ma5[i], ma10[i], ma20[i], rsi14[i]) {
                (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
                _ => return None,
            };
            Some(EnrichedBar {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                ma5,
                ma10,
                ma20,
                macd: macd_series.macd[i],
                signal: macd_series.signal[i],
                hist: macd_series.hist[i],
                rsi,
            })
        })
        .collect();

    EnrichedSeries {
        symbol: series.symbol.clone(),
        bars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bar;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> CleanedSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + chrono::Duration::days(i as i64),
                open: close - 0.2,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 1_000 + i as u64,
            })
            .collect();
        CleanedSeries {
            symbol: "600519".to_string(),
            bars,
        }
    }

    #[test]
    fn test_enrich_empty_input() {
        let enriched = enrich(&series(&[]));
        assert!(enriched.is_empty());
    }

    #[test]
    fn test_enrich_trims_warm_up_rows() {
        // MA20 is the slowest to converge: first defined index is 19, so a
        // 25-bar series keeps 6 rows.
        let closes: Vec<f64> = (1..=25).map(|i| 100.0 + i as f64).collect();
        let cleaned = series(&closes);
        let enriched = enrich(&cleaned);

        assert_eq!(enriched.len(), 6);
        assert_eq!(enriched.bars[0].date, cleaned.bars[19].date);
        assert_eq!(enriched.bars[5].date, cleaned.bars[24].date);
    }

    #[test]
    fn test_enrich_too_short_for_any_row() {
        let closes: Vec<f64> = (1..=15).map(|i| i as f64).collect();
        assert!(enrich(&series(&closes)).is_empty());
    }

    #[test]
    fn test_enrich_values_match_indicators() {
        let closes: Vec<f64> = (1..=30).map(|i| 50.0 + (i as f64) * 0.5).collect();
        let cleaned = series(&closes);
        let enriched = enrich(&cleaned);

        let last = enriched.bars.last().unwrap();
        let expected_ma5: f64 = closes[25..30].iter().sum::<f64>() / 5.0;
        assert!((last.ma5 - expected_ma5).abs() < 1e-9);
        assert!((last.hist - (last.macd - last.signal)).abs() < 1e-9);
        // Strictly rising closes: RSI pegged at 100.
        assert!((last.rsi - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_enrich_constant_closes() {
        let enriched = enrich(&series(&[80.0; 40]));
        let last = enriched.bars.last().unwrap();
        assert!((last.ma20 - 80.0).abs() < 1e-9);
        assert!(last.macd.abs() < 1e-9);
        assert!(last.hist.abs() < 1e-9);
        assert!((last.rsi - 50.0).abs() < 1e-9);
    }
}
