//! Technical indicator calculations over daily close series.
//!
//! All functions are pure and deterministic. They operate on the cleaned
//! close sequence: removed rows are simply absent, so surviving bars feed
//! each window as consecutive inputs with no gap placeholders.
//!
//! Warm-up values, the indexes where the lookback window is not yet full,
//! are `None`, never a sentinel number. The exception is the seeded EMA
//! family, which is defined from the first bar by construction.

/// Simple moving average over `window` bars.
///
/// `out[i]` is the mean of `values[i + 1 - window ..= i]`, `None` while
/// fewer than `window` bars are available.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];

    if window == 0 || values.len() < window {
        return out;
    }

    for i in (window - 1)..values.len() {
        let start = i + 1 - window;
        let sum: f64 = values[start..=i].iter().sum();
        out[i] = Some(sum / window as f64);
    }

    out
}

/// Exponential moving average with smoothing span `span`.
///
/// The recursion is seeded on the first observation (`ema[0] = values[0]`,
/// `alpha = 2 / (span + 1)`), so every index is defined. Early values lean
/// heavily on the seed and converge as history accumulates.
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    if values.is_empty() || span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = values[0];
    out.push(prev);

    for &value in &values[1..] {
        let next = alpha * value + (1.0 - alpha) * prev;
        out.push(next);
        prev = next;
    }

    out
}

/// MACD line, signal line and histogram.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
}

/// MACD family over `closes` with the given spans.
///
/// `macd = ema(fast) - ema(slow)`, `signal = ema(macd, signal_span)`,
/// `hist = macd - signal`. All three inherit the seeded-EMA property of
/// being defined from the first bar.
pub fn macd(closes: &[f64], fast_span: usize, slow_span: usize, signal_span: usize) -> MacdSeries {
    let fast = ema(closes, fast_span);
    let slow = ema(closes, slow_span);

    let macd: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
    let signal = ema(&macd, signal_span);
    let hist: Vec<f64> = macd.iter().zip(signal.iter()).map(|(m, s)| m - s).collect();

    MacdSeries { macd, signal, hist }
}

/// Relative Strength Index over a `period`-bar window of simple rolling
/// means of gains and losses.
///
/// A delta needs a predecessor, so the first defined value sits at index
/// `period` (a full window of `period` deltas).
///
/// Zero-division policy: a window with no losses saturates at 100 when it
/// has gains, and a completely flat window reads neutral (50) rather than
/// undefined.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];

    if period == 0 || closes.len() <= period {
        return out;
    }

    for t in period..closes.len() {
        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;

        for i in (t + 1 - period)..=t {
            let delta = closes[i] - closes[i - 1];
            if delta > 0.0 {
                gain_sum += delta;
            } else {
                loss_sum -= delta;
            }
        }

        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;

        let value = if avg_loss == 0.0 {
            if avg_gain > 0.0 {
                100.0
            } else {
                50.0
            }
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };

        out[t] = Some(value);
    }

    out
}

/// Bollinger bands: middle = SMA, upper/lower = middle ± `num_std` · σ
/// (population standard deviation over the window).
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn bollinger(closes: &[f64], window: usize, num_std: f64) -> BollingerSeries {
    let middle = sma(closes, window);
    let mut upper = vec![None; closes.len()];
    let mut lower = vec![None; closes.len()];

    for (i, mid) in middle.iter().enumerate() {
        if let Some(mean) = mid {
            let start = i + 1 - window;
            let variance = closes[start..=i]
                .iter()
                .map(|x| (x - mean).powi(2))
                .sum::<f64>()
                / window as f64;
            let std_dev = variance.sqrt();
            upper[i] = Some(mean + num_std * std_dev);
            lower[i] = Some(mean - num_std * std_dev);
        }
    }

    BollingerSeries { upper, middle, lower }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_sma_known_values() {
        let closes = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let ma3 = sma(&closes, 3);

        assert_eq!(ma3[0], None);
        assert_eq!(ma3[1], None);
        assert!((ma3[2].unwrap() - 11.0).abs() < EPS); // (10+11+12)/3
        assert!((ma3[3].unwrap() - 12.0).abs() < EPS);
        assert!((ma3[5].unwrap() - 14.0).abs() < EPS);
    }

    #[test]
    fn test_sma_constant_input() {
        let closes = vec![7.5; 12];
        let ma5 = sma(&closes, 5);

        for (i, value) in ma5.iter().enumerate() {
            if i < 4 {
                assert_eq!(*value, None);
            } else {
                assert!((value.unwrap() - 7.5).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_sma_window_larger_than_input() {
        let ma = sma(&[1.0, 2.0], 5);
        assert!(ma.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_ema_seeded_on_first_observation() {
        let closes = vec![10.0, 13.0];
        let out = ema(&closes, 2);
        // alpha = 2/3: 10, then 2/3*13 + 1/3*10 = 12
        assert!((out[0] - 10.0).abs() < EPS);
        assert!((out[1] - 12.0).abs() < EPS);
    }

    #[test]
    fn test_ema_of_constant_is_constant() {
        let closes = vec![42.0; 30];
        let out = ema(&closes, 12);
        assert!(out.iter().all(|v| (v - 42.0).abs() < EPS));
    }

    #[test]
    fn test_macd_constant_input_is_zero() {
        let closes = vec![100.0; 40];
        let series = macd(&closes, 12, 26, 9);

        assert_eq!(series.macd.len(), closes.len());
        assert!(series.macd.iter().all(|v| v.abs() < EPS));
        assert!(series.signal.iter().all(|v| v.abs() < EPS));
        assert!(series.hist.iter().all(|v| v.abs() < EPS));
    }

    #[test]
    fn test_macd_defined_from_first_bar() {
        let closes: Vec<f64> = (1..=5).map(|i| i as f64).collect();
        let series = macd(&closes, 12, 26, 9);
        assert_eq!(series.macd.len(), 5);
        assert_eq!(series.signal.len(), 5);
        assert_eq!(series.hist.len(), 5);
    }

    #[test]
    fn test_rsi_warm_up_window() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let out = rsi(&closes, 14);

        for value in out.iter().take(14) {
            assert_eq!(*value, None);
        }
        assert!(out[14].is_some());
    }

    #[test]
    fn test_rsi_strictly_increasing_saturates_at_100() {
        let closes: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let out = rsi(&closes, 14);
        assert!((out[29].unwrap() - 100.0).abs() < EPS);
    }

    #[test]
    fn test_rsi_strictly_decreasing_reaches_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(|i| i as f64).collect();
        let out = rsi(&closes, 14);
        assert!(out[29].unwrap().abs() < EPS);
    }

    #[test]
    fn test_rsi_flat_window_is_neutral() {
        let closes = vec![25.0; 20];
        let out = rsi(&closes, 14);
        assert!((out[19].unwrap() - 50.0).abs() < EPS);
    }

    #[test]
    fn test_rsi_majority_gain_window() {
        // 15 bars: dips early, then a long run of gains. Over the final
        // 14-delta window gains total 11 and losses total 3.
        let closes = vec![
            10.0, 11.0, 12.0, 11.0, 10.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0,
            18.0,
        ];
        let out = rsi(&closes, 14);

        let value = out[14].unwrap();
        let expected = 100.0 - 100.0 / (1.0 + (11.0 / 14.0) / (3.0 / 14.0));
        assert!((value - expected).abs() < EPS);
        assert!(value > 50.0);
    }

    #[test]
    fn test_bollinger_bands_bracket_the_mean() {
        let closes: Vec<f64> = (1..=25).map(|i| i as f64).collect();
        let bands = bollinger(&closes, 20, 2.0);

        assert_eq!(bands.middle[18], None);
        let (upper, middle, lower) = (
            bands.upper[24].unwrap(),
            bands.middle[24].unwrap(),
            bands.lower[24].unwrap(),
        );
        assert!(upper > middle && middle > lower);
        assert!((upper + lower - 2.0 * middle).abs() < EPS);
    }

    #[test]
    fn test_bollinger_constant_input_collapses() {
        let closes = vec![50.0; 25];
        let bands = bollinger(&closes, 20, 2.0);
        assert!((bands.upper[24].unwrap() - 50.0).abs() < EPS);
        assert!((bands.lower[24].unwrap() - 50.0).abs() < EPS);
    }
}
