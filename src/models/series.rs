use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::bar::{Bar, RawBar};

/// Time-ordered daily history for one symbol, exactly as the provider
/// returned it.
///
/// Construction enforces the ordering invariant: dates are unique and
/// strictly increasing. A response violating it never becomes a series, so
/// nothing downstream has to reorder or deduplicate.
#[derive(Debug, Clone)]
pub struct RawSeries {
    pub symbol: String,
    pub bars: Vec<RawBar>,
}

impl RawSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<RawBar>) -> Result<Self> {
        let symbol = symbol.into();
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(Error::InvalidInput(format!(
                    "series for {} is not strictly date-ordered: {} followed by {}",
                    symbol, pair[0].date, pair[1].date
                )));
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }
}

/// Per-symbol result of the fetch stage.
///
/// Retries happen inside the fetch stage; callers only ever see one of these
/// three terminal states, never an error to catch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The first successful attempt's full history.
    Series(RawSeries),
    /// The provider answered with zero rows. Not retried: an empty table is
    /// not expected to fill in on the next attempt.
    Empty,
    /// All attempts failed; carries the last attempt's error description.
    Failed { message: String },
}

/// Cleaned history: every bar has positive volume and positive prices.
#[derive(Debug, Clone)]
pub struct CleanedSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl CleanedSeries {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

/// One bar with its full set of derived columns. Only produced for dates
/// where every indicator is defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub ma5: f64,
    pub ma10: f64,
    pub ma20: f64,
    pub macd: f64,
    pub signal: f64,
    pub hist: f64,
    pub rsi: f64,
}

/// Terminal artifact of the per-symbol pipeline: the cleaned series with
/// derived columns, trimmed to the span where all of them are defined.
///
/// Dates are a suffix of the cleaned series' dates; enrichment never adds,
/// removes, or reorders trading days inside that span.
#[derive(Debug, Clone)]
pub struct EnrichedSeries {
    pub symbol: String,
    pub bars: Vec<EnrichedBar>,
}

impl EnrichedSeries {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }
}
