//! Per-symbol history retrieval with bounded retry.

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::models::{FetchOutcome, RawBar, RawSeries};
use crate::services::eastmoney::EastmoneyClient;

/// Source of daily history rows. The production implementation is the
/// Eastmoney client; tests inject scripted providers.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn daily_history(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>>;
}

#[async_trait]
impl HistoryProvider for EastmoneyClient {
    async fn daily_history(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>> {
        EastmoneyClient::daily_history(self, code, start, end)
            .await
            .map_err(|e| Error::Network(format!("Eastmoney fetch failed: {}", e)))
    }
}

/// Strip an exchange suffix (600519.SH -> 600519); the provider wants the
/// bare code.
pub fn normalize_symbol(symbol: &str) -> &str {
    symbol.split('.').next().unwrap_or(symbol).trim()
}

/// Fetch stage: one symbol in, one terminal `FetchOutcome` out.
pub struct Fetcher<'a> {
    provider: &'a dyn HistoryProvider,
    max_attempts: u32,
}

impl<'a> Fetcher<'a> {
    pub fn new(provider: &'a dyn HistoryProvider, max_attempts: u32) -> Self {
        Self {
            provider,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Retrieve the full daily history for `symbol`.
    ///
    /// Up to `max_attempts` sequential attempts, immediately one after the
    /// other, on any provider error; each attempt is independent and the
    /// first success wins as-is. An empty table is returned right away,
    /// since it is not expected to fill in on retry. Never raises to the
    /// caller: terminal failure becomes `FetchOutcome::Failed`.
    pub async fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> FetchOutcome {
        let code = normalize_symbol(symbol);
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match self.provider.daily_history(code, start, end).await {
                Ok(rows) if rows.is_empty() => {
                    warn!(symbol = code, "provider returned no rows");
                    return FetchOutcome::Empty;
                }
                Ok(rows) => match RawSeries::new(code, rows) {
                    Ok(series) => {
                        info!(symbol = code, rows = series.len(), "history downloaded");
                        return FetchOutcome::Series(series);
                    }
                    Err(e) => {
                        last_error = e.to_string();
                    }
                },
                Err(e) => {
                    last_error = e.to_string();
                }
            }

            if attempt < self.max_attempts {
                warn!(
                    symbol = code,
                    attempt,
                    max_attempts = self.max_attempts,
                    error = %last_error,
                    "fetch attempt failed, retrying"
                );
            }
        }

        error!(
            symbol = code,
            attempts = self.max_attempts,
            error = %last_error,
            "fetch failed after all attempts"
        );
        FetchOutcome::Failed {
            message: last_error,
        }
    }
}
