//! Concurrent batch orchestration.
//!
//! One independent pipeline per symbol (fetch, clean, enrich, persist)
//! dispatched onto a fixed-size worker pool. Each task owns its series for
//! its whole lifetime; nothing mutable is shared across tasks, so the pool's
//! admission control is the only synchronization.

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::models::FetchOutcome;
use crate::services::fetcher::{Fetcher, HistoryProvider};
use crate::services::{cleaner, csv_store, enricher};

/// Terminal state of one symbol's pipeline.
#[derive(Debug)]
pub enum SymbolStatus {
    /// Enriched series persisted; `rows` bars written.
    Completed { rows: usize },
    /// No usable data (provider empty, or every row anomalous).
    Empty,
    /// The pipeline failed; carries the error description.
    Failed { message: String },
}

#[derive(Debug)]
pub struct SymbolReport {
    pub symbol: String,
    pub status: SymbolStatus,
}

/// Aggregate counts for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub empty: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.completed + self.empty + self.failed
    }
}

/// Fans one pipeline per symbol out onto the worker pool and joins them all.
pub struct BatchOrchestrator {
    config: Arc<AppConfig>,
    provider: Arc<dyn HistoryProvider>,
}

impl BatchOrchestrator {
    pub fn new(config: AppConfig, provider: Arc<dyn HistoryProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    /// Run every configured symbol to completion and return the aggregate
    /// counts.
    ///
    /// Waits for all dispatched work regardless of individual failures; a
    /// failure or panic in one symbol's pipeline is recorded in that
    /// symbol's report and never cancels sibling tasks. This method itself
    /// never errors.
    pub async fn run(&self) -> BatchSummary {
        info!(
            symbols = self.config.symbols.len(),
            workers = self.config.workers,
            start = %self.config.start_date,
            end = %self.config.end_date,
            "starting batch run"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.workers));

        let tasks: Vec<_> = self
            .config
            .symbols
            .iter()
            .cloned()
            .map(|symbol| {
                let semaphore = Arc::clone(&semaphore);
                let config = Arc::clone(&self.config);
                let provider = Arc::clone(&self.provider);
                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    process_symbol(&config, provider.as_ref(), &symbol).await
                })
            })
            .collect();

        let mut summary = BatchSummary::default();
        for (symbol, joined) in self.config.symbols.iter().zip(join_all(tasks).await) {
            let report = match joined {
                Ok(report) => report,
                Err(e) => {
                    error!(symbol = symbol.as_str(), error = %e, "pipeline task aborted");
                    SymbolReport {
                        symbol: symbol.clone(),
                        status: SymbolStatus::Failed {
                            message: format!("pipeline panicked: {}", e),
                        },
                    }
                }
            };

            match report.status {
                SymbolStatus::Completed { .. } => summary.completed += 1,
                SymbolStatus::Empty => summary.empty += 1,
                SymbolStatus::Failed { .. } => summary.failed += 1,
            }
        }

        info!(
            completed = summary.completed,
            empty = summary.empty,
            failed = summary.failed,
            "batch finished"
        );
        summary
    }
}

/// One symbol's full pipeline. Every error ends up in the report, never in a
/// propagated Result.
async fn process_symbol(
    config: &AppConfig,
    provider: &dyn HistoryProvider,
    symbol: &str,
) -> SymbolReport {
    info!(symbol, "processing symbol");

    let fetcher = Fetcher::new(provider, config.max_attempts);
    let outcome = fetcher
        .fetch(symbol, config.start_date, config.end_date)
        .await;

    let Some(cleaned) = cleaner::clean(&outcome) else {
        let status = match outcome {
            FetchOutcome::Failed { message } => SymbolStatus::Failed { message },
            _ => SymbolStatus::Empty,
        };
        return SymbolReport {
            symbol: symbol.to_string(),
            status,
        };
    };

    let enriched = enricher::enrich(&cleaned);

    match csv_store::write_enriched(&config.data_dir, &enriched) {
        Ok(path) => {
            info!(
                symbol,
                rows = enriched.len(),
                path = %path.display(),
                "symbol completed"
            );
            SymbolReport {
                symbol: symbol.to_string(),
                status: SymbolStatus::Completed {
                    rows: enriched.len(),
                },
            }
        }
        Err(e) => {
            error!(symbol, error = %e, "failed to persist enriched series");
            SymbolReport {
                symbol: symbol.to_string(),
                status: SymbolStatus::Failed {
                    message: e.to_string(),
                },
            }
        }
    }
}
