use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::services::{BatchOrchestrator, BatchSummary, EastmoneyClient};

pub fn run(
    symbols: Option<Vec<String>>,
    start_date: String,
    end_date: Option<String>,
    data_dir: Option<PathBuf>,
    workers: usize,
) {
    let config = match AppConfig::from_args(
        symbols,
        &start_date,
        end_date.as_deref(),
        data_dir,
        workers,
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // Fail on an unusable output directory before any fetch starts.
    if let Err(e) = config.prepare() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    println!("📈 Symbols: {}", config.symbols.join(", "));
    println!("📅 Date range: {} → {}", config.start_date, config.end_date);
    println!("📁 Output directory: {}", config.data_dir.display());
    println!("👷 Worker pool: {}\n", config.workers);

    match run_batch(config) {
        Ok(summary) => {
            println!(
                "\n✅ Batch finished: {} completed, {} empty, {} failed",
                summary.completed, summary.empty, summary.failed
            );
            if summary.failed > 0 {
                println!("💡 Failed symbols are detailed in the log output above");
            }
        }
        Err(e) => {
            eprintln!("\n❌ Batch run failed to start: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_batch(config: AppConfig) -> Result<BatchSummary> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(async {
        let client = EastmoneyClient::new(true)
            .map_err(|e| Error::Config(format!("Failed to create Eastmoney client: {}", e)))?;
        let orchestrator = BatchOrchestrator::new(config, Arc::new(client));
        Ok(orchestrator.run().await)
    })
}
