use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::constants::{DEFAULT_SERVER_PORT, DEFAULT_START_DATE, DEFAULT_WORKERS};

#[derive(Parser)]
#[command(name = "asharedata")]
#[command(about = "A-share daily market data pipeline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, clean, enrich and store daily history for a symbol universe
    Pull {
        /// Comma-separated symbol codes (suffixes like .SH are accepted)
        #[arg(short, long, value_delimiter = ',')]
        symbols: Option<Vec<String>>,

        /// First day of history (YYYY-MM-DD)
        #[arg(long, default_value = DEFAULT_START_DATE)]
        start_date: String,

        /// Last day of history (YYYY-MM-DD, default: today)
        #[arg(long)]
        end_date: Option<String>,

        /// Output directory (default: $ASHARE_DATA_DIR or ./stock_data)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Concurrent per-symbol pipelines
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },
    /// Start the interactive chart-data server
    Serve {
        #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT)]
        port: u16,
    },
    /// Show stored per-symbol data status
    Status {
        /// Data directory (default: $ASHARE_DATA_DIR or ./stock_data)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Pull {
            symbols,
            start_date,
            end_date,
            data_dir,
            workers,
        } => {
            commands::pull::run(symbols, start_date, end_date, data_dir, workers);
        }
        Commands::Serve { port } => {
            commands::serve::run(port);
        }
        Commands::Status { data_dir } => {
            commands::status::run(data_dir);
        }
    }
}
