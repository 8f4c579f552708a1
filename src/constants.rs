//! Shared constants: indicator parameters, CSV layout, batch defaults.
//!
//! ## CSV Format
//!
//! Enriched per-symbol files carry 13 columns:
//! - 6 basic OHLCV columns (Date, Open, High, Low, Close, Volume)
//! - 7 derived columns (MA5, MA10, MA20, MACD, Signal, Hist, RSI)
//!
//! Rows are trimmed to the span where every derived column is defined, so
//! stored files never contain empty indicator cells.

/// Moving average windows (trading days).
pub const MA_SHORT_WINDOW: usize = 5;
pub const MA_MID_WINDOW: usize = 10;
pub const MA_LONG_WINDOW: usize = 20;

/// MACD smoothing spans (fast EMA, slow EMA, signal EMA).
pub const MACD_FAST_SPAN: usize = 12;
pub const MACD_SLOW_SPAN: usize = 26;
pub const MACD_SIGNAL_SPAN: usize = 9;

/// RSI lookback window.
pub const RSI_PERIOD: usize = 14;

/// Bollinger band parameters (dashboard only, not part of stored CSVs).
pub const BOLL_WINDOW: usize = 20;
pub const BOLL_NUM_STD: f64 = 2.0;

/// Header of an enriched per-symbol CSV file.
pub const ENRICHED_CSV_HEADER: &[&str] = &[
    "Date", "Open", "High", "Low", "Close", "Volume",
    "MA5", "MA10", "MA20", "MACD", "Signal", "Hist", "RSI",
];

/// Number of columns in an enriched CSV row.
pub const ENRICHED_CSV_COLUMNS: usize = 13;

/// Symbols fetched when none are given on the command line
/// (Kweichow Moutai, CATL, Zijin Mining).
pub const DEFAULT_SYMBOLS: &[&str] = &["600519", "300750", "601899"];

/// Earliest date fetched by default.
pub const DEFAULT_START_DATE: &str = "2020-01-01";

/// Size of the concurrent worker pool: at most this many per-symbol
/// pipelines run at once.
pub const DEFAULT_WORKERS: usize = 5;

/// Sequential attempts per symbol before the fetch is reported as failed.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default port for the chart-data server.
pub const DEFAULT_SERVER_PORT: u16 = 8050;
