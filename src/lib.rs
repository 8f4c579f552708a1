//! A-share daily market data pipeline.
//!
//! Fetches back-adjusted daily OHLCV history for a configured symbol
//! universe from the Eastmoney kline feed, cleans the raw series, derives
//! MA/MACD/RSI columns, and persists one enriched CSV per symbol. A small
//! axum server exposes the same core as an interactive chart-data API.

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;
