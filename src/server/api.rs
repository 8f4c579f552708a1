//! Chart-data endpoints.
//!
//! `/api/chart` is the interactive contract: symbol, date range and
//! indicator toggles arrive as query parameters, and every change is a fresh
//! request that recomputes the full multi-panel payload over the requested
//! range. Rendering is the client's job; this side ships series data.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::{BOLL_NUM_STD, BOLL_WINDOW};
use crate::models::indicators::bollinger;
use crate::server::AppState;
use crate::services::fetcher::{normalize_symbol, Fetcher};
use crate::services::{cleaner, enricher};
use crate::utils::today;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndicatorToggle {
    Macd,
    Rsi,
    Boll,
}

/// Parse the `indicators` query value (comma-separated, case-insensitive).
/// Defaults to MACD when absent.
fn parse_indicators(raw: Option<&str>) -> Result<Vec<IndicatorToggle>, String> {
    let raw = raw.unwrap_or("MACD");

    let mut toggles = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let toggle = match part.to_ascii_uppercase().as_str() {
            "MACD" => IndicatorToggle::Macd,
            "RSI" => IndicatorToggle::Rsi,
            "BOLL" | "BOLLINGER" => IndicatorToggle::Boll,
            other => return Err(format!("unknown indicator '{}'", other)),
        };
        if !toggles.contains(&toggle) {
            toggles.push(toggle);
        }
    }
    Ok(toggles)
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub symbol: String,

    /// YYYY-MM-DD; defaults to one year before `end`.
    pub start: Option<NaiveDate>,

    /// YYYY-MM-DD; defaults to today.
    pub end: Option<NaiveDate>,

    /// Comma-separated set from MACD, RSI, BOLL.
    pub indicators: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MacdPanel {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct BollPanel {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Full multi-panel chart payload. Arrays share one date axis; optional
/// panels appear only when their toggle was requested.
#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub symbol: String,
    pub dates: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<u64>,
    pub ma5: Vec<f64>,
    pub ma10: Vec<f64>,
    pub ma20: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boll: Option<BollPanel>,
}

impl ChartResponse {
    fn empty(symbol: String) -> Self {
        Self {
            symbol,
            dates: Vec::new(),
            open: Vec::new(),
            high: Vec::new(),
            low: Vec::new(),
            close: Vec::new(),
            volume: Vec::new(),
            ma5: Vec::new(),
            ma10: Vec::new(),
            ma20: Vec::new(),
            macd: None,
            rsi: None,
            boll: None,
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartResponse>, (StatusCode, String)> {
    let toggles =
        parse_indicators(query.indicators.as_deref()).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let end = query.end.unwrap_or_else(today);
    let start = query
        .start
        .unwrap_or_else(|| end - chrono::Duration::days(365));
    if start > end {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("start {} is after end {}", start, end),
        ));
    }

    let code = normalize_symbol(&query.symbol).to_string();

    let fetcher = Fetcher::new(state.provider.as_ref(), state.max_attempts);
    let outcome = fetcher.fetch(&query.symbol, start, end).await;

    let Some(cleaned) = cleaner::clean(&outcome) else {
        warn!(symbol = code.as_str(), "no usable data for chart request");
        return Ok(Json(ChartResponse::empty(code)));
    };

    let enriched = enricher::enrich(&cleaned);
    let offset = cleaned.bars.len() - enriched.len();

    let mut response = ChartResponse::empty(code.clone());
    response.dates = enriched
        .bars
        .iter()
        .map(|b| b.date.format("%Y-%m-%d").to_string())
        .collect();
    response.open = enriched.bars.iter().map(|b| b.open).collect();
    response.high = enriched.bars.iter().map(|b| b.high).collect();
    response.low = enriched.bars.iter().map(|b| b.low).collect();
    response.close = enriched.bars.iter().map(|b| b.close).collect();
    response.volume = enriched.bars.iter().map(|b| b.volume).collect();
    response.ma5 = enriched.bars.iter().map(|b| b.ma5).collect();
    response.ma10 = enriched.bars.iter().map(|b| b.ma10).collect();
    response.ma20 = enriched.bars.iter().map(|b| b.ma20).collect();

    if toggles.contains(&IndicatorToggle::Macd) {
        response.macd = Some(MacdPanel {
            macd: enriched.bars.iter().map(|b| b.macd).collect(),
            signal: enriched.bars.iter().map(|b| b.signal).collect(),
            hist: enriched.bars.iter().map(|b| b.hist).collect(),
        });
    }

    if toggles.contains(&IndicatorToggle::Rsi) {
        response.rsi = Some(enriched.bars.iter().map(|b| b.rsi).collect());
    }

    if toggles.contains(&IndicatorToggle::Boll) {
        // Bands share the 20-bar window with MA20, so they are defined
        // everywhere past the enrichment trim offset.
        let bands = bollinger(&cleaned.closes(), BOLL_WINDOW, BOLL_NUM_STD);
        response.boll = Some(BollPanel {
            upper: bands.upper[offset..].to_vec(),
            middle: bands.middle[offset..].to_vec(),
            lower: bands.lower[offset..].to_vec(),
        });
    }

    info!(
        symbol = code.as_str(),
        rows = enriched.len(),
        "chart payload built"
    );
    Ok(Json(response))
}
