//! Eastmoney daily kline client.
//!
//! Queries the public push2his endpoint (the same feed akshare's
//! `stock_zh_a_hist` wraps) for back-adjusted daily history. The adjustment
//! mode is fixed to 后复权 (`fqt=2`) so absolute price levels stay comparable
//! across splits and dividends.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error as ThisError;

use crate::models::RawBar;

const BASE_URL: &str = "https://push2his.eastmoney.com/api/qt/stock/kline/get";
const REFERER: &str = "https://quote.eastmoney.com/";

/// Requested kline cell layout (`fields2=f51..f56`). Cells arrive
/// comma-joined per row in the provider's documented order:
/// 日期,开盘,收盘,最高,最低,成交量
mod kline_field {
    pub const DATE: usize = 0;
    pub const OPEN: usize = 1;
    pub const CLOSE: usize = 2;
    pub const HIGH: usize = 3;
    pub const LOW: usize = 4;
    pub const VOLUME: usize = 5;
    pub const COUNT: usize = 6;
}

#[derive(ThisError, Debug)]
pub enum EastmoneyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub struct EastmoneyClient {
    client: reqwest::Client,
    base_url: String,
    user_agents: Vec<String>,
    random_agent: bool,
}

impl EastmoneyClient {
    pub fn new(random_agent: bool) -> Result<Self, EastmoneyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let user_agents = vec![
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0".to_string(),
        ];

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            user_agents,
            random_agent,
        })
    }

    fn user_agent(&self) -> &str {
        if self.random_agent {
            self.user_agents
                .choose(&mut rand::thread_rng())
                .unwrap_or(&self.user_agents[0])
        } else {
            &self.user_agents[0]
        }
    }

    /// Market prefix for the secid parameter: codes starting with 6 trade in
    /// Shanghai (`1.`), everything else in Shenzhen (`0.`).
    fn secid(code: &str) -> String {
        if code.starts_with('6') {
            format!("1.{}", code)
        } else {
            format!("0.{}", code)
        }
    }

    /// Full back-adjusted daily history for one bare symbol code.
    ///
    /// Returns an empty vector when the provider has no rows for the code
    /// in the requested range.
    pub async fn daily_history(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, EastmoneyError> {
        let secid = Self::secid(code);
        let beg = start.format("%Y%m%d").to_string();
        let end = end.format("%Y%m%d").to_string();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("secid", secid.as_str()),
                ("fields1", "f1,f2,f3,f4,f5,f6"),
                ("fields2", "f51,f52,f53,f54,f55,f56"),
                ("klt", "101"),
                ("fqt", "2"),
                ("beg", beg.as_str()),
                ("end", end.as_str()),
                ("lmt", "1000000"),
            ])
            .header("User-Agent", self.user_agent())
            .header("Referer", REFERER)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EastmoneyError::Status(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        parse_history_payload(&payload)
    }
}

/// Extract kline rows from a push2his response body.
///
/// `data: null` means the provider knows nothing about the symbol in the
/// requested range; that is an empty table, not an error.
fn parse_history_payload(payload: &Value) -> Result<Vec<RawBar>, EastmoneyError> {
    let data = match payload.get("data") {
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(data) => data,
    };

    let klines = match data.get("klines") {
        Some(Value::Null) | None => return Ok(Vec::new()),
        Some(klines) => klines
            .as_array()
            .ok_or_else(|| EastmoneyError::InvalidResponse("klines is not an array".to_string()))?,
    };

    let mut bars = Vec::with_capacity(klines.len());
    for line in klines {
        let line = line
            .as_str()
            .ok_or_else(|| EastmoneyError::InvalidResponse("kline row is not a string".to_string()))?;
        bars.push(parse_kline_row(line)?);
    }

    Ok(bars)
}

/// Parse one comma-joined kline row into a raw bar.
///
/// A malformed date fails the whole response; unparsable numeric cells
/// (halted days publish "-") become absent fields for the cleaning stage.
fn parse_kline_row(line: &str) -> Result<RawBar, EastmoneyError> {
    let cells: Vec<&str> = line.split(',').collect();
    if cells.len() < kline_field::COUNT {
        return Err(EastmoneyError::InvalidResponse(format!(
            "kline row has {} cells, expected {}: {}",
            cells.len(),
            kline_field::COUNT,
            line
        )));
    }

    let date = NaiveDate::parse_from_str(cells[kline_field::DATE], "%Y-%m-%d").map_err(|e| {
        EastmoneyError::InvalidResponse(format!(
            "bad kline date '{}': {}",
            cells[kline_field::DATE],
            e
        ))
    })?;

    Ok(RawBar {
        date,
        open: cells[kline_field::OPEN].parse().ok(),
        high: cells[kline_field::HIGH].parse().ok(),
        low: cells[kline_field::LOW].parse().ok(),
        close: cells[kline_field::CLOSE].parse().ok(),
        volume: cells[kline_field::VOLUME].parse().ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secid_exchange_prefix() {
        assert_eq!(EastmoneyClient::secid("600519"), "1.600519");
        assert_eq!(EastmoneyClient::secid("601899"), "1.601899");
        assert_eq!(EastmoneyClient::secid("300750"), "0.300750");
        assert_eq!(EastmoneyClient::secid("000001"), "0.000001");
    }

    #[test]
    fn test_parse_kline_row_maps_localized_order() {
        // 日期,开盘,收盘,最高,最低,成交量
        let bar = parse_kline_row("2024-03-01,1700.0,1712.5,1720.0,1695.0,28500").unwrap();
        assert_eq!(bar.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(bar.open, Some(1700.0));
        assert_eq!(bar.close, Some(1712.5));
        assert_eq!(bar.high, Some(1720.0));
        assert_eq!(bar.low, Some(1695.0));
        assert_eq!(bar.volume, Some(28_500));
    }

    #[test]
    fn test_parse_kline_row_absent_cells() {
        let bar = parse_kline_row("2024-03-01,-,-,-,-,-").unwrap();
        assert!(bar.is_blank());
    }

    #[test]
    fn test_parse_kline_row_bad_date() {
        assert!(parse_kline_row("03/01/2024,1.0,1.0,1.0,1.0,10").is_err());
    }

    #[test]
    fn test_parse_history_payload_null_data_is_empty() {
        let payload: Value = serde_json::from_str(r#"{"rc":0,"data":null}"#).unwrap();
        assert!(parse_history_payload(&payload).unwrap().is_empty());
    }

    #[test]
    fn test_parse_history_payload_rows() {
        let payload: Value = serde_json::from_str(
            r#"{"rc":0,"data":{"code":"600519","klines":[
                "2024-03-01,1700.0,1712.5,1720.0,1695.0,28500",
                "2024-03-04,1713.0,1708.0,1722.0,1701.0,26100"
            ]}}"#,
        )
        .unwrap();
        let bars = parse_history_payload(&payload).unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].date < bars[1].date);
    }
}
