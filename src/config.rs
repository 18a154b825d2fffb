use std::{env, path::PathBuf, str::FromStr};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

/// 預設追蹤的股票代號
const DEFAULT_SYMBOLS: [&str; 30] = [
    "MSFT", "AAPL", "GOOGL", "AMZN", "TSLA", "NVDA", "ORCL", "AMD", "SNOW", "CRWD", "MSTR",
    "INOD", "APLD", "ADBE", "AVGO", "TXN", "QCOM", "V", "MA", "PYPL", "CAT", "GE", "HON", "MMM",
    "BABA", "NFLX", "AMT", "MDLZ", "MRK", "NKE",
];

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub system: System,
    #[serde(default)]
    pub crawler: Crawler,
}

const SYSTEM_HTTP_PORT: &str = "SYSTEM_HTTP_PORT";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct System {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for System {
    fn default() -> Self {
        System {
            http_port: default_http_port(),
        }
    }
}

const CRAWLER_HOST: &str = "CRAWLER_HOST";
const CRAWLER_SYMBOLS: &str = "CRAWLER_SYMBOLS";
const CRAWLER_CSV_PATH: &str = "CRAWLER_CSV_PATH";
const CRAWLER_TIMEOUT_SECS: &str = "CRAWLER_TIMEOUT_SECS";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Crawler {
    /// 報價頁的主機，頁面網址為 https://{host}/quote/{symbol}
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
    /// 單一頁面請求的逾時秒數
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Crawler {
    fn default() -> Self {
        Crawler {
            host: default_host(),
            symbols: default_symbols(),
            csv_path: default_csv_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_http_port() -> u16 {
    8080
}

fn default_host() -> String {
    "finance.yahoo.com".to_string()
}

fn default_symbols() -> Vec<String> {
    DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

fn default_csv_path() -> String {
    "stocks_data.csv".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

pub static SETTINGS: Lazy<App> = Lazy::new(|| match App::get() {
    Ok(app) => app,
    Err(why) => {
        logging::error_file_async(format!(
            "I can't read the config context because {:?}",
            why
        ));
        App::default().override_with_env()
    }
});

impl App {
    fn get() -> Result<Self> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(port) = env::var(SYSTEM_HTTP_PORT) {
            self.system.http_port = u16::from_str(&port).unwrap_or_else(|_| default_http_port());
        }

        if let Ok(host) = env::var(CRAWLER_HOST) {
            self.crawler.host = host;
        }

        if let Ok(symbols) = env::var(CRAWLER_SYMBOLS) {
            let symbols = parse_symbols(&symbols);
            if !symbols.is_empty() {
                self.crawler.symbols = symbols;
            }
        }

        if let Ok(csv_path) = env::var(CRAWLER_CSV_PATH) {
            self.crawler.csv_path = csv_path;
        }

        if let Ok(secs) = env::var(CRAWLER_TIMEOUT_SECS) {
            self.crawler.timeout_secs =
                u64::from_str(&secs).unwrap_or_else(|_| default_timeout_secs());
        }

        self
    }
}

/// 將 "msft, AAPL,,nvda" 轉為 ["MSFT", "AAPL", "NVDA"]
fn parse_symbols(s: &str) -> Vec<String> {
    s.split(',')
        .map(|v| v.trim().to_uppercase())
        .filter(|v| !v.is_empty())
        .collect()
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}
