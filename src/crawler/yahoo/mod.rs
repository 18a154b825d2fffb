//! # Yahoo 財經採集模組
//!
//! 從 Yahoo 財經的個股報價頁抓取最新成交價與漲跌幅。
//!
//! - 來源網址：`https://{host}/quote/{symbol}`，host 預設為 `finance.yahoo.com`
//! - 抓取技術：HTTP GET 搭配 CSS Selector 解析 `fin-streamer` 節點

/// 即時報價採集子模組
pub mod quote;

/// Yahoo 財經採集器
///
/// 此結構體作為 `StockInfo` Trait 的實作載體。
pub struct Yahoo {
    host: String,
}

impl Yahoo {
    pub fn new(host: &str) -> Self {
        Yahoo {
            host: host.to_string(),
        }
    }

    pub fn quote_url(&self, stock_symbol: &str) -> String {
        format!(
            "https://{host}/quote/{symbol}",
            host = self.host,
            symbol = stock_symbol
        )
    }
}
