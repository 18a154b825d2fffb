use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 單一股票的即時報價
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StockQuote {
    #[serde(rename = "symbol")]
    pub stock_symbol: String,
    /// 最新成交價
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// 漲跌幅，保留頁面上的原始文字，例如 "(+1.25%)"
    pub change: String,
}

impl StockQuote {
    pub fn new(stock_symbol: &str, price: Decimal, change: &str) -> Self {
        StockQuote {
            stock_symbol: stock_symbol.to_string(),
            price,
            change: change.to_string(),
        }
    }
}

/// 依價格排序的方向
#[derive(PartialEq, Debug, Copy, Clone, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// 未指定或為 asc 時遞增，其它任何值都視為遞減
    pub fn from_query(order: Option<&str>) -> Self {
        match order {
            None => SortOrder::Ascending,
            Some(o) if o.trim().eq_ignore_ascii_case("asc") => SortOrder::Ascending,
            Some(_) => SortOrder::Descending,
        }
    }
}

/// 漲幅最大與跌幅最大的股票
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TopMovers {
    pub top_gainer: StockQuote,
    pub top_loser: StockQuote,
}
