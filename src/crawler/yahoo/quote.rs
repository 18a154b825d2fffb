use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use scraper::Html;

use crate::{
    crawler::{yahoo::Yahoo, StockInfo},
    declare::StockQuote,
    util::{
        self,
        http::element,
        text,
    },
};

const PRICE_SELECTOR: &str = "fin-streamer[data-field='regularMarketPrice']";
const PRICE_ATTR: &str = "data-value";
const CHANGE_PERCENT_SELECTOR: &str = "fin-streamer[data-field='regularMarketChangePercent']";

#[async_trait]
impl StockInfo for Yahoo {
    async fn get_stock_quote(&self, stock_symbol: &str) -> Result<StockQuote> {
        let url = self.quote_url(stock_symbol);
        let text = util::http::get(&url, None).await?;

        parse_quote(stock_symbol, &text)?
            .ok_or_else(|| anyhow!("The price of {} not found from {}", stock_symbol, url))
    }
}

/// 從報價頁的 HTML 解析出報價，頁面上沒有有效價格時回傳 `None`
pub fn parse_quote(stock_symbol: &str, html: &str) -> Result<Option<StockQuote>> {
    let document = Html::parse_document(html);

    let price = match parse_price(&document)? {
        Some(price) => price,
        None => return Ok(None),
    };
    let change = parse_change(&document)?.unwrap_or_default();

    Ok(Some(StockQuote::new(stock_symbol, price, &change)))
}

/// 第一個能解析為正數的價格節點
fn parse_price(document: &Html) -> Result<Option<Decimal>> {
    Ok(element::attr_values(document, PRICE_SELECTOR, PRICE_ATTR)?
        .iter()
        .filter_map(|v| text::parse_decimal(v, None).ok())
        .find(|price| price.is_sign_positive() && !price.is_zero()))
}

/// 第一個文字不為空白的漲跌幅節點，原樣保留文字
fn parse_change(document: &Html) -> Result<Option<String>> {
    Ok(element::text_values(document, CHANGE_PERCENT_SELECTOR)?
        .into_iter()
        .find(|v| !v.is_empty()))
}
