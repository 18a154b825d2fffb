use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use futures::{stream, StreamExt};

use crate::{declare::StockQuote, logging};

/// 雅虎財經
pub mod yahoo;

/// 報價來源，負責取得單一股票的報價
#[async_trait]
pub trait StockInfo: Send + Sync {
    /// 找不到價格或請求失敗時回傳錯誤
    async fn get_stock_quote(&self, stock_symbol: &str) -> Result<StockQuote>;
}

/// 單一股票的採集結果
#[derive(Debug)]
pub enum Visit {
    Found(StockQuote),
    Skipped { stock_symbol: String, reason: String },
}

/// 依序逐一採集每個股票代號，回傳每個代號的採集結果
///
/// 單一代號失敗不會中斷其餘代號。
pub async fn visit_all<'a>(source: &'a dyn StockInfo, symbols: &'a [String]) -> Vec<Visit> {
    stream::iter(symbols)
        .then(move |stock_symbol| async move {
            match source.get_stock_quote(stock_symbol).await {
                Ok(quote) => Visit::Found(quote),
                Err(why) => Visit::Skipped {
                    stock_symbol: stock_symbol.clone(),
                    reason: format!("{:?}", why),
                },
            }
        })
        .collect()
        .await
}

/// 採集所有代號並只保留取得價格的報價，同一代號只保留第一筆
pub async fn crawl(source: &dyn StockInfo, symbols: &[String]) -> Vec<StockQuote> {
    let mut seen = HashSet::with_capacity(symbols.len());
    let mut quotes = Vec::with_capacity(symbols.len());

    for visit in visit_all(source, symbols).await {
        match visit {
            Visit::Found(quote) => {
                if seen.insert(quote.stock_symbol.clone()) {
                    quotes.push(quote);
                }
            }
            Visit::Skipped {
                stock_symbol,
                reason,
            } => {
                logging::warn_file_async(format!(
                    "Skip {} because {}",
                    stock_symbol, reason
                ));
            }
        }
    }

    quotes
}
