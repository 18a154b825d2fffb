//! 報價快照。
//!
//! [`Snapshot`] 保存最近一次成功採集的報價以及「是否已採集」旗標，
//! 兩者放在同一把 `RwLock` 內，讀取端永遠看不到只更新一半的狀態。
//! 若鎖已中毒，讀取 API 會以空快照降級而不是 panic。

use std::sync::RwLock;

use crate::{
    declare::{SortOrder, StockQuote, TopMovers},
    error::StockError,
    logging,
    util::text,
};

#[derive(Default, Debug)]
struct Inner {
    /// 依採集順序存放的報價
    quotes: Vec<StockQuote>,
    /// 自上次重設後是否已完成採集
    scraped: bool,
}

/// 記憶體中的報價快照
///
/// 生命週期：空 → 採集後填入一次 → 重設後清空。
#[derive(Default, Debug)]
pub struct Snapshot {
    inner: RwLock<Inner>,
}

impl Snapshot {
    pub fn new() -> Self {
        Default::default()
    }

    /// 以新的報價取代整個快照並標記為已採集
    pub fn replace(&self, quotes: Vec<StockQuote>) {
        match self.inner.write() {
            Ok(mut inner) => {
                inner.quotes = quotes;
                inner.scraped = true;
            }
            Err(why) => {
                logging::error_file_async(format!("Failed to inner.write because {:?}", why));
            }
        }
    }

    /// 清空快照並允許再次採集
    pub fn clear(&self) {
        match self.inner.write() {
            Ok(mut inner) => {
                inner.quotes.clear();
                inner.scraped = false;
            }
            Err(why) => {
                logging::error_file_async(format!("Failed to inner.write because {:?}", why));
            }
        }
    }

    pub fn is_scraped(&self) -> bool {
        self.inner.read().map(|inner| inner.scraped).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.quotes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 依採集順序回傳所有報價
    pub fn all(&self) -> Vec<StockQuote> {
        self.inner
            .read()
            .map(|inner| inner.quotes.clone())
            .unwrap_or_default()
    }

    /// 代號不分大小寫，轉為大寫後完全比對
    pub fn find_by_symbol(&self, stock_symbol: &str) -> Option<StockQuote> {
        let stock_symbol = stock_symbol.trim().to_uppercase();
        self.inner.read().ok().and_then(|inner| {
            inner
                .quotes
                .iter()
                .find(|q| q.stock_symbol == stock_symbol)
                .cloned()
        })
    }

    /// 回傳依價格穩定排序後的副本，不影響快照內的順序
    pub fn sorted_by_price(&self, order: SortOrder) -> Vec<StockQuote> {
        let mut quotes = self.all();
        match order {
            SortOrder::Ascending => quotes.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::Descending => quotes.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        quotes
    }

    /// 找出漲幅最大與跌幅最大的股票
    ///
    /// 漲跌幅文字無法解析（含 NaN、無窮大）的報價不列入比較；數值相同時保留先出現的。
    /// 快照為空時回傳 [`StockError::EmptySnapshot`]，有資料但全部無法解析時回傳空的報價。
    pub fn top_gainer_and_loser(&self) -> Result<TopMovers, StockError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StockError::EmptySnapshot)?;

        if inner.quotes.is_empty() {
            return Err(StockError::EmptySnapshot);
        }

        let mut gainer: Option<(f64, &StockQuote)> = None;
        let mut loser: Option<(f64, &StockQuote)> = None;

        for quote in &inner.quotes {
            let change = match text::parse_change_percent(&quote.change) {
                Ok(c) => c,
                Err(_) => continue,
            };

            if gainer.is_none_or(|(max, _)| change > max) {
                gainer = Some((change, quote));
            }

            if loser.is_none_or(|(min, _)| change < min) {
                loser = Some((change, quote));
            }
        }

        Ok(TopMovers {
            top_gainer: gainer.map(|(_, q)| q.clone()).unwrap_or_default(),
            top_loser: loser.map(|(_, q)| q.clone()).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn snapshot() -> Snapshot {
        let snapshot = Snapshot::new();
        snapshot.replace(vec![
            StockQuote::new("AAPL", dec!(182.5), "+2.5%"),
            StockQuote::new("MSFT", dec!(415.1), "-1.0%"),
            StockQuote::new("GOOGL", dec!(140.2), "abc"),
        ]);
        snapshot
    }

    #[test]
    fn test_lifecycle() {
        let snapshot = Snapshot::new();
        assert!(!snapshot.is_scraped());
        assert!(snapshot.is_empty());

        snapshot.replace(vec![StockQuote::new("AAPL", dec!(1), "")]);
        assert!(snapshot.is_scraped());
        assert_eq!(snapshot.len(), 1);

        snapshot.clear();
        assert!(!snapshot.is_scraped());
        assert!(snapshot.all().is_empty());
    }

    #[test]
    fn test_replace_with_nothing_still_marks_scraped() {
        let snapshot = Snapshot::new();
        snapshot.replace(Vec::new());
        assert!(snapshot.is_scraped());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_find_by_symbol() {
        let snapshot = snapshot();
        assert_eq!(snapshot.find_by_symbol("aapl").unwrap().price, dec!(182.5));
        assert_eq!(snapshot.find_by_symbol("MsFt").unwrap().stock_symbol, "MSFT");
        assert!(snapshot.find_by_symbol("ZZZZ").is_none());
        assert!(snapshot.find_by_symbol("").is_none());
    }

    #[test]
    fn test_sorted_by_price() {
        let snapshot = snapshot();
        let asc: Vec<String> = snapshot
            .sorted_by_price(SortOrder::Ascending)
            .into_iter()
            .map(|q| q.stock_symbol)
            .collect();
        let mut desc: Vec<String> = snapshot
            .sorted_by_price(SortOrder::Descending)
            .into_iter()
            .map(|q| q.stock_symbol)
            .collect();

        assert_eq!(asc, vec!["GOOGL", "AAPL", "MSFT"]);
        desc.reverse();
        assert_eq!(asc, desc);

        // 排序不會改變快照本身的順序
        let all: Vec<String> = snapshot.all().into_iter().map(|q| q.stock_symbol).collect();
        assert_eq!(all, vec!["AAPL", "MSFT", "GOOGL"]);
    }

    #[test]
    fn test_sorted_by_price_is_stable() {
        let snapshot = Snapshot::new();
        snapshot.replace(vec![
            StockQuote::new("A", dec!(10), ""),
            StockQuote::new("B", dec!(5), ""),
            StockQuote::new("C", dec!(10), ""),
        ]);

        let asc: Vec<String> = snapshot
            .sorted_by_price(SortOrder::Ascending)
            .into_iter()
            .map(|q| q.stock_symbol)
            .collect();
        let desc: Vec<String> = snapshot
            .sorted_by_price(SortOrder::Descending)
            .into_iter()
            .map(|q| q.stock_symbol)
            .collect();

        assert_eq!(asc, vec!["B", "A", "C"]);
        assert_eq!(desc, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_top_gainer_and_loser() {
        let movers = snapshot().top_gainer_and_loser().unwrap();
        assert_eq!(movers.top_gainer.stock_symbol, "AAPL");
        assert_eq!(movers.top_loser.stock_symbol, "MSFT");
    }

    #[test]
    fn test_top_gainer_and_loser_ties_keep_first() {
        let snapshot = Snapshot::new();
        snapshot.replace(vec![
            StockQuote::new("A", dec!(1), "(+1.00%)"),
            StockQuote::new("B", dec!(1), "+1.0%"),
            StockQuote::new("C", dec!(1), "-2%"),
            StockQuote::new("D", dec!(1), " (-2.00%) "),
        ]);

        let movers = snapshot.top_gainer_and_loser().unwrap();
        assert_eq!(movers.top_gainer.stock_symbol, "A");
        assert_eq!(movers.top_loser.stock_symbol, "C");
    }

    #[test]
    fn test_top_gainer_and_loser_skips_non_finite() {
        let snapshot = Snapshot::new();
        snapshot.replace(vec![
            StockQuote::new("X", dec!(1), "NaN%"),
            StockQuote::new("AAPL", dec!(182.5), "+2.5%"),
            StockQuote::new("Y", dec!(1), "inf"),
            StockQuote::new("MSFT", dec!(415.1), "-1.0%"),
            StockQuote::new("Z", dec!(1), "-Infinity%"),
        ]);

        let movers = snapshot.top_gainer_and_loser().unwrap();
        assert_eq!(movers.top_gainer.stock_symbol, "AAPL");
        assert_eq!(movers.top_loser.stock_symbol, "MSFT");
    }

    #[test]
    fn test_top_gainer_and_loser_single_record() {
        let snapshot = Snapshot::new();
        snapshot.replace(vec![StockQuote::new("AMD", dec!(150), "+0.4%")]);

        let movers = snapshot.top_gainer_and_loser().unwrap();
        assert_eq!(movers.top_gainer, movers.top_loser);
    }

    #[test]
    fn test_top_gainer_and_loser_unparsable() {
        let snapshot = Snapshot::new();
        snapshot.replace(vec![StockQuote::new("GOOGL", dec!(140.2), "abc")]);

        let movers = snapshot.top_gainer_and_loser().unwrap();
        assert_eq!(movers, TopMovers::default());
    }

    #[test]
    fn test_top_gainer_and_loser_empty() {
        let snapshot = Snapshot::new();
        assert!(matches!(
            snapshot.top_gainer_and_loser(),
            Err(StockError::EmptySnapshot)
        ));
    }
}
