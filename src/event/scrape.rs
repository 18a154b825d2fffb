use std::{path::PathBuf, sync::Arc};

use tokio::sync::Mutex;

use crate::{
    cache::Snapshot,
    crawler::{self, StockInfo},
    error::StockError,
    export, logging,
};

/// 負責「只採集一次」的流程：檢查旗標、採集、寫出 CSV、更新快照
///
/// 採集與重設都必須先取得 `admission`，同一時間只會有一個寫入者。
pub struct Scraper {
    source: Arc<dyn StockInfo>,
    symbols: Vec<String>,
    csv_path: PathBuf,
    snapshot: Arc<Snapshot>,
    admission: Mutex<()>,
}

impl Scraper {
    pub fn new(
        source: Arc<dyn StockInfo>,
        symbols: Vec<String>,
        csv_path: impl Into<PathBuf>,
        snapshot: Arc<Snapshot>,
    ) -> Self {
        Scraper {
            source,
            symbols,
            csv_path: csv_path.into(),
            snapshot,
            admission: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// 採集所有代號，回傳保留下來的報價筆數
    ///
    /// 已採集過會回傳 [`StockError::AlreadyScraped`]；另一個採集尚未結束時回傳
    /// [`StockError::ScrapeInProgress`]；CSV 檔案無法建立或寫入時回傳
    /// [`StockError::ScrapeFailure`]，此時快照維持不變。
    pub async fn execute(&self) -> Result<usize, StockError> {
        let _permit = self
            .admission
            .try_lock()
            .map_err(|_| StockError::ScrapeInProgress)?;

        logging::info_file_async(format!(
            "Scrape request received. scraped: {}",
            self.snapshot.is_scraped()
        ));

        if self.snapshot.is_scraped() {
            return Err(StockError::AlreadyScraped);
        }

        // 先建立檔案，無法建立時不發出任何請求
        let mut writer = export::create_file(&self.csv_path).map_err(|why| {
            logging::error_file_async(format!("{:?}", why));
            StockError::from(why)
        })?;

        let quotes = crawler::crawl(&*self.source, &self.symbols).await;

        export::write_quotes(&mut writer, &quotes).map_err(|why| {
            logging::error_file_async(format!(
                "Failed to write {} because {:?}",
                self.csv_path.display(),
                why
            ));
            StockError::from(why)
        })?;

        self.snapshot.replace(quotes);
        let count = self.snapshot.len();

        logging::info_file_async(format!(
            "Stock data successfully written to {}! {} of {} symbols",
            self.csv_path.display(),
            count,
            self.symbols.len()
        ));

        Ok(count)
    }

    /// 清空快照並允許再次採集，若有採集正在進行會等它結束
    pub async fn reset(&self) {
        let _permit = self.admission.lock().await;
        self.snapshot.clear();
        logging::info_file_async("Scraping status reset".to_string());
    }
}
