use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;

use crate::{cache::Snapshot, event::scrape::Scraper, logging};

pub mod handler;

/// 請求處理器共用的狀態
#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<Snapshot>,
    pub scraper: Arc<Scraper>,
}

impl AppState {
    pub fn new(scraper: Scraper) -> Self {
        AppState {
            snapshot: scraper.snapshot().clone(),
            scraper: Arc::new(scraper),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/stocks", get(handler::get_stocks))
        .route("/api/stocks/scrape", get(handler::scrape))
        .route("/api/stocks/reset-scraping", get(handler::reset_scraping))
        .route("/api/stocks/search", get(handler::search))
        .route("/api/stocks/sort", get(handler::sort))
        .route("/api/stocks/top-gainer-loser", get(handler::top_gainer_loser))
        .route("/api/stocks/download", get(handler::download))
        .with_state(state)
}

/// 啟動 HTTP 服務，直到服務停止才返回
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    logging::info_file_async(format!("HTTP 伺服器正在 {:?} 開始服務...", addr));
    logging::info_console(format!("Listening on http://{}", addr));

    let result = axum::serve(listener, router(state)).await;

    match &result {
        Ok(_) => logging::info_file_async(format!("HTTP 伺服器在 {:?} 正常停止", addr)),
        Err(why) => {
            logging::error_file_async(format!("HTTP 伺服器運行中斷 ({:?}): {}", addr, why))
        }
    }

    Ok(result?)
}
