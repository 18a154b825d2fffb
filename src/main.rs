use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Result;

use crate::{
    cache::Snapshot, config::SETTINGS, crawler::yahoo::Yahoo, event::scrape::Scraper,
    web::AppState,
};

pub mod cache;
pub mod config;
pub mod crawler;
pub mod declare;
pub mod error;
pub mod event;
pub mod export;
pub mod logging;
pub mod util;
pub mod web;

#[cfg(all(target_os = "linux", target_env = "musl"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    util::ensure_rustls_crypto_provider();

    let scraper = Scraper::new(
        Arc::new(Yahoo::new(&SETTINGS.crawler.host)),
        SETTINGS.crawler.symbols.clone(),
        SETTINGS.crawler.csv_path.as_str(),
        Arc::new(Snapshot::new()),
    );

    let msg = format!(
        "StockScraper 已啟動\r\nRust OS/Arch: {}/{}\r\nsymbols: {}\r\n",
        env::consts::OS,
        env::consts::ARCH,
        SETTINGS.crawler.symbols.join(",")
    );
    logging::info_file_async(msg.clone());
    logging::info_console(msg);

    let addr = SocketAddr::from(([0, 0, 0, 0], SETTINGS.system.http_port));
    web::serve(addr, AppState::new(scraper)).await
}
