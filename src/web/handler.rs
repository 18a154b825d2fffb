use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    declare::{SortOrder, StockQuote, TopMovers},
    error::StockError,
    export, logging,
    web::AppState,
};

#[derive(Deserialize, Debug, Default)]
pub struct SearchParams {
    #[serde(default)]
    pub symbol: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct SortParams {
    pub order: Option<String>,
}

/// GET /api/stocks/scrape
pub async fn scrape(State(state): State<AppState>) -> Result<Json<Value>, StockError> {
    let count = state.scraper.execute().await?;

    Ok(Json(json!({
        "message": "Stock data scraped successfully!",
        "count": count,
    })))
}

/// GET /api/stocks/reset-scraping
pub async fn reset_scraping(State(state): State<AppState>) -> Json<Value> {
    state.scraper.reset().await;

    Json(json!({
        "message": "Scraping status reset successfully. You can now scrape again.",
    }))
}

/// GET /api/stocks
pub async fn get_stocks(State(state): State<AppState>) -> Json<Vec<StockQuote>> {
    Json(state.snapshot.all())
}

/// GET /api/stocks/search?symbol=X
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<StockQuote>, StockError> {
    state
        .snapshot
        .find_by_symbol(&params.symbol)
        .map(Json)
        .ok_or(StockError::NotFound)
}

/// GET /api/stocks/sort?order=asc|desc
pub async fn sort(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Json<Vec<StockQuote>> {
    let order = SortOrder::from_query(params.order.as_deref());
    Json(state.snapshot.sorted_by_price(order))
}

/// GET /api/stocks/top-gainer-loser
pub async fn top_gainer_loser(
    State(state): State<AppState>,
) -> Result<Json<TopMovers>, StockError> {
    state.snapshot.top_gainer_and_loser().map(Json)
}

/// GET /api/stocks/download
pub async fn download(State(state): State<AppState>) -> Response {
    match export::to_bytes(&state.snapshot.all()) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={}", export::CSV_FILE_NAME),
                ),
            ],
            body,
        )
            .into_response(),
        Err(why) => {
            logging::error_file_async(format!("Failed to render CSV because {:?}", why));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Failed to render CSV" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{net::SocketAddr, sync::Arc};

    use reqwest::Client;
    use rust_decimal_macros::dec;
    use tokio::net::TcpListener;

    use crate::{
        cache::Snapshot, crawler::tests::StubStockInfo, event::scrape::Scraper, util, web,
    };

    use super::*;

    struct TestServer {
        base: String,
        client: Client,
        csv_path: std::path::PathBuf,
    }

    impl TestServer {
        async fn start(name: &str) -> Self {
            dotenv::dotenv().ok();
            util::ensure_rustls_crypto_provider();

            let csv_path = std::env::temp_dir().join(format!("stock_scraper_web_{}.csv", name));
            let source = StubStockInfo::with(vec![
                StockQuote::new("AAPL", dec!(182.5), "+2.5%"),
                StockQuote::new("MSFT", dec!(415.1), "-1.0%"),
                StockQuote::new("GOOGL", dec!(140.2), "abc"),
            ]);
            let scraper = Scraper::new(
                Arc::new(source),
                ["AAPL", "MSFT", "GOOGL", "ZZZZ"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                csv_path.clone(),
                Arc::new(Snapshot::new()),
            );

            let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
                .await
                .unwrap();
            let addr = listener.local_addr().unwrap();
            let app = web::router(web::AppState::new(scraper));
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            TestServer {
                base: format!("http://{}", addr),
                client: Client::new(),
                csv_path,
            }
        }

        async fn get(&self, path: &str) -> (u16, String) {
            let res = self
                .client
                .get(format!("{}{}", self.base, path))
                .send()
                .await
                .unwrap();
            let status = res.status().as_u16();
            (status, res.text().await.unwrap())
        }

        async fn get_json(&self, path: &str) -> (u16, Value) {
            let (status, body) = self.get(path).await;
            (status, serde_json::from_str(&body).unwrap())
        }
    }

    impl Drop for TestServer {
        fn drop(&mut self) {
            std::fs::remove_file(&self.csv_path).ok();
        }
    }

    fn symbols(body: &Value) -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|v| v["symbol"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_scrape_guard() {
        let server = TestServer::start("guard").await;

        let (status, body) = server.get_json("/api/stocks/scrape").await;
        assert_eq!(status, 200);
        assert_eq!(body["message"], "Stock data scraped successfully!");
        assert_eq!(body["count"], 3);

        let (status, body) = server.get_json("/api/stocks/scrape").await;
        assert_eq!(status, 400);
        assert_eq!(
            body["message"],
            "Stock data has already been scraped. Please refresh the data before re-scraping."
        );

        let (status, body) = server.get_json("/api/stocks/reset-scraping").await;
        assert_eq!(status, 200);
        assert_eq!(
            body["message"],
            "Scraping status reset successfully. You can now scrape again."
        );

        let (status, body) = server.get_json("/api/stocks").await;
        assert_eq!(status, 200);
        assert!(body.as_array().unwrap().is_empty());

        let (status, _) = server.get_json("/api/stocks/scrape").await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn test_read_endpoints() {
        let server = TestServer::start("read").await;
        server.get("/api/stocks/scrape").await;

        let (status, body) = server.get_json("/api/stocks").await;
        assert_eq!(status, 200);
        assert_eq!(symbols(&body), vec!["AAPL", "MSFT", "GOOGL"]);
        assert_eq!(body[0]["price"], 182.5);
        assert_eq!(body[0]["change"], "+2.5%");

        let (status, body) = server.get_json("/api/stocks/search?symbol=msft").await;
        assert_eq!(status, 200);
        assert_eq!(body["symbol"], "MSFT");

        let (status, body) = server.get_json("/api/stocks/search?symbol=ZZZZ").await;
        assert_eq!(status, 404);
        assert_eq!(body["message"], "Stock not found");

        let (status, _) = server.get_json("/api/stocks/search").await;
        assert_eq!(status, 404);

        let (_, asc) = server.get_json("/api/stocks/sort").await;
        assert_eq!(symbols(&asc), vec!["GOOGL", "AAPL", "MSFT"]);
        let (_, desc) = server.get_json("/api/stocks/sort?order=desc").await;
        assert_eq!(symbols(&desc), vec!["MSFT", "AAPL", "GOOGL"]);

        let (status, body) = server.get_json("/api/stocks/top-gainer-loser").await;
        assert_eq!(status, 200);
        assert_eq!(body["top_gainer"]["symbol"], "AAPL");
        assert_eq!(body["top_loser"]["symbol"], "MSFT");
    }

    #[tokio::test]
    async fn test_top_gainer_loser_empty() {
        let server = TestServer::start("empty").await;

        let (status, body) = server.get_json("/api/stocks/top-gainer-loser").await;
        assert_eq!(status, 400);
        assert_eq!(body["message"], "No stock data available");
    }

    #[tokio::test]
    async fn test_download() {
        let server = TestServer::start("download").await;
        server.get("/api/stocks/scrape").await;

        let res = server
            .client
            .get(format!("{}/api/stocks/download", server.base))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            res.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=stocks_data.csv"
        );

        let body = res.text().await.unwrap();
        assert_eq!(
            body,
            "Symbol,Price,Change\nAAPL,182.50,+2.5%\nMSFT,415.10,-1.0%\nGOOGL,140.20,abc\n"
        );
        assert_eq!(std::fs::read_to_string(&server.csv_path).unwrap(), body);
    }
}
