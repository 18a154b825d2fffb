use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the stock API.
///
/// None of these stop the process; each one is turned into a status code and a
/// `{"message": ...}` body at the HTTP boundary.
#[derive(Error, Debug)]
pub enum StockError {
    /// The snapshot is already populated; a reset is required before scraping again.
    #[error("Stock data has already been scraped. Please refresh the data before re-scraping.")]
    AlreadyScraped,

    /// Another scrape currently holds the admission lock.
    #[error("Stock data is being scraped. Please try again later.")]
    ScrapeInProgress,

    /// I/O failure while crawling or while writing the CSV file.
    #[error("Failed to scrape stock data: {0}")]
    ScrapeFailure(String),

    #[error("Stock not found")]
    NotFound,

    #[error("No stock data available")]
    EmptySnapshot,
}

impl StockError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            StockError::AlreadyScraped | StockError::EmptySnapshot => StatusCode::BAD_REQUEST,
            StockError::ScrapeInProgress => StatusCode::CONFLICT,
            StockError::ScrapeFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StockError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<anyhow::Error> for StockError {
    fn from(err: anyhow::Error) -> Self {
        StockError::ScrapeFailure(err.to_string())
    }
}

impl IntoResponse for StockError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({ "message": self.to_string() })),
        )
            .into_response()
    }
}
