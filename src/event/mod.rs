/// 採集報價並寫入快照與 CSV
pub mod scrape;
