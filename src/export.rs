use std::{fs::File, io::Write, path::Path};

use anyhow::{anyhow, Result};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::declare::StockQuote;

/// 下載時使用的檔名
pub const CSV_FILE_NAME: &str = "stocks_data.csv";

const HEADERS: [&str; 3] = ["Symbol", "Price", "Change"];

/// 建立 CSV 檔案並寫入標題列，既有的同名檔案會被覆蓋
pub fn create_file(path: impl AsRef<Path>) -> Result<csv::Writer<File>> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .map_err(|why| anyhow!("error creating CSV file {}: {}", path.display(), why))?;
    writer.write_record(HEADERS)?;
    Ok(writer)
}

/// 將報價逐列寫入，價格固定為小數兩位
pub fn write_quotes<W: Write>(writer: &mut csv::Writer<W>, quotes: &[StockQuote]) -> Result<()> {
    for quote in quotes {
        writer.write_record([
            quote.stock_symbol.as_str(),
            format_price(quote.price).as_str(),
            quote.change.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// 將報價轉為含標題列的 CSV 內容
pub fn to_bytes(quotes: &[StockQuote]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::with_capacity(64 * (quotes.len() + 1)));
    writer.write_record(HEADERS)?;
    write_quotes(&mut writer, quotes)?;
    writer
        .into_inner()
        .map_err(|why| anyhow!("Failed to flush CSV content because {}", why))
}

/// 四捨五入至小數兩位，`{:.2}` 對 `Decimal` 只會截斷
fn format_price(price: Decimal) -> String {
    format!(
        "{:.2}",
        price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
