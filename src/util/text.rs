use std::{collections::HashSet, str::FromStr};

use anyhow::*;
use rust_decimal::Decimal;

const NUMBER_ESCAPE_CHAR: &[char] = &['$', '%', ',', ' ', '"', '\n'];

/// 漲跌幅文字頭尾需要去除的字元，例如 " (+1.25%) "
const CHANGE_TRIM_CHAR: &[char] = &[' ', '(', ')', '%'];

/// Parses a decimal value from a given string.
///
/// This function accepts a string representation of a decimal number,
/// potentially containing commas as thousands separators and other escape characters,
/// and attempts to convert it into a `Decimal`. Scientific notation such as `1.5e2`
/// is accepted as well. If the conversion fails, an error is returned.
///
/// # Arguments
///
/// * `s`: A string slice containing the representation of a decimal number
///         that may include commas as thousands separators and other escape characters.
/// * `escape_chars`: Optional characters to be escaped from the input string.
///
/// # Returns
///
/// * `Result<Decimal>`: The parsed `Decimal` value if successful, or an error
///                      if the conversion fails.
///
/// # Example
///
/// ```
/// let s = "1,234.56";
/// let decimal_value = parse_decimal(s, Some(vec![','])).unwrap();
/// ```
pub fn parse_decimal(s: &str, escape_chars: Option<Vec<char>>) -> Result<Decimal> {
    let cleaned = clean_escape_chars(s, escape_chars);
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|why| anyhow!("Failed to parse '{}' as Decimal because {:?}", cleaned, why))
}

/// 將頁面上的漲跌幅文字轉成數值，例如 "(+2.50%)" => 2.5、"-1.0%" => -1.0
///
/// 只去除頭尾的空白、括號與百分比符號，其餘字元必須能夠解析為浮點數。
pub fn parse_change_percent(s: &str) -> Result<f64> {
    let cleaned = s.trim_matches(CHANGE_TRIM_CHAR);
    let value = f64::from_str(cleaned)
        .map_err(|why| anyhow!("Failed to parse '{}' as f64 because: {:?}", cleaned, why))?;
    if !value.is_finite() {
        bail!("Failed to parse '{}' as a finite percentage", cleaned);
    }

    Ok(value)
}

/// Removes a set of escape characters from a given string.
///
/// # Example
///
/// ```
/// let s = "Hello$Wor^ld!@#";
/// let escape_chars = Some(vec!['$', '^', '@', '#']);
/// let clean_s = clean_escape_chars(s, escape_chars);
/// assert_eq!(clean_s, "HelloWorld!");
/// ```
pub(crate) fn clean_escape_chars(s: &str, escape_chars: Option<Vec<char>>) -> String {
    let mut combined: Vec<char> = NUMBER_ESCAPE_CHAR.to_vec();
    if let Some(ec) = escape_chars {
        combined.extend(ec);
    }

    let filters = combined.iter().collect::<HashSet<_>>();
    s.chars().filter(|c| !filters.contains(c)).collect()
}
