use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

/// Parses a CSS selector, turning the selector error into an `anyhow::Error`.
pub fn parse_selector(css_selector: &str) -> Result<Selector> {
    Selector::parse(css_selector)
        .map_err(|why| anyhow!("Failed to Selector::parse({}) because: {:?}", css_selector, why))
}

/// Returns the value of `attr` on every element matched by `css_selector`, in document order.
///
/// Elements lacking the attribute are skipped.
///
/// # Example
///
/// ```
/// let html = r#"<fin-streamer data-field="regularMarketPrice" data-value="415.2"></fin-streamer>"#;
/// let document = Html::parse_document(html);
/// let values = attr_values(&document, "fin-streamer", "data-value").unwrap();
/// assert_eq!(values, vec!["415.2".to_string()]);
/// ```
pub fn attr_values(document: &Html, css_selector: &str, attr: &str) -> Result<Vec<String>> {
    let selector = parse_selector(css_selector)?;
    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::to_string)
        .collect())
}

/// Returns the trimmed text of every element matched by `css_selector`, in document order.
pub fn text_values(document: &Html, css_selector: &str) -> Result<Vec<String>> {
    let selector = parse_selector(css_selector)?;
    Ok(document.select(&selector).map(|element| text_of(&element)).collect())
}

/// Concatenates all descendant text nodes of `element` and trims the result.
pub fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
