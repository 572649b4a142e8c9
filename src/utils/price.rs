use regex::Regex;
use thiserror::Error;

pub const CURRENCY_SYMBOL: &str = "€";

lazy_static::lazy_static! {
    static ref PRICE_REGEX: Regex = Regex::new(r"^(\d+(?:[.,]\d*)?|[.,]\d+)").unwrap();
}

#[derive(Error, Debug, PartialEq)]
#[error("Not a price: '{text}'")]
pub struct PriceParseError {
    pub text: String,
}

/// Reads a display price such as `"12.50 €"` or `"3,90€"`.
///
/// Like a lenient float parse, only the leading number counts: trailing
/// text after it is ignored.
pub fn parse_price(text: &str) -> Result<f64, PriceParseError> {
    let cleaned = text.replace(CURRENCY_SYMBOL, "");
    let cleaned = cleaned.trim();

    PRICE_REGEX
        .captures(cleaned)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
        .ok_or_else(|| PriceParseError {
            text: text.to_string(),
        })
}
