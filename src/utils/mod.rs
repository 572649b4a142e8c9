pub mod config;
pub mod dom;
pub mod formatting;
pub mod price;

// Re-exports
pub use config::*;
pub use price::{parse_price, PriceParseError};
