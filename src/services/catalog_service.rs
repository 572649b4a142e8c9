use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::product::Product;
use crate::utils::dom::{find_all_by_class, find_first_by_class, html_to_dom, text_content};
use crate::utils::price::parse_price;

pub const CARD_CLASS: &str = "card";
pub const CARD_TITLE_CLASS: &str = "card-title";
pub const CARD_PRICE_CLASS: &str = "card-text";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Product not found: {name}")]
    ProductNotFound { name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads the product cards of a listing page.
pub struct CatalogService;

impl CatalogService {
    pub fn products(page: &Path) -> Result<Vec<Product>, CatalogError> {
        let html = fs::read_to_string(page)?;
        Self::products_from_html(&html)
    }

    pub fn products_from_html(html: &str) -> Result<Vec<Product>, CatalogError> {
        let dom = html_to_dom(html)?;
        let mut products = Vec::new();

        for card in find_all_by_class(&dom.document, CARD_CLASS) {
            let title = match find_first_by_class(&card, CARD_TITLE_CLASS) {
                Some(title) => text_content(&title).trim().to_string(),
                None => continue,
            };
            if title.is_empty() {
                continue;
            }

            let price_text = find_first_by_class(&card, CARD_PRICE_CLASS)
                .map(|node| text_content(&node))
                .unwrap_or_default();

            match parse_price(&price_text) {
                Ok(price) => products.push(Product::new(title, price)),
                Err(e) => warn!("Skipping card '{}': {}", title, e),
            }
        }

        debug!("Found {} products", products.len());
        Ok(products)
    }

    /// The card the user "clicked": exact match on the trimmed title.
    pub fn find(page: &Path, name: &str) -> Result<Product, CatalogError> {
        let products = Self::products(page)?;
        Self::find_in(products, name)
    }

    fn find_in(products: Vec<Product>, name: &str) -> Result<Product, CatalogError> {
        let name = name.trim();
        products
            .into_iter()
            .find(|product| product.name == name)
            .ok_or_else(|| CatalogError::ProductNotFound {
                name: name.to_string(),
            })
    }
}
