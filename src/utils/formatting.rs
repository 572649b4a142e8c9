use chrono::{DateTime, Local, Utc};
use console::style;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::models::{cart::CartLine, product::Product};
use crate::utils::price::CURRENCY_SYMBOL;

#[derive(Tabled)]
struct CartTableRow {
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Unit price")]
    price: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Total")]
    total: String,
}

#[derive(Tabled)]
struct ProductTableRow {
    #[tabled(rename = "Product")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
}

/// `12.5` -> `"12.50 €"`
pub fn format_price(amount: f64) -> String {
    format!("{:.2} {}", amount, CURRENCY_SYMBOL)
}

/// `"Pizza x2"`
pub fn format_line_label(line: &CartLine) -> String {
    format!("{} x{}", line.name, line.quantity)
}

pub fn format_total_label(total: f64) -> String {
    format!("TOTAL : {}", format_price(total))
}

pub fn format_cart_table(lines: &[CartLine]) -> String {
    if lines.is_empty() {
        return String::new();
    }

    let rows: Vec<CartTableRow> = lines
        .iter()
        .map(|line| CartTableRow {
            name: if line.name.chars().count() > 40 {
                format!("{}...", line.name.chars().take(37).collect::<String>())
            } else {
                line.name.clone()
            },
            price: format_price(line.price),
            quantity: line.quantity,
            total: format_price(line.total_price),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Alignment::left())
        .modify(Columns::new(1..), Alignment::right());

    table.to_string()
}

pub fn format_product_table(products: &[Product]) -> String {
    if products.is_empty() {
        return String::new();
    }

    let rows: Vec<ProductTableRow> = products
        .iter()
        .map(|product| ProductTableRow {
            name: product.name.clone(),
            price: format_price(product.price),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded()).with(Alignment::left());

    table.to_string()
}

pub fn format_total(total: f64) -> String {
    style(format_total_label(total)).bold().green().to_string()
}

pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(12.5), "12.50 €");
        assert_eq!(format_price(0.0), "0.00 €");
    }

    #[test]
    fn test_format_labels() {
        let line = CartLine {
            name: "Café".to_string(),
            price: 1.2,
            quantity: 3,
            total_price: 3.6,
        };
        assert_eq!(format_line_label(&line), "Café x3");
        assert_eq!(format_total_label(3.6), "TOTAL : 3.60 €");
    }

    #[test]
    fn test_cart_table_lists_every_line() {
        let lines = vec![
            CartLine::new("Pâtes".to_string(), 8.0),
            CartLine::new("Glace".to_string(), 3.5),
        ];
        let table = format_cart_table(&lines);

        assert!(table.contains("Pâtes"));
        assert!(table.contains("Glace"));
        assert!(table.contains("3.50 €"));
        assert!(format_cart_table(&[]).is_empty());
    }
}
