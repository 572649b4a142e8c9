use console::style;

use super::{CartView, RenderError, RenderOutcome};
use crate::models::cart::Cart;
use crate::utils::formatting::{format_cart_table, format_total};

/// Prints the cart summary to stdout.
#[derive(Debug, Default, Clone)]
pub struct TerminalView;

impl TerminalView {
    pub fn new() -> Self {
        Self
    }

    pub fn summary(cart: &Cart) -> String {
        let mut output = String::new();

        if cart.is_empty() {
            output.push_str(&format!("{}\n", style("Your cart is empty").dim()));
        } else {
            output.push_str(&format_cart_table(cart.lines()));
            output.push('\n');
        }
        output.push_str(&format_total(cart.total()));

        output
    }
}

impl CartView for TerminalView {
    fn render(&self, cart: &Cart) -> Result<RenderOutcome, RenderError> {
        println!("{}", Self::summary(cart));
        Ok(RenderOutcome::Rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_empty_cart() {
        let summary = TerminalView::summary(&Cart::new());
        assert!(summary.contains("Your cart is empty"));
        assert!(summary.contains("TOTAL : 0.00 €"));
    }

    #[test]
    fn test_summary_with_lines() {
        let mut cart = Cart::new();
        cart.add_item("Lasagne", 11.0).unwrap();
        cart.add_item("Lasagne", 11.0).unwrap();

        let summary = TerminalView::summary(&cart);
        assert!(summary.contains("Lasagne"));
        assert!(summary.contains("TOTAL : 22.00 €"));
    }
}
