use std::fs;
use std::path::{Path, PathBuf};

use markup5ever_rcdom::{Handle, RcDom};
use tracing::{debug, warn};

use super::{CartView, RenderError, RenderOutcome};
use crate::models::cart::{Cart, CartLine};
use crate::utils::dom::{
    append_node, append_text, find_first_by_class, find_last_by_name, html_to_dom, insert_before,
    new_element, remove_node, serialize_dom, set_text,
};
use crate::utils::formatting::{format_line_label, format_price, format_total_label};

pub const SUMMARY_CLASS: &str = "cart-summary";
pub const ITEMS_CLASS: &str = "cart-items";
pub const ITEM_CLASS: &str = "cart-item";
const ITEM_ROW_CLASS: &str = "d-flex justify-content-between align-items-center mb-2";

/// Rewrites the `.cart-summary` block of an HTML page on disk.
#[derive(Debug, Clone)]
pub struct HtmlPageView {
    page: PathBuf,
    output: Option<PathBuf>,
}

impl HtmlPageView {
    pub fn new(page: impl Into<PathBuf>) -> Self {
        Self {
            page: page.into(),
            output: None,
        }
    }

    /// Write the rendered page elsewhere instead of in place.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn page(&self) -> &Path {
        &self.page
    }

    fn target(&self) -> &Path {
        self.output.as_deref().unwrap_or(&self.page)
    }
}

impl CartView for HtmlPageView {
    fn render(&self, cart: &Cart) -> Result<RenderOutcome, RenderError> {
        if !self.page.exists() {
            return Err(RenderError::MissingPage {
                path: self.page.display().to_string(),
            });
        }

        let html = fs::read_to_string(&self.page)?;
        match render_summary(&html, cart)? {
            Some(rendered) => {
                fs::write(self.target(), rendered)?;
                debug!(
                    "Rendered {} cart lines into {}",
                    cart.len(),
                    self.target().display()
                );
                Ok(RenderOutcome::Rendered)
            }
            None => {
                warn!(
                    "No .{} element in {}, skipping render",
                    SUMMARY_CLASS,
                    self.page.display()
                );
                Ok(RenderOutcome::AnchorMissing)
            }
        }
    }
}

/// Returns the patched document, or `None` when the page has no summary block.
pub fn render_summary(html: &str, cart: &Cart) -> Result<Option<String>, RenderError> {
    let dom = html_to_dom(html)?;

    let summary = match find_first_by_class(&dom.document, SUMMARY_CLASS) {
        Some(summary) => summary,
        None => return Ok(None),
    };

    if let Some(previous) = find_first_by_class(&summary, ITEMS_CLASS) {
        remove_node(&dom, &previous);
    }

    let items = new_element(&dom, "div", Some(ITEMS_CLASS));
    for line in cart.lines() {
        let item = item_element(&dom, line);
        append_node(&dom, &items, &item);
    }

    match find_last_by_name(&summary, "h5") {
        Some(total_label) => {
            insert_before(&dom, &total_label, &items);
            set_text(&dom, &total_label, &format_total_label(cart.total()));
        }
        None => append_node(&dom, &summary, &items),
    }

    Ok(Some(serialize_dom(&dom)?))
}

fn item_element(dom: &RcDom, line: &CartLine) -> Handle {
    let item = new_element(dom, "div", Some(ITEM_CLASS));
    let row = new_element(dom, "div", Some(ITEM_ROW_CLASS));

    let label = new_element(dom, "span", None);
    append_text(dom, &label, &format_line_label(line));
    let amount = new_element(dom, "span", None);
    append_text(dom, &amount, &format_price(line.total_price));

    append_node(dom, &row, &label);
    append_node(dom, &row, &amount);
    append_node(dom, &item, &row);
    item
}
