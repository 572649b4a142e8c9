pub mod html;
pub mod terminal;

pub use html::*;
pub use terminal::*;

use thiserror::Error;

use crate::models::cart::Cart;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    /// The view has nowhere to draw the cart; nothing was changed.
    AnchorMissing,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Page not found: {path}")]
    MissingPage { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can display the cart summary.
pub trait CartView: Send + Sync {
    fn render(&self, cart: &Cart) -> Result<RenderOutcome, RenderError>;
}
