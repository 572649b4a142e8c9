use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Storage key the serialized cart lives under.
pub const CART_STORAGE_KEY: &str = "cartItems";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CartLineRecord")]
pub struct CartLine {
    pub name: String,
    /// Unit price of the most recent add.
    pub price: f64,
    pub quantity: u32,
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
}

// Stored shape as written by older clients: quantity and totalPrice may be
// missing. The stored totalPrice is never trusted; it is derived again on load.
#[derive(Debug, Deserialize)]
struct CartLineRecord {
    name: String,
    price: f64,
    #[serde(default)]
    quantity: Option<u32>,
}

impl From<CartLineRecord> for CartLine {
    fn from(record: CartLineRecord) -> Self {
        let quantity = match record.quantity {
            Some(0) | None => 1,
            Some(quantity) => quantity,
        };
        Self {
            name: record.name,
            price: record.price,
            quantity,
            total_price: record.price * f64::from(quantity),
        }
    }
}

impl CartLine {
    pub fn new(name: String, price: f64) -> Self {
        Self {
            name,
            price,
            quantity: 1,
            total_price: price,
        }
    }

    /// One more unit at `price`. The latest price applies to the whole line.
    pub fn increment(&mut self, price: f64) -> Result<(), CartError> {
        self.quantity = self
            .quantity
            .checked_add(1)
            .ok_or_else(|| CartError::QuantityLimit(self.name.clone()))?;
        self.price = price;
        self.total_price = price * f64::from(self.quantity);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AddItemRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[validate(custom = "validate_name")]
    pub name: String,

    pub price: f64,
}

impl AddItemRequest {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    pub fn validated(self) -> Result<Self, CartError> {
        self.validate()?;

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CartError::InvalidPrice(self.price));
        }

        Ok(Self {
            name: self.name.trim().to_string(),
            price: self.price,
        })
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("Name is required"));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
    #[error("Invalid price: {0}")]
    InvalidPrice(f64),
    #[error("Quantity limit reached for '{0}'")]
    QuantityLimit(String),
}

/// Ordered cart lines, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.name == name)
    }

    /// Bumps the line named `name` or appends a fresh one.
    pub fn add_item(&mut self, name: &str, price: f64) -> Result<&CartLine, CartError> {
        let index = match self.lines.iter().position(|line| line.name == name) {
            Some(index) => {
                self.lines[index].increment(price)?;
                index
            }
            None => {
                self.lines.push(CartLine::new(name.to_string(), price));
                self.lines.len() - 1
            }
        };
        Ok(&self.lines[index])
    }

    // `Sum for f64` starts at -0.0, which would print as "-0.00".
    pub fn total(&self) -> f64 {
        self.lines
            .iter()
            .fold(0.0, |total, line| total + line.total_price)
    }

    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }
}
