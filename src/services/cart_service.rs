use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    database::repositories::{StorageRepository, StorageRepositoryError},
    models::cart::{AddItemRequest, Cart, CartError, CartLine, CART_STORAGE_KEY},
    views::{CartView, RenderError, RenderOutcome},
};

#[derive(Error, Debug)]
pub enum CartServiceError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Stored cart is corrupted: {source}")]
    CorruptedState {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize cart: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageRepositoryError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl From<CartError> for CartServiceError {
    fn from(e: CartError) -> Self {
        CartServiceError::ValidationError {
            message: e.to_string(),
        }
    }
}

/// Owns the cart, keeps storage in sync and redraws the view after every change.
pub struct CartService {
    storage: Arc<dyn StorageRepository>,
    view: Arc<dyn CartView>,
    cart: Cart,
    last_saved_at: Option<DateTime<Utc>>,
}

impl CartService {
    /// Restores the cart from storage, starting empty when nothing was saved yet.
    pub async fn load(
        storage: Arc<dyn StorageRepository>,
        view: Arc<dyn CartView>,
    ) -> Result<Self, CartServiceError> {
        let (cart, last_saved_at) = match storage.get_item(CART_STORAGE_KEY).await? {
            Some(item) => {
                let cart: Cart = serde_json::from_str(&item.value).map_err(|e| {
                    error!("Stored cart under '{}' is unreadable: {}", CART_STORAGE_KEY, e);
                    CartServiceError::CorruptedState { source: e }
                })?;
                (cart, Some(item.updated_at))
            }
            None => {
                debug!("No saved cart found, starting empty");
                (Cart::new(), None)
            }
        };

        debug!("Loaded cart with {} lines", cart.len());
        Ok(Self {
            storage,
            view,
            cart,
            last_saved_at,
        })
    }

    /// Adds one unit of `name` at `price`, then persists and re-renders.
    pub async fn add_item(&mut self, name: &str, price: f64) -> Result<CartLine, CartServiceError> {
        let request = AddItemRequest::new(name, price).validated()?;

        let line = self.cart.add_item(&request.name, request.price)?.clone();
        info!(
            "Added '{}' to cart: quantity {}, line total {:.2}",
            line.name, line.quantity, line.total_price
        );

        self.save().await?;
        self.render()?;

        Ok(line)
    }

    pub fn get_total(&self) -> f64 {
        self.cart.total()
    }

    pub fn render(&self) -> Result<RenderOutcome, CartServiceError> {
        let outcome = self.view.render(&self.cart)?;
        if outcome == RenderOutcome::AnchorMissing {
            warn!("Cart view has no anchor, nothing rendered");
        }
        Ok(outcome)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    pub fn len(&self) -> usize {
        self.cart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    async fn save(&mut self) -> Result<(), CartServiceError> {
        let value = serde_json::to_string(&self.cart)?;
        let stored = self
            .storage
            .set_item(CART_STORAGE_KEY, &value)
            .await
            .map_err(|e| {
                error!("Failed to persist cart: {}", e);
                CartServiceError::Storage(e)
            })?;

        self.last_saved_at = Some(stored.updated_at);
        debug!("Persisted {} cart lines", self.cart.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repositories::StoredItem;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // Mock storage for testing
    #[derive(Default)]
    struct MockStorageRepository {
        items: Mutex<HashMap<String, StoredItem>>,
        writes: Mutex<usize>,
    }

    impl MockStorageRepository {
        fn with_value(key: &str, value: &str) -> Self {
            let repo = Self::default();
            repo.items.lock().unwrap().insert(
                key.to_string(),
                StoredItem {
                    key: key.to_string(),
                    value: value.to_string(),
                    updated_at: Utc::now(),
                },
            );
            repo
        }

        fn raw(&self, key: &str) -> Option<String> {
            self.items.lock().unwrap().get(key).map(|i| i.value.clone())
        }
    }

    #[async_trait]
    impl StorageRepository for MockStorageRepository {
        async fn get_item(&self, key: &str) -> Result<Option<StoredItem>, StorageRepositoryError> {
            Ok(self.items.lock().unwrap().get(key).cloned())
        }

        async fn set_item(
            &self,
            key: &str,
            value: &str,
        ) -> Result<StoredItem, StorageRepositoryError> {
            let item = StoredItem {
                key: key.to_string(),
                value: value.to_string(),
                updated_at: Utc::now(),
            };
            self.items
                .lock()
                .unwrap()
                .insert(key.to_string(), item.clone());
            *self.writes.lock().unwrap() += 1;
            Ok(item)
        }

        async fn remove_item(&self, key: &str) -> Result<bool, StorageRepositoryError> {
            Ok(self.items.lock().unwrap().remove(key).is_some())
        }
    }

    // Records every render call
    #[derive(Default)]
    struct RecordingView {
        renders: Mutex<Vec<Cart>>,
        anchored: bool,
    }

    impl RecordingView {
        fn anchored() -> Self {
            Self {
                renders: Mutex::new(Vec::new()),
                anchored: true,
            }
        }
    }

    impl CartView for RecordingView {
        fn render(&self, cart: &Cart) -> Result<RenderOutcome, RenderError> {
            if !self.anchored {
                return Ok(RenderOutcome::AnchorMissing);
            }
            self.renders.lock().unwrap().push(cart.clone());
            Ok(RenderOutcome::Rendered)
        }
    }

    async fn service_with(
        repo: Arc<MockStorageRepository>,
        view: Arc<RecordingView>,
    ) -> CartService {
        CartService::load(repo, view).await.unwrap()
    }

    #[tokio::test]
    async fn test_load_empty_storage() {
        let repo = Arc::new(MockStorageRepository::default());
        let service = service_with(repo, Arc::new(RecordingView::anchored())).await;

        assert!(service.is_empty());
        assert_eq!(service.get_total(), 0.0);
        assert!(service.last_saved_at().is_none());
    }

    #[tokio::test]
    async fn test_add_item_persists_and_renders() {
        let repo = Arc::new(MockStorageRepository::default());
        let view = Arc::new(RecordingView::anchored());
        let mut service = service_with(repo.clone(), view.clone()).await;

        let line = service.add_item("Pizza", 9.5).await.unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.total_price, 9.5);

        let stored: serde_json::Value =
            serde_json::from_str(&repo.raw(CART_STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(stored[0]["name"], "Pizza");
        assert_eq!(stored[0]["totalPrice"], 9.5);
        assert_eq!(*repo.writes.lock().unwrap(), 1);

        let renders = view.renders.lock().unwrap();
        assert_eq!(renders.len(), 1);
        assert_eq!(renders[0].len(), 1);
        assert!(service.last_saved_at().is_some());
    }

    #[tokio::test]
    async fn test_add_same_item_twice_uses_new_price() {
        let repo = Arc::new(MockStorageRepository::default());
        let mut service = service_with(repo, Arc::new(RecordingView::anchored())).await;

        service.add_item("Burger", 10.0).await.unwrap();
        let line = service.add_item("Burger", 12.0).await.unwrap();

        assert_eq!(service.len(), 1);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.total_price, 24.0);
        assert_eq!(service.get_total(), 24.0);
    }

    #[tokio::test]
    async fn test_total_matches_sum_of_lines() {
        let repo = Arc::new(MockStorageRepository::default());
        let mut service = service_with(repo, Arc::new(RecordingView::anchored())).await;

        service.add_item("A", 1.25).await.unwrap();
        service.add_item("B", 2.5).await.unwrap();
        service.add_item("A", 1.25).await.unwrap();

        let sum: f64 = service.lines().iter().map(|l| l.total_price).sum();
        assert_eq!(service.get_total(), sum);
        assert_eq!(service.get_total(), 5.0);
    }

    #[tokio::test]
    async fn test_reload_round_trip() {
        let repo = Arc::new(MockStorageRepository::default());
        let mut service = service_with(repo.clone(), Arc::new(RecordingView::anchored())).await;
        service.add_item("Soupe", 5.0).await.unwrap();
        service.add_item("Pain", 1.2).await.unwrap();
        service.add_item("Soupe", 5.0).await.unwrap();

        let reloaded = service_with(repo, Arc::new(RecordingView::anchored())).await;
        assert_eq!(reloaded.cart(), service.cart());
        assert!(reloaded.last_saved_at().is_some());
    }

    #[tokio::test]
    async fn test_corrupted_state() {
        let repo = Arc::new(MockStorageRepository::with_value(CART_STORAGE_KEY, "{not json"));
        let result = CartService::load(repo, Arc::new(RecordingView::anchored())).await;

        assert!(matches!(result, Err(CartServiceError::CorruptedState { .. })));
    }

    #[tokio::test]
    async fn test_invalid_item_is_rejected_without_saving() {
        let repo = Arc::new(MockStorageRepository::default());
        let view = Arc::new(RecordingView::anchored());
        let mut service = service_with(repo.clone(), view.clone()).await;

        let result = service.add_item("  ", 3.0).await;
        assert!(matches!(result, Err(CartServiceError::ValidationError { .. })));

        let result = service.add_item("Vin", f64::NAN).await;
        assert!(matches!(result, Err(CartServiceError::ValidationError { .. })));

        assert!(service.is_empty());
        assert!(repo.raw(CART_STORAGE_KEY).is_none());
        assert!(view.renders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_quantity_limit_is_rejected_without_saving() {
        let stored = r#"[{"name":"Riz","price":1.0,"quantity":4294967295}]"#;
        let repo = Arc::new(MockStorageRepository::with_value(CART_STORAGE_KEY, stored));
        let view = Arc::new(RecordingView::anchored());
        let mut service = service_with(repo.clone(), view.clone()).await;

        let result = service.add_item("Riz", 1.0).await;
        assert!(matches!(result, Err(CartServiceError::ValidationError { .. })));

        assert_eq!(service.lines()[0].quantity, u32::MAX);
        assert_eq!(repo.raw(CART_STORAGE_KEY).unwrap(), stored);
        assert_eq!(*repo.writes.lock().unwrap(), 0);
        assert!(view.renders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_anchor_still_persists() {
        let repo = Arc::new(MockStorageRepository::default());
        let mut service = service_with(repo.clone(), Arc::new(RecordingView::default())).await;

        service.add_item("Olives", 3.0).await.unwrap();

        assert_eq!(service.render().unwrap(), RenderOutcome::AnchorMissing);
        assert!(repo.raw(CART_STORAGE_KEY).is_some());
    }
}
