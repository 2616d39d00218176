//! Environment for the cart reducer: the remote cart service and a clock.

use crate::error::CartError;
use crate::types::{AddToCartRequest, CartLineItem, LineItemId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tixcart_core::environment::{Clock, SystemClock};

/// Boxed future returned by [`CartBackend`] methods.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CartError>> + Send + 'a>>;

/// The remote cart service, the source of truth for cart contents.
///
/// Every call may fail with a network, authentication, or rejection error.
/// Authentication failures must surface as [`CartError::Unauthorized`] so the
/// store can apply its auth-specific recovery.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures so the backend can be shared as
/// `Arc<dyn CartBackend>` and captured by effects.
pub trait CartBackend: Send + Sync {
    /// Load the current cart.
    fn get_cart(&self) -> BackendFuture<'_, Vec<CartLineItem>>;

    /// Add a ticket. The response body carries nothing the store relies on.
    fn add_to_cart(&self, request: AddToCartRequest) -> BackendFuture<'_, ()>;

    /// Remove a line, returning the updated cart.
    fn remove_from_cart(&self, item_id: LineItemId) -> BackendFuture<'_, Vec<CartLineItem>>;

    /// Set a line's quantity, returning the updated cart.
    fn update_cart_item(
        &self,
        item_id: LineItemId,
        quantity: u32,
    ) -> BackendFuture<'_, Vec<CartLineItem>>;

    /// Empty the cart.
    fn clear_cart(&self) -> BackendFuture<'_, ()>;
}

/// Dependencies injected into the cart reducer.
#[derive(Clone)]
pub struct CartEnvironment {
    backend: Arc<dyn CartBackend>,
    clock: Arc<dyn Clock>,
}

impl CartEnvironment {
    /// Create an environment from explicit dependencies.
    #[must_use]
    pub fn new(backend: Arc<dyn CartBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { backend, clock }
    }

    /// Production environment: the given backend and the system clock.
    #[must_use]
    pub fn production(backend: Arc<dyn CartBackend>) -> Self {
        Self::new(backend, Arc::new(SystemClock))
    }

    /// Shared handle to the backend, for moving into effects.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn CartBackend> {
        Arc::clone(&self.backend)
    }

    /// Clock used to timestamp failures.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

impl std::fmt::Debug for CartEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEnvironment").finish_non_exhaustive()
    }
}
