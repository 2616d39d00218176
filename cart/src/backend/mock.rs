//! In-memory cart service for tests and offline demos.
//!
//! Holds a server-side cart, records every call, and can be scripted to fail
//! the next call of a given operation.

use crate::environment::{BackendFuture, CartBackend};
use crate::error::CartError;
use crate::types::{AddToCartRequest, CartLineItem, CartOperation, LineItemId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A call received by [`MockCartBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// `get_cart`
    GetCart,
    /// `add_to_cart`
    AddToCart(AddToCartRequest),
    /// `remove_from_cart`
    RemoveFromCart(LineItemId),
    /// `update_cart_item`
    UpdateCartItem {
        /// Line being changed
        item_id: LineItemId,
        /// Quantity sent
        quantity: u32,
    },
    /// `clear_cart`
    ClearCart,
}

impl BackendCall {
    /// The operation this call belongs to
    #[must_use]
    pub const fn operation(&self) -> CartOperation {
        match self {
            Self::GetCart => CartOperation::Fetch,
            Self::AddToCart(_) => CartOperation::Add,
            Self::RemoveFromCart(_) => CartOperation::Remove,
            Self::UpdateCartItem { .. } => CartOperation::Update,
            Self::ClearCart => CartOperation::Clear,
        }
    }
}

#[derive(Debug, Default)]
struct MockServer {
    items: Vec<CartLineItem>,
    next_line: u64,
    failures: HashMap<CartOperation, VecDeque<CartError>>,
    calls: Vec<BackendCall>,
}

impl MockServer {
    /// Record the call and consume a scripted failure for its operation.
    fn accept(&mut self, call: BackendCall) -> Result<(), CartError> {
        let operation = call.operation();
        self.calls.push(call);
        match self.failures.get_mut(&operation).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn not_found(item_id: &LineItemId) -> CartError {
        CartError::Rejected {
            status: 404,
            message: format!("Cart item {item_id} not found"),
        }
    }

    fn add(&mut self, request: AddToCartRequest) {
        let AddToCartRequest { item, quantity } = request;
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.event_id == item.event_id && line.ticket_id == item.ticket_id)
        {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }

        self.next_line += 1;
        self.items.push(CartLineItem {
            id: LineItemId::new(format!("line-{}", self.next_line)),
            event_id: item.event_id,
            event_name: item.event_name,
            event_image: item.event_image,
            ticket_id: item.ticket_id,
            ticket_type: item.ticket_type,
            price: item.price,
            quantity,
        });
    }

    fn remove(&mut self, item_id: &LineItemId) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|line| &line.id != item_id);
        if self.items.len() == before {
            return Err(Self::not_found(item_id));
        }
        Ok(())
    }

    fn update(&mut self, item_id: &LineItemId, quantity: u32) -> Result<(), CartError> {
        let line = self
            .items
            .iter_mut()
            .find(|line| &line.id == item_id)
            .ok_or_else(|| Self::not_found(item_id))?;
        line.quantity = quantity;
        Ok(())
    }
}

/// Scripted in-memory [`CartBackend`].
///
/// Clones share the same server-side cart.
///
/// # Example
///
/// ```
/// use tixcart::backend::mock::MockCartBackend;
/// use tixcart::{CartError, CartOperation};
///
/// let backend = MockCartBackend::new();
/// backend.fail_next(CartOperation::Add, CartError::Unauthorized { status: 401 });
/// assert!(backend.server_items().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockCartBackend {
    server: Arc<Mutex<MockServer>>,
    latency: Option<Duration>,
}

impl MockCartBackend {
    /// Create a backend with an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the server-side cart.
    #[must_use]
    pub fn with_items(self, items: Vec<CartLineItem>) -> Self {
        self.set_server_items(items);
        self
    }

    /// Delay every call by `latency` before it is handled.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fail the next call of `operation` with `error`.
    ///
    /// Failures queue up per operation and are consumed in order.
    pub fn fail_next(&self, operation: CartOperation, error: CartError) {
        self.lock()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Every call received so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Number of calls received for `operation`.
    #[must_use]
    pub fn call_count(&self, operation: CartOperation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Current server-side cart.
    #[must_use]
    pub fn server_items(&self) -> Vec<CartLineItem> {
        self.lock().items.clone()
    }

    /// Replace the server-side cart, as another device would.
    pub fn set_server_items(&self, items: Vec<CartLineItem>) {
        self.lock().items = items;
    }

    fn lock(&self) -> MutexGuard<'_, MockServer> {
        self.server.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl CartBackend for MockCartBackend {
    fn get_cart(&self) -> BackendFuture<'_, Vec<CartLineItem>> {
        Box::pin(async move {
            self.delay().await;
            let mut server = self.lock();
            server.accept(BackendCall::GetCart)?;
            Ok(server.items.clone())
        })
    }

    fn add_to_cart(&self, request: AddToCartRequest) -> BackendFuture<'_, ()> {
        Box::pin(async move {
            self.delay().await;
            let mut server = self.lock();
            server.accept(BackendCall::AddToCart(request.clone()))?;
            server.add(request);
            Ok(())
        })
    }

    fn remove_from_cart(&self, item_id: LineItemId) -> BackendFuture<'_, Vec<CartLineItem>> {
        Box::pin(async move {
            self.delay().await;
            let mut server = self.lock();
            server.accept(BackendCall::RemoveFromCart(item_id.clone()))?;
            server.remove(&item_id)?;
            Ok(server.items.clone())
        })
    }

    fn update_cart_item(
        &self,
        item_id: LineItemId,
        quantity: u32,
    ) -> BackendFuture<'_, Vec<CartLineItem>> {
        Box::pin(async move {
            self.delay().await;
            let mut server = self.lock();
            server.accept(BackendCall::UpdateCartItem {
                item_id: item_id.clone(),
                quantity,
            })?;
            server.update(&item_id, quantity)?;
            Ok(server.items.clone())
        })
    }

    fn clear_cart(&self) -> BackendFuture<'_, ()> {
        Box::pin(async move {
            self.delay().await;
            let mut server = self.lock();
            server.accept(BackendCall::ClearCart)?;
            server.items.clear();
            Ok(())
        })
    }
}
