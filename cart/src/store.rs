//! The cart store: an async facade over the reducer runtime.
//!
//! Each backend-calling operation sends a command and resolves once the
//! outcome action has been applied, so reads after an `.await` see the
//! settled state. Operations on one store run one at a time.

use crate::actions::CartAction;
use crate::environment::CartEnvironment;
use crate::error::CartStoreError;
use crate::reducer::CartReducer;
use crate::types::{CandidateItem, CartFailure, CartLineItem, CartState, LineItemId};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tixcart_runtime::Store;
use tokio::sync::{Mutex, broadcast};

type CartRuntime = Store<CartState, CartAction, CartEnvironment, CartReducer>;

/// Shared cart state for a signed-in user.
///
/// Cheap to clone; clones share state and the operation queue.
///
/// # Example
///
/// ```ignore
/// let store = CartStore::new(CartEnvironment::production(backend)).start().await?;
/// store.add_one_to_cart(candidate).await?;
/// println!("{} tickets, {}", store.total_items().await, store.total_price().await);
/// ```
#[derive(Clone)]
pub struct CartStore {
    store: CartRuntime,
    /// Held for the duration of one backend-calling operation
    gate: Arc<Mutex<()>>,
}

impl CartStore {
    /// Create a store with an empty, closed cart.
    ///
    /// Call [`start`](Self::start) (or [`fetch_cart`](Self::fetch_cart)) to
    /// load the cart.
    #[must_use]
    pub fn new(environment: CartEnvironment) -> Self {
        Self::with_state(CartState::default(), environment)
    }

    /// Create a store from an existing state.
    #[must_use]
    pub fn with_state(state: CartState, environment: CartEnvironment) -> Self {
        Self::with_capacity(
            state,
            environment,
            tixcart_runtime::DEFAULT_BROADCAST_CAPACITY,
        )
    }

    /// Create a store with a custom outcome broadcast capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(state: CartState, environment: CartEnvironment, capacity: usize) -> Self {
        Self {
            store: Store::with_broadcast_capacity(state, CartReducer::new(), environment, capacity),
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Load the cart once and hand the store back.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Store`] if the store is shutting down.
    /// Backend failures are recorded on the state instead.
    pub async fn start(self) -> Result<Self, CartStoreError> {
        self.fetch_cart().await?;
        Ok(self)
    }

    /// Send a backend-calling command and wait for its outcome.
    ///
    /// The gate is held by a spawned task until the outcome is applied, so a
    /// caller that stops waiting does not let the next operation start early.
    async fn run(
        &self,
        command: CartAction,
        settles: fn(&CartAction) -> bool,
    ) -> Result<CartAction, CartStoreError> {
        let gate = Arc::clone(&self.gate);
        let store = self.store.clone();
        let operation = tokio::spawn(async move {
            let _turn = gate.lock_owned().await;
            store.send_and_wait_for(command, settles, None).await
        });

        let outcome = operation
            .await
            .map_err(|e| CartStoreError::Interrupted(e.to_string()))??;
        Ok(outcome)
    }

    /// Replace the items with the backend's cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Store`] if the store is shutting down.
    /// Backend failures are recorded in [`last_error`](Self::last_error).
    #[tracing::instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<(), CartStoreError> {
        self.run(CartAction::FetchCart, CartAction::settles_fetch)
            .await
            .map(drop)
    }

    /// Add `quantity` tickets, then reload the cart and open the sidebar.
    ///
    /// The quantity is passed to the backend as given.
    ///
    /// # Errors
    ///
    /// - [`CartStoreError::Backend`] with [`CartError::Unauthorized`](crate::CartError::Unauthorized)
    ///   when the backend rejects the credentials; the caller should prompt
    ///   for sign-in
    /// - [`CartStoreError::Store`] if the store is shutting down
    ///
    /// Any other failure, including a failed reload, is only recorded.
    #[tracing::instrument(
        skip_all,
        fields(event_id = %item.event_id, ticket_id = %item.ticket_id, quantity = quantity)
    )]
    pub async fn add_to_cart(
        &self,
        item: CandidateItem,
        quantity: u32,
    ) -> Result<(), CartStoreError> {
        let outcome = self
            .run(CartAction::AddToCart { item, quantity }, CartAction::settles_add)
            .await?;
        match outcome {
            CartAction::AddToCartFailed { error } if error.is_auth_error() => Err(error.into()),
            _ => Ok(()),
        }
    }

    /// [`add_to_cart`](Self::add_to_cart) with a quantity of one.
    ///
    /// # Errors
    ///
    /// As [`add_to_cart`](Self::add_to_cart).
    pub async fn add_one_to_cart(&self, item: CandidateItem) -> Result<(), CartStoreError> {
        self.add_to_cart(item, 1).await
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Store`] if the store is shutting down.
    #[tracing::instrument(skip_all, fields(item_id = %item_id))]
    pub async fn remove_from_cart(&self, item_id: LineItemId) -> Result<(), CartStoreError> {
        self.run(
            CartAction::RemoveFromCart { item_id },
            CartAction::settles_mutation,
        )
        .await
        .map(drop)
    }

    /// Set a line's quantity; zero or below removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Store`] if the store is shutting down.
    #[tracing::instrument(skip_all, fields(item_id = %item_id, quantity = quantity))]
    pub async fn update_quantity(
        &self,
        item_id: LineItemId,
        quantity: i64,
    ) -> Result<(), CartStoreError> {
        self.run(
            CartAction::UpdateQuantity { item_id, quantity },
            CartAction::settles_mutation,
        )
        .await
        .map(drop)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Store`] if the store is shutting down.
    #[tracing::instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), CartStoreError> {
        self.run(CartAction::ClearCart, CartAction::settles_clear)
            .await
            .map(drop)
    }

    /// Flip the sidebar between open and closed.
    pub async fn toggle_open(&self) {
        self.send_ui(CartAction::ToggleOpen).await;
    }

    /// Open or close the sidebar.
    pub async fn set_open(&self, open: bool) {
        self.send_ui(CartAction::SetOpen { open }).await;
    }

    async fn send_ui(&self, action: CartAction) {
        if let Err(error) = self.store.send(action).await {
            tracing::warn!(%error, "Sidebar update dropped");
        }
    }

    /// Sum of `price * quantity`; zero if it overflows.
    pub async fn total_price(&self) -> Decimal {
        self.store.state(CartState::total_price).await
    }

    /// Number of tickets across all lines; zero if it overflows.
    pub async fn total_items(&self) -> u64 {
        self.store.state(CartState::total_items).await
    }

    /// Copy of the whole state.
    pub async fn snapshot(&self) -> CartState {
        self.store.state(Clone::clone).await
    }

    /// Line items in backend order.
    pub async fn items(&self) -> Vec<CartLineItem> {
        self.store.state(|state| state.items().to_vec()).await
    }

    /// Whether the sidebar is open.
    pub async fn is_open(&self) -> bool {
        self.store.state(CartState::is_open).await
    }

    /// Whether a backend call is in flight.
    pub async fn is_loading(&self) -> bool {
        self.store.state(CartState::is_loading).await
    }

    /// The most recent failure.
    pub async fn last_error(&self) -> Option<CartFailure> {
        self.store.state(|state| state.last_error().cloned()).await
    }

    /// Observe every backend outcome after it has been applied.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartAction> {
        self.store.subscribe_actions()
    }

    /// Stop accepting operations and wait for in-flight calls to finish.
    ///
    /// Calls already sent to the backend still settle the state.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Store`] if calls are still running after
    /// `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), CartStoreError> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore").finish_non_exhaustive()
    }
}
