//! Cart reducer.
//!
//! Commands mark the cart as loading and return one backend effect. The
//! effect's outcome comes back as an action that replaces the item mirror or
//! records the failure. Items are never edited locally.

use crate::actions::CartAction;
use crate::environment::CartEnvironment;
use crate::error::CartError;
use crate::types::{AddToCartRequest, CartFailure, CartOperation, CartState, LineItemId};
use tixcart_core::effect::Effect;
use tixcart_core::reducer::Reducer;
use tixcart_core::{SmallVec, smallvec};

/// Reducer for the cart state.
#[derive(Debug, Clone, Copy, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new cart reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Effect loading the whole cart.
    fn fetch_effect(env: &CartEnvironment) -> Effect<CartAction> {
        let backend = env.backend();
        Effect::future(async move {
            match backend.get_cart().await {
                Ok(items) => CartAction::CartLoaded { items },
                Err(error) => CartAction::CartLoadFailed { error },
            }
        })
    }

    /// Effect removing one line.
    fn remove_effect(env: &CartEnvironment, item_id: LineItemId) -> Effect<CartAction> {
        let backend = env.backend();
        Effect::future(async move {
            match backend.remove_from_cart(item_id).await {
                Ok(items) => CartAction::ItemsReplaced { items },
                Err(error) => CartAction::MutationFailed {
                    operation: CartOperation::Remove,
                    error,
                },
            }
        })
    }

    /// Effect setting a line's quantity.
    fn update_effect(
        env: &CartEnvironment,
        item_id: LineItemId,
        quantity: u32,
    ) -> Effect<CartAction> {
        let backend = env.backend();
        Effect::future(async move {
            match backend.update_cart_item(item_id, quantity).await {
                Ok(items) => CartAction::ItemsReplaced { items },
                Err(error) => CartAction::MutationFailed {
                    operation: CartOperation::Update,
                    error,
                },
            }
        })
    }

    fn record_failure(
        state: &mut CartState,
        env: &CartEnvironment,
        operation: CartOperation,
        error: CartError,
    ) {
        tracing::warn!(%operation, kind = error.kind(), %error, "Cart operation failed");
        state.fail(CartFailure {
            operation,
            error,
            occurred_at: env.clock().now(),
        });
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            CartAction::FetchCart => {
                state.begin();
                smallvec![Self::fetch_effect(env)]
            },

            CartAction::AddToCart { item, quantity } => {
                tracing::debug!(event_id = %item.event_id, ticket_id = %item.ticket_id, quantity, "Adding to cart");
                state.begin();
                let backend = env.backend();
                let request = AddToCartRequest { item, quantity };
                smallvec![Effect::future(async move {
                    match backend.add_to_cart(request).await {
                        Ok(()) => CartAction::AddedToCart,
                        Err(error) => CartAction::AddToCartFailed { error },
                    }
                })]
            },

            CartAction::RemoveFromCart { item_id } => {
                tracing::debug!(%item_id, "Removing from cart");
                state.begin();
                smallvec![Self::remove_effect(env, item_id)]
            },

            CartAction::UpdateQuantity { item_id, quantity } => {
                state.begin();
                if quantity <= 0 {
                    tracing::debug!(%item_id, quantity, "Non-positive quantity, removing line");
                    return smallvec![Self::remove_effect(env, item_id)];
                }
                match u32::try_from(quantity) {
                    Ok(quantity) => smallvec![Self::update_effect(env, item_id, quantity)],
                    // Still resolved through an effect so waiters see an outcome
                    Err(_) => smallvec![Effect::future(async move {
                        CartAction::MutationFailed {
                            operation: CartOperation::Update,
                            error: CartError::InvalidQuantity(quantity),
                        }
                    })],
                }
            },

            CartAction::ClearCart => {
                state.begin();
                let backend = env.backend();
                smallvec![Effect::future(async move {
                    match backend.clear_cart().await {
                        Ok(()) => CartAction::CartCleared,
                        Err(error) => CartAction::MutationFailed {
                            operation: CartOperation::Clear,
                            error,
                        },
                    }
                })]
            },

            CartAction::ToggleOpen => {
                state.is_open = !state.is_open;
                smallvec![Effect::None]
            },

            CartAction::SetOpen { open } => {
                state.is_open = open;
                smallvec![Effect::None]
            },

            // ========== Backend outcomes ==========
            CartAction::CartLoaded { items } => {
                tracing::debug!(lines = items.len(), "Cart loaded");
                state.settle_with(items);
                smallvec![Effect::None]
            },

            CartAction::CartLoadFailed { error } => {
                if error.is_auth_error() {
                    // Not signed in: nothing to show
                    state.items.clear();
                }
                Self::record_failure(state, env, CartOperation::Fetch, error);
                smallvec![Effect::None]
            },

            CartAction::AddedToCart => {
                // The add response is not trusted for contents; reload and show the cart
                state.is_open = true;
                state.is_loading = true;
                smallvec![Self::fetch_effect(env)]
            },

            CartAction::AddToCartFailed { error } => {
                Self::record_failure(state, env, CartOperation::Add, error);
                smallvec![Effect::None]
            },

            CartAction::ItemsReplaced { items } => {
                state.settle_with(items);
                smallvec![Effect::None]
            },

            CartAction::CartCleared => {
                state.settle_with(Vec::new());
                smallvec![Effect::None]
            },

            CartAction::MutationFailed { operation, error } => {
                Self::record_failure(state, env, operation, error);
                smallvec![Effect::None]
            },
        }
    }
}
