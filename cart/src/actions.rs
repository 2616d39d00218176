//! Actions for the cart reducer.

use crate::error::CartError;
use crate::types::{CandidateItem, CartLineItem, CartOperation, LineItemId};

/// Every input the cart reducer understands.
///
/// Commands come from the UI through [`CartStore`](crate::store::CartStore);
/// outcomes are produced by backend effects and fed back by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    // ========== Commands ==========
    /// Reload the cart from the backend.
    FetchCart,

    /// Add `quantity` tickets of `item`, then reload the cart.
    AddToCart {
        /// Ticket to add
        item: CandidateItem,
        /// How many (the caller guarantees a positive count)
        quantity: u32,
    },

    /// Remove a line.
    RemoveFromCart {
        /// Line to remove
        item_id: LineItemId,
    },

    /// Change a line's quantity; zero or below removes the line.
    UpdateQuantity {
        /// Line to change
        item_id: LineItemId,
        /// Requested quantity
        quantity: i64,
    },

    /// Empty the cart.
    ClearCart,

    /// Flip the sidebar between open and closed.
    ToggleOpen,

    /// Open or close the sidebar.
    SetOpen {
        /// Desired visibility
        open: bool,
    },

    // ========== Backend outcomes ==========
    /// The backend returned the full cart.
    CartLoaded {
        /// Items in backend order
        items: Vec<CartLineItem>,
    },

    /// Loading the cart failed.
    CartLoadFailed {
        /// Why
        error: CartError,
    },

    /// The backend accepted an add; a reload follows.
    AddedToCart,

    /// The backend refused an add.
    AddToCartFailed {
        /// Why
        error: CartError,
    },

    /// A remove or update succeeded and the backend returned the new cart.
    ItemsReplaced {
        /// Items in backend order
        items: Vec<CartLineItem>,
    },

    /// The backend emptied the cart.
    CartCleared,

    /// A remove, update, or clear failed.
    MutationFailed {
        /// Which mutation
        operation: CartOperation,
        /// Why
        error: CartError,
    },
}

impl CartAction {
    /// Whether this outcome ends a fetch.
    #[must_use]
    pub const fn settles_fetch(&self) -> bool {
        matches!(self, Self::CartLoaded { .. } | Self::CartLoadFailed { .. })
    }

    /// Whether this outcome ends an add (a failed add, or the reload after it).
    #[must_use]
    pub const fn settles_add(&self) -> bool {
        matches!(self, Self::AddToCartFailed { .. }) || self.settles_fetch()
    }

    /// Whether this outcome ends a remove or update.
    #[must_use]
    pub const fn settles_mutation(&self) -> bool {
        matches!(
            self,
            Self::ItemsReplaced { .. } | Self::MutationFailed { .. }
        )
    }

    /// Whether this outcome ends a clear.
    #[must_use]
    pub const fn settles_clear(&self) -> bool {
        matches!(self, Self::CartCleared | Self::MutationFailed { .. })
    }
}
