//! # Tixcart
//!
//! Shopping cart store for an event-ticketing marketplace.
//!
//! The cart lives on a remote cart service; [`CartStore`] keeps a local
//! mirror of it for the UI, together with the sidebar's open state and
//! loading/error flags. Every change goes to the backend first and the mirror
//! is replaced with what the backend returns.
//!
//! ## Layout
//!
//! - [`types`]: line items, candidates, and [`CartState`]
//! - [`actions`]: commands and backend outcomes
//! - [`reducer`]: the state machine
//! - [`environment`]: the [`CartBackend`] contract and injected clock
//! - [`backend`]: HTTP and in-memory backends
//! - [`store`]: the async [`CartStore`] facade
//! - [`config`]: environment-variable configuration
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tixcart::{CartConfig, CartEnvironment, CartStore, HttpCartBackend};
//!
//! let config = CartConfig::from_env();
//! let backend = HttpCartBackend::from_config(&config)?;
//! let store = CartStore::new(CartEnvironment::production(Arc::new(backend)))
//!     .start()
//!     .await?;
//!
//! println!("{} tickets in cart", store.total_items().await);
//! ```

pub mod actions;
pub mod backend;
pub mod config;
pub mod environment;
pub mod error;
pub mod reducer;
pub mod store;
pub mod types;

pub use actions::CartAction;
pub use backend::{HttpCartBackend, MockCartBackend};
pub use config::{CartConfig, ConfigError};
pub use environment::{CartBackend, CartEnvironment};
pub use error::{CartError, CartStoreError};
pub use reducer::CartReducer;
pub use store::CartStore;
pub use types::{
    AddToCartRequest, CandidateItem, CartFailure, CartLineItem, CartOperation, CartState,
    LineItemId,
};

#[cfg(test)]
mod tests;
