//! Core types for the cart: line items, add-to-cart candidates, and the
//! locally mirrored cart state.

use crate::error::CartError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a cart line item, assigned by the backend.
///
/// Stable across quantity updates of the same line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(String);

impl LineItemId {
    /// Create from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for LineItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One entry of the cart: a ticket tier of an event and how many of it.
///
/// The event fields are a snapshot taken by the backend when the ticket was
/// added. `price` is the unit price in the platform's base currency unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Backend-assigned line identifier
    pub id: LineItemId,

    /// Event this ticket belongs to
    #[serde(default)]
    pub event_id: String,

    /// Event name at add time
    #[serde(default)]
    pub event_name: String,

    /// Event image URL at add time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_image: Option<String>,

    /// Ticket tier identifier within the event
    #[serde(default)]
    pub ticket_id: String,

    /// Ticket tier label ("GA", "VIP", ...)
    #[serde(default)]
    pub ticket_type: String,

    /// Unit price, as returned by the backend
    pub price: Decimal,

    /// Number of tickets on this line
    pub quantity: u32,
}

impl CartLineItem {
    /// `price * quantity`, or `None` if the product does not fit a `Decimal`.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// A ticket the user wants to put in the cart.
///
/// Carries everything the backend needs to create a line item except the
/// quantity, which is passed alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateItem {
    /// Event this ticket belongs to
    pub event_id: String,
    /// Event name shown in the cart
    pub event_name: String,
    /// Event image URL shown in the cart
    pub event_image: Option<String>,
    /// Ticket tier identifier within the event
    pub ticket_id: String,
    /// Ticket tier label
    pub ticket_type: String,
    /// Unit price
    pub price: Decimal,
}

impl CandidateItem {
    /// Create a candidate without an image.
    #[must_use]
    pub fn new(
        event_id: impl Into<String>,
        event_name: impl Into<String>,
        ticket_id: impl Into<String>,
        ticket_type: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_name: event_name.into(),
            event_image: None,
            ticket_id: ticket_id.into(),
            ticket_type: ticket_type.into(),
            price,
        }
    }

    /// Attach an event image URL.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.event_image = Some(url.into());
        self
    }
}

/// Body of an add-to-cart request: the candidate's fields plus `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    /// The ticket being added
    #[serde(flatten)]
    pub item: CandidateItem,
    /// How many tickets to add
    pub quantity: u32,
}

/// The backend-calling operations of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOperation {
    /// Load the whole cart
    Fetch,
    /// Add a ticket
    Add,
    /// Remove a line
    Remove,
    /// Change a line's quantity
    Update,
    /// Empty the cart
    Clear,
}

impl CartOperation {
    /// Stable lowercase name, used as a metrics label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Update => "update",
            Self::Clear => "clear",
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The most recent failed operation, as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct CartFailure {
    /// Which operation failed
    pub operation: CartOperation,
    /// Why it failed
    pub error: CartError,
    /// When the failure was recorded
    pub occurred_at: DateTime<Utc>,
}

/// State for the cart reducer.
///
/// `items` mirrors the backend and is only ever replaced by what the backend
/// returns. `is_open` is presentation state. `is_loading` brackets every
/// backend call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    pub(crate) items: Vec<CartLineItem>,
    pub(crate) is_open: bool,
    pub(crate) is_loading: bool,
    pub(crate) last_error: Option<CartFailure>,
}

impl CartState {
    /// Create an empty, closed, idle cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart already holding `items` (e.g. restored from a test fixture).
    #[must_use]
    pub fn with_items(items: Vec<CartLineItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Line items in backend order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart sidebar is expanded.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Whether a backend call is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The most recent failure, cleared when the next operation starts.
    #[must_use]
    pub const fn last_error(&self) -> Option<&CartFailure> {
        self.last_error.as_ref()
    }

    /// Look up a line by id.
    #[must_use]
    pub fn find(&self, id: &LineItemId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of tickets across all lines.
    ///
    /// Reports 0 rather than failing if the sum does not fit.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items
            .iter()
            .try_fold(0_u64, |total, item| total.checked_add(u64::from(item.quantity)))
            .unwrap_or(0)
    }

    /// Sum of `price * quantity` across all lines.
    ///
    /// Reports 0 rather than failing if any product or the sum overflows.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| {
                item.subtotal().and_then(|subtotal| total.checked_add(subtotal))
            })
            .unwrap_or_else(|| {
                tracing::warn!(lines = self.items.len(), "Cart total overflowed, reporting zero");
                Decimal::ZERO
            })
    }

    /// Mark the start of a backend operation.
    pub(crate) fn begin(&mut self) {
        self.is_loading = true;
        self.last_error = None;
    }

    /// Replace the mirror with the backend's list and go idle.
    pub(crate) fn settle_with(&mut self, items: Vec<CartLineItem>) {
        self.items = items;
        self.is_loading = false;
    }

    /// Record a failure and go idle, leaving items untouched.
    pub(crate) fn fail(&mut self, failure: CartFailure) {
        self.last_error = Some(failure);
        self.is_loading = false;
    }
}
