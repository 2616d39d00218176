//! Reducer tests: state transitions and the effects each action produces.

#![allow(clippy::unwrap_used)] // Test code
#![allow(clippy::panic)] // Test code

use crate::backend::mock::{BackendCall, MockCartBackend};
use crate::environment::CartEnvironment;
use crate::error::CartError;
use crate::types::{
    CandidateItem, CartFailure, CartLineItem, CartOperation, CartState, LineItemId,
};
use crate::{CartAction, CartReducer};
use rust_decimal::Decimal;
use std::sync::Arc;
use tixcart_core::effect::Effect;
use tixcart_core::environment::Clock;
use tixcart_core::reducer::Reducer;
use tixcart_testing::assertions::{assert_effects_count, assert_has_future_effect, assert_no_effects};
use tixcart_testing::{ReducerTest, test_clock};

fn line(id: &str, quantity: u32) -> CartLineItem {
    CartLineItem {
        id: LineItemId::new(id),
        event_id: "E1".to_string(),
        event_name: "Concert".to_string(),
        event_image: None,
        ticket_id: format!("T-{id}"),
        ticket_type: "GA".to_string(),
        price: Decimal::from(50),
        quantity,
    }
}

fn environment(backend: &MockCartBackend) -> CartEnvironment {
    CartEnvironment::new(Arc::new(backend.clone()), Arc::new(test_clock()))
}

fn test_env() -> CartEnvironment {
    environment(&MockCartBackend::new())
}

fn failure(operation: CartOperation, error: CartError) -> CartFailure {
    CartFailure {
        operation,
        error,
        occurred_at: test_clock().now(),
    }
}

/// Run a single future effect to its action.
async fn resolve(effect: Effect<CartAction>) -> Option<CartAction> {
    match effect {
        Effect::Future(fut) => fut.await,
        Effect::None => None,
    }
}

#[test]
fn fetch_marks_loading_and_clears_previous_error() {
    let mut state = CartState::with_items(vec![line("L1", 1)]);
    state.last_error = Some(failure(CartOperation::Clear, CartError::Network("reset".into())));

    ReducerTest::new(CartReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(CartAction::FetchCart)
        .then_state(|state| {
            assert!(state.is_loading());
            assert!(state.last_error().is_none());
            assert_eq!(state.items().len(), 1);
        })
        .then_effects(|effects| {
            assert_effects_count(effects, 1);
            assert_has_future_effect(effects);
        })
        .run();
}

#[test]
fn loaded_cart_replaces_items_wholesale() {
    ReducerTest::new(CartReducer::new())
        .with_env(test_env())
        .given_state(CartState::with_items(vec![line("OLD", 9)]))
        .when_action(CartAction::FetchCart)
        .when_action(CartAction::CartLoaded {
            items: vec![line("L1", 1), line("L2", 2)],
        })
        .then_state(|state| {
            assert!(!state.is_loading());
            let ids: Vec<_> = state.items().iter().map(|i| i.id.as_str()).collect();
            assert_eq!(ids, vec!["L1", "L2"]);
            assert_eq!(state.total_items(), 3);
        })
        .then_effects(assert_no_effects)
        .run();
}

#[test]
fn auth_failure_on_fetch_empties_cart() {
    ReducerTest::new(CartReducer::new())
        .with_env(test_env())
        .given_state(CartState::with_items(vec![line("L1", 1)]))
        .when_action(CartAction::FetchCart)
        .when_action(CartAction::CartLoadFailed {
            error: CartError::Unauthorized { status: 401 },
        })
        .then_state(|state| {
            assert!(state.is_empty());
            assert!(!state.is_loading());
            assert_eq!(
                state.last_error(),
                Some(&failure(CartOperation::Fetch, CartError::Unauthorized { status: 401 }))
            );
        })
        .run();
}

#[test]
fn other_fetch_failure_keeps_items() {
    ReducerTest::new(CartReducer::new())
        .with_env(test_env())
        .given_state(CartState::with_items(vec![line("L1", 1)]))
        .when_action(CartAction::FetchCart)
        .when_action(CartAction::CartLoadFailed {
            error: CartError::Network("timed out".into()),
        })
        .then_state(|state| {
            assert_eq!(state.items().len(), 1);
            assert_eq!(state.last_error().map(|f| f.operation), Some(CartOperation::Fetch));
        })
        .run();
}

#[test]
fn accepted_add_opens_sidebar_and_reloads() {
    ReducerTest::new(CartReducer::new())
        .with_env(test_env())
        .given_state(CartState::default())
        .when_action(CartAction::AddToCart {
            item: CandidateItem::new("E1", "Concert", "T1", "GA", Decimal::from(50)),
            quantity: 2,
        })
        .when_action(CartAction::AddedToCart)
        .then_state(|state| {
            assert!(state.is_open());
            assert!(state.is_loading());
            assert!(state.is_empty());
        })
        .then_effects(assert_has_future_effect)
        .run();
}

#[test]
fn rejected_add_keeps_items_and_sidebar() {
    ReducerTest::new(CartReducer::new())
        .with_env(test_env())
        .given_state(CartState::with_items(vec![line("L1", 1)]))
        .when_action(CartAction::AddToCartFailed {
            error: CartError::Rejected {
                status: 409,
                message: "sold out".into(),
            },
        })
        .then_state(|state| {
            assert_eq!(state.items().len(), 1);
            assert!(!state.is_open());
            assert!(!state.is_loading());
            assert_eq!(state.last_error().map(|f| f.operation), Some(CartOperation::Add));
        })
        .then_effects(assert_no_effects)
        .run();
}

#[test]
fn mutation_failure_leaves_items_untouched() {
    ReducerTest::new(CartReducer::new())
        .with_env(test_env())
        .given_state(CartState::with_items(vec![line("L1", 1)]))
        .when_action(CartAction::ClearCart)
        .when_action(CartAction::MutationFailed {
            operation: CartOperation::Clear,
            error: CartError::Network("reset".into()),
        })
        .then_state(|state| {
            assert_eq!(state.items().len(), 1);
            assert!(!state.is_loading());
            assert_eq!(state.last_error().map(|f| f.operation), Some(CartOperation::Clear));
        })
        .run();
}

#[test]
fn cleared_cart_is_empty() {
    ReducerTest::new(CartReducer::new())
        .with_env(test_env())
        .given_state(CartState::with_items(vec![line("L1", 1), line("L2", 1)]))
        .when_action(CartAction::ClearCart)
        .when_action(CartAction::CartCleared)
        .then_state(|state| {
            assert!(state.is_empty());
            assert_eq!(state.total_price(), Decimal::ZERO);
        })
        .run();
}

#[test]
fn sidebar_actions_are_pure() {
    ReducerTest::new(CartReducer::new())
        .with_env(test_env())
        .given_state(CartState::with_items(vec![line("L1", 1)]))
        .when_action(CartAction::ToggleOpen)
        .then_state(|state| {
            assert!(state.is_open());
            assert!(!state.is_loading());
        })
        .then_effects(assert_no_effects)
        .run();

    ReducerTest::new(CartReducer::new())
        .with_env(test_env())
        .given_state(CartState::default())
        .when_action(CartAction::ToggleOpen)
        .when_action(CartAction::ToggleOpen)
        .when_action(CartAction::SetOpen { open: true })
        .when_action(CartAction::SetOpen { open: true })
        .then_state(|state| assert!(state.is_open()))
        .then_effects(assert_no_effects)
        .run();
}

#[tokio::test]
async fn zero_quantity_update_calls_remove() {
    let backend = MockCartBackend::new().with_items(vec![line("L1", 2)]);
    let env = environment(&backend);
    let mut state = CartState::with_items(vec![line("L1", 2)]);

    let mut effects = CartReducer::new().reduce(
        &mut state,
        CartAction::UpdateQuantity {
            item_id: LineItemId::new("L1"),
            quantity: 0,
        },
        &env,
    );
    assert!(state.is_loading());
    assert_eq!(effects.len(), 1);

    let outcome = resolve(effects.remove(0)).await;
    assert_eq!(outcome, Some(CartAction::ItemsReplaced { items: vec![] }));
    assert_eq!(
        backend.calls(),
        vec![BackendCall::RemoveFromCart(LineItemId::new("L1"))]
    );
}

#[tokio::test]
async fn positive_update_sends_quantity() {
    let backend = MockCartBackend::new().with_items(vec![line("L1", 2)]);
    let env = environment(&backend);
    let mut state = CartState::default();

    let mut effects = CartReducer::new().reduce(
        &mut state,
        CartAction::UpdateQuantity {
            item_id: LineItemId::new("L1"),
            quantity: 5,
        },
        &env,
    );

    let outcome = resolve(effects.remove(0)).await;
    assert_eq!(
        outcome,
        Some(CartAction::ItemsReplaced {
            items: vec![line("L1", 5)]
        })
    );
    assert_eq!(
        backend.calls(),
        vec![BackendCall::UpdateCartItem {
            item_id: LineItemId::new("L1"),
            quantity: 5
        }]
    );
}

#[tokio::test]
async fn oversized_update_fails_without_backend_call() {
    let backend = MockCartBackend::new();
    let env = environment(&backend);
    let mut state = CartState::default();
    let quantity = i64::from(u32::MAX) + 1;

    let mut effects = CartReducer::new().reduce(
        &mut state,
        CartAction::UpdateQuantity {
            item_id: LineItemId::new("L1"),
            quantity,
        },
        &env,
    );

    let outcome = resolve(effects.remove(0)).await;
    assert_eq!(
        outcome,
        Some(CartAction::MutationFailed {
            operation: CartOperation::Update,
            error: CartError::InvalidQuantity(quantity),
        })
    );
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn add_effect_reports_backend_refusal() {
    let backend = MockCartBackend::new();
    backend.fail_next(CartOperation::Add, CartError::Unauthorized { status: 403 });
    let env = environment(&backend);
    let mut state = CartState::default();

    let mut effects = CartReducer::new().reduce(
        &mut state,
        CartAction::AddToCart {
            item: CandidateItem::new("E1", "Concert", "T1", "GA", Decimal::from(50)),
            quantity: 1,
        },
        &env,
    );

    let outcome = resolve(effects.remove(0)).await;
    assert_eq!(
        outcome,
        Some(CartAction::AddToCartFailed {
            error: CartError::Unauthorized { status: 403 }
        })
    );
    assert!(backend.server_items().is_empty());
}
