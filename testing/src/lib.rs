//! # Tixcart Testing
//!
//! Testing utilities and helpers for the tixcart cart store.
//!
//! This crate provides:
//! - A deterministic [`FixedClock`]
//! - The [`ReducerTest`] Given-When-Then harness for pure reducer tests
//! - Effect assertion helpers
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use tixcart_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(CartReducer::new())
//!     .with_env(environment)
//!     .given_state(CartState::default())
//!     .when_action(CartAction::ToggleOpen)
//!     .then_state(|state| assert!(state.is_open))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use tixcart_core::environment::Clock;

pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making recorded failures reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tixcart_testing::mocks::FixedClock;
    /// use tixcart_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }
}

/// Test helpers and utilities
pub mod helpers {
    use tracing_subscriber::EnvFilter;

    /// Install a test-friendly tracing subscriber
    ///
    /// Output goes through the test harness writer so it is only shown for
    /// failing tests. Safe to call from every test; only the first call wins.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_tracing_init_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
    }
}
