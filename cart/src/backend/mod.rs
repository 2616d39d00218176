//! [`CartBackend`](crate::environment::CartBackend) implementations.
//!
//! - [`http::HttpCartBackend`]: the remote cart service over JSON/HTTP
//! - [`mock::MockCartBackend`]: in-memory service for tests and demos

pub mod http;
pub mod mock;
pub mod payload;

pub use http::HttpCartBackend;
pub use mock::{BackendCall, MockCartBackend};
