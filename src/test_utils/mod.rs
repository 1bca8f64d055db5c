//! Test utilities for use-case and HTTP-level testing.
//!
//! This module provides:
//! - Test data factories for creating valid fixtures
//! - An in-memory store implementing every repository trait
//! - A scripted upstream stub
//! - `TestAppStateBuilder` for wiring an `AppState` from the above

mod app_state_builder;
mod factories;
mod store_mocks;
mod upstream_mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use store_mocks::*;
pub use upstream_mocks::*;
