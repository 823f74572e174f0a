//! Common test utilities for API integration tests
//!
//! Mock pipeline collaborators plus helpers that assemble the router the
//! way `main` does, without a database or external services.

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod helpers;
pub mod mocks;

pub use helpers::*;
pub use mocks::*;
