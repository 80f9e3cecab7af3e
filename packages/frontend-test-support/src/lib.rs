//! Front-end test support utilities
//!
//! Shared by the unit tests and the integration suites of the `frontend`
//! crate: logging bootstrap, unique test data, and assertions for the
//! redirect, cookie and JSON error contracts.

pub mod error_body;
pub mod logging;
pub mod responses;
pub mod unique_helpers;

pub use unique_helpers::{unique_email, unique_str};
