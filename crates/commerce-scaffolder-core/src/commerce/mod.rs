//! Commerce store integration
//!
//! Verifies that a Commerce instance is wired to Adobe I/O Events before
//! its configured event provider is used.

pub mod check;

pub use check::{
    validate_access_token, validate_store_url, ConfigCheckOutcome, ConfigChecker,
    CHECK_CONFIGURATION_ENDPOINT,
};
