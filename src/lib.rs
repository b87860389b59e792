//! review-watch library: re-exports modules for the binary and integration tests.

pub mod channel;
pub mod config;
pub mod error;
pub mod logging;
pub mod watch;
