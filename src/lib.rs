#![doc(test(attr(deny(warnings))))]

//! Expense Core provides the domain models, durable store abstraction,
//! recurring-expense engine, and spending analytics behind a personal
//! expense tracker.

pub mod config;
pub mod engine;
pub mod errors;
pub mod model;
pub mod store;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
