#![doc(test(attr(deny(warnings))))]

//! Subscription Core computes billing cycles, currency-normalized prices, and
//! period totals for recurring subscriptions shared between payers.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod cycle;
pub mod errors;
pub mod stats;
pub mod subscription;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Subscription Core tracing initialized.");
    });
}
