#![doc(test(attr(deny(warnings))))]

//! Subtrack Core provides the subscription records, recurring-payment date
//! engine, and aggregation reports that power the subscription tracker CLI.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod schedule;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Subtrack Core tracing initialized.");
    });
}
