#![doc(test(attr(deny(warnings))))]

//! SEOO Booking offers the booking wizard behind the executive mobility site:
//! a four-step draft with validation gating, autosave to a key-value store,
//! a fixed-table price estimate, and the WhatsApp handoff message.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("SEOO booking tracing initialized.");
    });
}
