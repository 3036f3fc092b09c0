#![doc(test(attr(deny(warnings))))]

//! Fungistock tracks substrate and consumable stock for a small mushroom
//! farm: items, categories, suppliers and the movements that derive stock.
//! This crate hosts the command shell on top of the `fungi-*` libraries.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Fungistock tracing initialized.");
    });
}
