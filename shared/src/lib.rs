//! Shared types and rules for the digital printing extension
//!
//! This crate contains the item rules and report models shared between the
//! backend and the browser (via WASM). Nothing in here performs IO.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
