//! HTTP handlers for the digital printing API

mod health;
mod item;
mod reporting;

pub use health::*;
pub use item::*;
pub use reporting::*;
