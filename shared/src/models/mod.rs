//! Domain models for the digital printing extension

mod item;
mod overrides;
mod print_order;
mod report;

pub use item::*;
pub use overrides::*;
pub use print_order::*;
pub use report::*;
