//! Pipeline module - binning, aggregation, and scoring steps

pub mod aggregate;
pub mod binner;
pub mod loader;
pub mod normalize;
pub mod scorer;
pub mod target;
pub mod tree;

pub use aggregate::*;
pub use binner::*;
pub use loader::*;
pub use normalize::*;
pub use scorer::*;
pub use target::*;
pub use tree::*;
