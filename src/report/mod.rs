//! Report module - table assembly, workbook layout, and run summaries

pub mod builder;
pub mod export;
pub mod layout;
pub mod summary;
pub mod tables;

pub use builder::*;
pub use export::*;
pub use layout::*;
pub use summary::*;
pub use tables::*;
