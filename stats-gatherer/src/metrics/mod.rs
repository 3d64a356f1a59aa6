//! # Metrics Module
//!
//! Data model of a collection run: entity groups and the records the
//! endpoint returns for them, the query window, and the normalized points
//! produced from the records.

pub mod entity;
pub mod point;
pub mod stats;
pub mod window;

pub use entity::*;
pub use point::*;
pub use stats::*;
pub use window::*;
