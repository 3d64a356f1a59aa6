//! # Collectors Module
//!
//! The collection engine and the harness around it.
//!
//! ## Architecture
//!
//! - **`ResponseDecoder`**: one wildcard performance query per entity group,
//!   concatenating the returned records. Fails fast on the first query error.
//! - **`transformer`**: pure record → point transformation with per-record,
//!   per-sample and per-point recovery.
//! - **`Collector` trait**: interface shared by everything that collects and reports
//! - **`VsanCollector`**: one collection invocation for one cluster
//! - **`Orchestrator`**: runs the per-cluster collectors concurrently

pub mod collector;
pub mod decoder;
pub mod orchestrator;
pub mod transformer;
pub mod vsan_collector;

// Re-export the main types for easy access
pub use collector::Collector;
pub use decoder::ResponseDecoder;
pub use orchestrator::Orchestrator;
pub use transformer::{
    transform_record,
    RecordOutcome,
};
pub use vsan_collector::VsanCollector;
