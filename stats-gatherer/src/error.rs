//! # Error Types
//!
//! Two families of failure exist in a collection run:
//!
//! - **`CollectError`**: fatal for one cluster invocation. A failed
//!   performance query means the session is unusable, so nothing from the
//!   invocation is kept.
//! - **`Diagnostic`**: recoverable data problems found while transforming a
//!   record. They are returned next to the points that could be produced
//!   and never stop the run.

use crate::metrics::EntityGroup;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum CollectError {
    #[error("performance query for entity group {group} failed: {cause:#}")]
    Query { group: EntityGroup, cause: eyre::Report },
    #[error("invalid time window: start {start} is not before end {end}")]
    InvalidWindow {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },
    #[error("lookback of {} is out of range", human(.0))]
    LookbackOutOfRange(Duration),
    #[error("collection for cluster {cluster} did not finish within {}", human(.after))]
    TimedOut { cluster: String, after: Duration },
}

fn human(duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*duration)
}

/// A data problem that degrades completeness without failing collection.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The whole record is dropped.
    #[error("malformed composite id '{raw}', expected '<kind>:<uuid>'")]
    MalformedCompositeId { raw: String },
    /// The sample index is dropped for every series of the record.
    #[error("unparsable sample timestamp '{raw}' at index {index}")]
    UnparsableTimestamp { index: usize, raw: String },
    /// A single point is dropped.
    #[error("unparsable value '{raw}' for {metric} at index {index}")]
    UnparsableValue { metric: String, index: usize, raw: String },
    /// Samples past the shorter of the two sequences are dropped.
    #[error("series {metric} has {values} values for {samples} samples")]
    LengthMismatch {
        metric: String,
        samples: usize,
        values: usize,
    },
}
