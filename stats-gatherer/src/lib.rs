//! # vSAN Stats Gatherer
//!
//! Collects vSAN cluster performance series from the management endpoint and
//! turns the compact CSV-in-JSON response into one normalized point per
//! metric and sample.
//!
//! ## Wire Format
//!
//! Each response record carries a composite id `<kind>:<uuid>`, one shared
//! sample axis of comma-joined `YYYY-MM-DD HH:MM:SS` UTC timestamps, and per
//! metric a comma-joined list of decimal values aligned with that axis.
//!
//! ## Architecture
//!
//! - **`metrics`**: entity groups, records, time window, normalized points
//! - **`session`**: the remote performance query and its HTTP client
//! - **`collectors`**: decoder, transformer, per-cluster collector, orchestrator
//! - **`sink`**: receivers for normalized points
//! - **`error`**: fatal collection errors and recoverable diagnostics
//!
//! ## Failure Handling
//!
//! | Problem                     | Effect                                  |
//! |-----------------------------|-----------------------------------------|
//! | query fails for any group   | cluster invocation aborts, no points    |
//! | malformed composite id      | record dropped                          |
//! | unparsable timestamp        | sample index dropped for all series     |
//! | unparsable value            | single point dropped                    |

pub mod collectors;
pub mod error;
pub mod metrics;
pub mod session;
pub mod sink;

pub use collectors::*;
pub use error::{
    CollectError,
    Diagnostic,
};
pub use metrics::*;
pub use session::{
    HttpPerfClient,
    PerfQueryClient,
    PerfQuerySpec,
};
pub use sink::{
    MemorySink,
    PointSink,
};
