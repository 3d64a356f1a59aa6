//! # Session Module
//!
//! The single remote call the engine needs: "query performance series for
//! an entity group over a window". Establishing and keeping the session
//! alive is the implementor's business; no retries happen on this side.

mod http;

pub use http::HttpPerfClient;

use crate::metrics::{
    ClusterIdentity,
    EntityGroup,
    EntityRecord,
    TimeWindow,
};
use chrono::{
    DateTime,
    Utc,
};
use eyre::Result;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    future::Future,
    pin::Pin,
};

/// Query for one entity filter over one window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PerfQuerySpec {
    pub entity_ref_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl PerfQuerySpec {
    /// Matches every instance of `group` within `window`.
    pub fn wildcard(group: EntityGroup, window: &TimeWindow) -> Self {
        Self {
            entity_ref_id: group.wildcard(),
            start_time: window.start(),
            end_time: window.end(),
        }
    }
}

/// Executes performance queries against a connected session.
pub trait PerfQueryClient: Send + Sync {
    /// Returns one record per entity instance matching the spec, in the
    /// order the endpoint produced them.
    fn query_perf<'a>(
        &'a self,
        cluster: &'a ClusterIdentity,
        spec: &'a PerfQuerySpec,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<EntityRecord>>> + Send + 'a>>;
}
