use crate::{
    error::Diagnostic,
    metrics::{
        ClusterIdentity,
        NormalizedPoint,
        TimeWindow,
    },
};
use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeMap;

/// Per-cluster bookkeeping of one collection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub cluster: String,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub collected_at: DateTime<Utc>,

    // Records
    pub records: usize,
    pub skipped_records: usize,

    // Points
    pub points: usize,
    pub dropped_timestamps: usize,
    pub dropped_values: usize,
    pub misaligned_series: usize,

    /// Emitted points per field name.
    pub fields: BTreeMap<String, usize>,
}

impl CollectionStats {
    pub fn new(cluster: &ClusterIdentity, window: &TimeWindow) -> Self {
        Self {
            cluster: cluster.name.clone(),
            window_start: window.start(),
            window_end: window.end(),
            collected_at: Utc::now(),
            records: 0,
            skipped_records: 0,
            points: 0,
            dropped_timestamps: 0,
            dropped_values: 0,
            misaligned_series: 0,
            fields: BTreeMap::new(),
        }
    }

    pub fn add_diagnostics(&mut self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            match diagnostic {
                Diagnostic::MalformedCompositeId { .. } => self.skipped_records += 1,
                Diagnostic::UnparsableTimestamp { .. } => self.dropped_timestamps += 1,
                Diagnostic::UnparsableValue { .. } => self.dropped_values += 1,
                Diagnostic::LengthMismatch { .. } => self.misaligned_series += 1,
            }
        }
    }

    pub fn add_point(&mut self, point: &NormalizedPoint) {
        self.points += 1;
        *self.fields.entry(point.field.clone()).or_default() += 1;
    }
}
