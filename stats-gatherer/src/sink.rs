//! # Sink Module
//!
//! Receivers for normalized points. Several cluster collections may write
//! into the same sink at once, so every sink has to be `Send + Sync`.

use crate::metrics::{
    NormalizedPoint,
    Tags,
};
use chrono::{
    DateTime,
    Utc,
};
use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        MutexGuard,
        PoisonError,
    },
};

/// Receives one call per successfully parsed point.
pub trait PointSink: Send + Sync {
    fn add_point(&self, measurement: &str, fields: BTreeMap<String, f64>, tags: Tags, timestamp: DateTime<Utc>);
}

/// Hands a point to the sink in its `add_point` shape.
pub fn emit(sink: &dyn PointSink, point: NormalizedPoint) {
    let fields = point.fields();
    sink.add_point(&point.measurement, fields, point.tags, point.timestamp);
}

/// Keeps every point in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    points: Mutex<Vec<NormalizedPoint>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> Vec<NormalizedPoint> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<NormalizedPoint>> {
        // Vec::push leaves no partial state, a poisoned lock is still usable.
        self.points.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PointSink for MemorySink {
    fn add_point(&self, measurement: &str, fields: BTreeMap<String, f64>, tags: Tags, timestamp: DateTime<Utc>) {
        let mut points = self.lock();
        for (field, value) in fields {
            points.push(NormalizedPoint {
                measurement: measurement.to_string(),
                field,
                tags: tags.clone(),
                timestamp,
                value,
            });
        }
    }
}
