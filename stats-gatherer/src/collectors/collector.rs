use crate::metrics::TimeWindow;
use eyre::Result;
use std::{
    future::Future,
    pin::Pin,
};

/// Trait for collecting and formatting data
pub trait Collector {
    /// Collect data for the given window
    fn collect(&mut self, window: TimeWindow) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Format data for display
    fn format(&self) -> String;

    /// Get data summary as JSON
    fn summary(&self) -> serde_json::Value;

    /// Get the name of this collector
    fn name(&self) -> &'static str;
}
