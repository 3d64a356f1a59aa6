use crate::{
    collectors::{
        decoder::ResponseDecoder,
        transformer::{
            transform_record,
            RecordOutcome,
        },
        Collector,
    },
    error::Diagnostic,
    metrics::*,
    session::PerfQueryClient,
    sink::{
        emit,
        PointSink,
    },
};
use comfy_table::{
    presets,
    Attribute,
    Cell,
    Color,
    ContentArrangement,
    Table,
};
use eyre::Result;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
};
use tracing::{
    debug,
    info,
    trace,
    warn,
};

/// Collects the vSAN performance series of one cluster into a sink.
pub struct VsanCollector {
    cluster: ClusterIdentity,
    groups: Vec<EntityGroup>,
    client: Arc<dyn PerfQueryClient>,
    sink: Arc<dyn PointSink>,
    stats: Option<CollectionStats>,
}

impl VsanCollector {
    pub fn new(
        cluster: ClusterIdentity,
        groups: Vec<EntityGroup>,
        client: Arc<dyn PerfQueryClient>,
        sink: Arc<dyn PointSink>,
    ) -> Self {
        Self {
            cluster,
            groups,
            client,
            sink,
            stats: None,
        }
    }

    pub fn cluster(&self) -> &ClusterIdentity {
        &self.cluster
    }

    pub fn stats(&self) -> Option<&CollectionStats> {
        self.stats.as_ref()
    }

    fn log_outcome(record: &EntityRecord, outcome: &RecordOutcome) {
        for diagnostic in &outcome.diagnostics {
            match diagnostic {
                Diagnostic::MalformedCompositeId { .. } => {
                    warn!(entity = %record.entity_ref_id, "Skipping record: {diagnostic}");
                }
                Diagnostic::UnparsableTimestamp { .. } | Diagnostic::LengthMismatch { .. } => {
                    debug!(entity = %record.entity_ref_id, "{diagnostic}");
                }
                Diagnostic::UnparsableValue { .. } => trace!(entity = %record.entity_ref_id, "{diagnostic}"),
            }
        }
        let dropped = outcome.dropped_values();
        if dropped > 0 {
            debug!(entity = %record.entity_ref_id, dropped, "Dropped unparsable values");
        }
    }
}

impl Collector for VsanCollector {
    fn collect(&mut self, window: TimeWindow) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.stats = None;
            info!(cluster = %self.cluster.name, "Starting vSAN collection");
            let tags = self.cluster.tags();
            debug!(cluster = %self.cluster.name, ?tags, "Tags for vSAN");

            let records = ResponseDecoder::new(self.client.as_ref(), &self.groups)
                .fetch_all(&self.cluster, &window)
                .await?;

            let mut stats = CollectionStats::new(&self.cluster, &window);
            stats.records = records.len();

            for record in &records {
                let outcome = transform_record(record, &tags);
                Self::log_outcome(record, &outcome);
                stats.add_diagnostics(&outcome.diagnostics);
                for point in outcome.points {
                    stats.add_point(&point);
                    emit(self.sink.as_ref(), point);
                }
            }

            info!(
                cluster = %self.cluster.name,
                records = stats.records,
                points = stats.points,
                skipped_records = stats.skipped_records,
                "Finished vSAN collection"
            );
            self.stats = Some(stats);
            Ok(())
        })
    }

    fn format(&self) -> String {
        let stats = match &self.stats {
            Some(s) => s,
            None => return "No metrics collected yet. Call collect() first.".to_string(),
        };

        let mut output = String::new();

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new(format!("vSAN CLUSTER {}", stats.cluster))
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Cyan),
                Cell::new(""),
            ]);

        table.add_row(vec![
            Cell::new("Records").add_attribute(Attribute::Bold),
            Cell::new(stats.records.to_string()),
        ]);
        table.add_row(vec![
            Cell::new("Skipped Records").add_attribute(Attribute::Bold),
            Cell::new(stats.skipped_records.to_string()).fg(warn_color(stats.skipped_records)),
        ]);
        table.add_row(vec![
            Cell::new("Points").add_attribute(Attribute::Bold),
            Cell::new(stats.points.to_string()).fg(Color::Green),
        ]);
        table.add_row(vec![
            Cell::new("Dropped Timestamps").add_attribute(Attribute::Bold),
            Cell::new(stats.dropped_timestamps.to_string()).fg(warn_color(stats.dropped_timestamps)),
        ]);
        table.add_row(vec![
            Cell::new("Dropped Values").add_attribute(Attribute::Bold),
            Cell::new(stats.dropped_values.to_string()).fg(warn_color(stats.dropped_values)),
        ]);
        table.add_row(vec![
            Cell::new("Misaligned Series").add_attribute(Attribute::Bold),
            Cell::new(stats.misaligned_series.to_string()).fg(warn_color(stats.misaligned_series)),
        ]);

        output.push_str(&format!("{}\n", table));

        if !stats.fields.is_empty() {
            let mut fields = Table::new();
            fields
                .load_preset(presets::UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    Cell::new("Field").add_attribute(Attribute::Bold),
                    Cell::new("Points").add_attribute(Attribute::Bold),
                ]);
            for (field, count) in &stats.fields {
                fields.add_row(vec![Cell::new(field), Cell::new(count.to_string())]);
            }
            output.push_str(&format!("{}\n", fields));
        }

        output
    }

    fn summary(&self) -> serde_json::Value {
        match &self.stats {
            Some(stats) => serde_json::to_value(stats).unwrap_or_default(),
            None => serde_json::Value::Null,
        }
    }

    fn name(&self) -> &'static str {
        "VsanCollector"
    }
}

fn warn_color(count: usize) -> Color {
    if count == 0 {
        Color::Green
    } else {
        Color::Yellow
    }
}
