use crate::{
    collectors::{
        Collector,
        VsanCollector,
    },
    error::CollectError,
    metrics::*,
    session::PerfQueryClient,
    sink::MemorySink,
};
use chrono::{
    DateTime,
    Utc,
};
use eyre::{
    eyre,
    Result,
};
use futures::future::join_all;
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    time::Duration,
};
use tracing::{
    error,
    info,
};

/// Runs one [`VsanCollector`] per cluster concurrently and gathers their
/// points into a shared sink.
///
/// Cluster invocations share nothing but the sink. Each one is bounded by
/// `collection_timeout`.
pub struct Orchestrator {
    collectors: Vec<VsanCollector>,
    sink: Arc<MemorySink>,
    collection_timeout: Duration,
    window: Option<TimeWindow>,
    finished_at: Option<DateTime<Utc>>,
}

impl Orchestrator {
    pub fn new(
        clusters: Vec<ClusterIdentity>,
        groups: Vec<EntityGroup>,
        client: Arc<dyn PerfQueryClient>,
        sink: Arc<MemorySink>,
        collection_timeout: Duration,
    ) -> Self {
        let collectors = clusters
            .into_iter()
            .map(|cluster| VsanCollector::new(cluster, groups.clone(), client.clone(), sink.clone()))
            .collect();

        Self {
            collectors,
            sink,
            collection_timeout,
            window: None,
            finished_at: None,
        }
    }

    pub fn points(&self) -> Vec<NormalizedPoint> {
        self.sink.points()
    }
}

impl Collector for Orchestrator {
    fn collect(&mut self, window: TimeWindow) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            info!(clusters = self.collectors.len(), %window, "Collecting vSAN metrics");
            self.window = Some(window);
            let collection_timeout = self.collection_timeout;

            let runs = self.collectors.iter_mut().map(move |collector| async move {
                let cluster = collector.cluster().name.clone();
                let result = match tokio::time::timeout(collection_timeout, collector.collect(window)).await {
                    Ok(result) => result,
                    Err(_) => Err(CollectError::TimedOut {
                        cluster: cluster.clone(),
                        after: collection_timeout,
                    }
                    .into()),
                };
                (cluster, result)
            });
            let results = join_all(runs).await;
            self.finished_at = Some(Utc::now());

            let total = results.len();
            let mut failures = Vec::new();
            for (cluster, result) in results {
                if let Err(err) = result {
                    error!(%cluster, "vSAN collection failed: {err:#}");
                    failures.push(format!("{cluster}: {err:#}"));
                }
            }

            if failures.is_empty() {
                info!(points = self.sink.len(), "vSAN collection completed");
                Ok(())
            } else {
                Err(eyre!(
                    "{} of {} cluster collections failed: {}",
                    failures.len(),
                    total,
                    failures.join("; ")
                ))
            }
        })
    }

    fn format(&self) -> String {
        let window = match &self.window {
            Some(w) => w,
            None => return "No metrics collected yet. Call collect() first.".to_string(),
        };

        let mut report = String::new();

        report.push_str(&format!("\n{}\n", "=".repeat(80)));
        report.push_str(&format!("{:^80}\n", "vSAN PERFORMANCE REPORT"));
        report.push_str(&format!("{}\n", "=".repeat(80)));

        report.push_str(&format!(
            "\nCollection Summary:\n\
            • Window: {}\n\
            • Clusters: {}\n\
            • Points: {}\n\n",
            window,
            self.collectors.len(),
            self.sink.len()
        ));

        for collector in &self.collectors {
            match collector.stats() {
                Some(_) => report.push_str(&collector.format()),
                None => report.push_str(&format!("Cluster {}: no data collected\n", collector.cluster().name)),
            }
        }

        report.push_str(&format!("\n{}\n", "=".repeat(80)));
        report.push_str(&format!("{:^80}\n", "END OF REPORT"));
        report.push_str(&format!("{}\n", "=".repeat(80)));

        report
    }

    fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "collection_info": {
                "window": self.window,
                "finished_at": self.finished_at,
                "points": self.sink.len(),
            },
            "clusters": self
                .collectors
                .iter()
                .map(|c| c.summary())
                .collect::<Vec<_>>(),
            "points": self.sink.points(),
        })
    }

    fn name(&self) -> &'static str {
        "Orchestrator"
    }
}
