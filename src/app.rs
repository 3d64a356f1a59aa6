use color_eyre::Result;
use eyre::Context as _;
use std::sync::Arc;
use vsan_collector_config::Config;
use vsan_stats_gatherer::{
    Collector,
    HttpPerfClient,
    MemorySink,
    Orchestrator,
    TimeWindow,
};

/// Runs one collection cycle over every configured cluster, prints the
/// report and optionally exports it as JSON.
pub async fn run(config: Config) -> Result<()> {
    let endpoint = config.endpoint()?;
    let clusters = config.cluster_identities()?;
    info!(endpoint = %endpoint, clusters = clusters.len(), "Starting vSAN performance collection");

    let mut client = HttpPerfClient::new(reqwest::Client::new(), endpoint)?;
    if let Some(username) = &config.username {
        client = client.with_credentials(username.clone(), config.password.clone());
    }
    debug!(query_url = %client.query_url(), "Performance query endpoint");

    let window = TimeWindow::last(config.lookback)?;
    info!(%window, "Querying data");

    let sink = Arc::new(MemorySink::new());
    let mut orchestrator = Orchestrator::new(
        clusters,
        config.entity_groups.clone(),
        Arc::new(client),
        sink,
        config.collection_timeout,
    );

    let outcome = orchestrator.collect(window).await;

    println!("{}", orchestrator.format());

    if let Some(output_file) = config.output_path() {
        if let Some(parent) = output_file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        let json_string = serde_json::to_string_pretty(&orchestrator.summary())?;
        tokio::fs::write(&output_file, json_string)
            .await
            .wrap_err_with(|| format!("Failed to write {}", output_file.display()))?;
        info!("Data exported successfully to {}", output_file.display());
    }

    outcome
}
