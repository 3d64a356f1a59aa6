use eyre::{
    Context as _,
    Result,
};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

/// Crates whose events are shown by default.
const LOG_TARGETS: [&str; 3] = ["vsan_perf_collector", "vsan_stats_gatherer", "vsan_collector_config"];

/// `RUST_LOG` wins over the level picked from `verbose`.
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(level)).context("Invalid default log filter")?,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
        .with(tracing_error::ErrorLayer::default())
        .try_init()
        .context("Failed to initialize tracing subscriber")
}

fn default_directives(level: &str) -> String {
    let mut directives = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>();
    directives.push("reqwest=warn".to_string());
    directives.join(",")
}
