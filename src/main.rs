use clap::Parser;
use color_eyre::Result;
use vsan_perf_collector::{
    init_errors,
    init_logging,
    run,
    Args,
    Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_errors()?;
    let args = Args::parse();
    init_logging(args.verbose)?;

    let config = Config::new(args)?;
    config.validate()?;
    run(config).await
}
