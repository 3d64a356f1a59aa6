#[macro_use]
extern crate tracing;

mod app;
mod logging;

pub use app::run;
use color_eyre::Result;
pub use logging::init_logging;
pub use vsan_collector_config::{
    Args,
    Config,
};

pub fn init_errors() -> Result<()> {
    color_eyre::install()
}
