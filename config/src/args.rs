use clap::Parser;

/// Collects vSAN performance series and normalizes them into metric points.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version = version(), about, long_about = None)]
pub struct Args {
    /// Base URL of the vSAN performance endpoint.
    #[clap(long, env = "VSAN_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// vCenter name used for the `vcenter` tag. Defaults to the endpoint host.
    #[clap(long, value_name = "NAME")]
    pub vcenter: Option<String>,

    /// User for basic authentication against the endpoint.
    #[clap(long, env = "VSAN_USERNAME")]
    pub username: Option<String>,

    /// Password for basic authentication against the endpoint.
    #[clap(long, env = "VSAN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// How far back the query window reaches (e.g. "5m", "1h").
    #[clap(long, value_name = "DURATION")]
    pub lookback: Option<String>,

    /// Write the collected points and summary as JSON to this file.
    #[clap(long, value_name = "FILE")]
    pub output_file: Option<String>,

    /// Enable debug logging.
    #[clap(short, long, action)]
    pub verbose: bool,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(endpoint) = &self.endpoint {
                cache.insert("endpoint".to_string(), endpoint.clone().into());
            }
            if let Some(vcenter) = &self.vcenter {
                cache.insert("vcenter".to_string(), vcenter.clone().into());
            }
            if let Some(username) = &self.username {
                cache.insert("username".to_string(), username.clone().into());
            }
            if let Some(password) = &self.password {
                cache.insert("password".to_string(), password.clone().into());
            }
            if let Some(lookback) = &self.lookback {
                cache.insert("lookback".to_string(), lookback.clone().into());
            }
            if let Some(output_file) = &self.output_file {
                cache.insert("output_file".to_string(), output_file.clone().into());
            }
            if self.verbose {
                cache.insert("verbose".to_string(), true.into());
            }
            Ok(cache)
        }
    }
}

pub fn version() -> String {
    let author = clap::crate_authors!();
    let config_dir_path = crate::get_config_dir().display().to_string();
    let data_dir_path = crate::get_data_dir().display().to_string();

    format!(
        "\
Authors: {author}

Config directory: {config_dir_path}
Data directory: {data_dir_path}"
    )
}
