#[macro_use]
extern crate tracing;

mod app_config;
mod args;

use app_config::AppConfig;
pub use app_config::{
    get_config_dir,
    get_data_dir,
};
pub use args::Args;
use color_eyre::Result;
use eyre::eyre;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    path::{
        Path,
        PathBuf,
    },
    time::Duration,
};
use url::Url;
use vsan_stats_gatherer::{
    ClusterIdentity,
    EntityGroup,
};

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

/// A cluster as handed over by the inventory walker.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterConfig {
    pub datacenter: String,
    pub name: String,
    /// Managed object reference value, e.g. `domain-c7`.
    pub moid: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten, skip_serializing)]
    app_config: AppConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcenter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(with = "humantime_serde")]
    pub lookback: Duration,
    #[serde(with = "humantime_serde")]
    pub collection_timeout: Duration,
    pub entity_groups: Vec<EntityGroup>,
    #[serde(default)]
    pub clusters: Vec<ClusterConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(default)]
    pub verbose: bool,
}

impl Config {
    /// Layers the built-in defaults, `config.yaml` from the config directory
    /// and the command-line arguments, in that order.
    pub fn new(args: Args) -> Result<Self, config::ConfigError> {
        Self::load(args, &get_config_dir())
    }

    pub fn load(args: Args, config_dir: &Path) -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        let config_files = [("config.yaml", config::FileFormat::Yaml)];

        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        builder = builder.add_source(args);

        let cfg: Self = builder.build()?.try_deserialize()?;

        Ok(cfg)
    }

    pub fn data_dir(&self) -> &Path {
        &self.app_config.data_dir
    }

    pub fn endpoint(&self) -> Result<&Url> {
        self.endpoint
            .as_ref()
            .ok_or_else(|| eyre!("no endpoint configured; pass --endpoint or set it in config.yaml"))
    }

    /// The `vcenter` tag value: the configured name, else the endpoint host.
    pub fn vcenter_name(&self) -> Result<String> {
        if let Some(vcenter) = &self.vcenter {
            return Ok(vcenter.clone());
        }
        let endpoint = self.endpoint()?;
        endpoint
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| eyre!("No host found in endpoint URL: {}", endpoint))
    }

    pub fn cluster_identities(&self) -> Result<Vec<ClusterIdentity>> {
        let vcenter = self.vcenter_name()?;
        Ok(self
            .clusters
            .iter()
            .map(|cluster| ClusterIdentity {
                vcenter: vcenter.clone(),
                datacenter: cluster.datacenter.clone(),
                name: cluster.name.clone(),
                moid: cluster.moid.clone(),
            })
            .collect())
    }

    /// Relative output paths are resolved against the data directory.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output_file.as_ref().map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                self.data_dir().join(path)
            }
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.endpoint()?;
        if self.clusters.is_empty() {
            return Err(eyre!("config.clusters must be non-empty"));
        }
        if self.entity_groups.is_empty() {
            return Err(eyre!("config.entity_groups must be non-empty"));
        }
        if self.lookback.is_zero() {
            return Err(eyre!("config.lookback must be greater than zero"));
        }
        for cluster in &self.clusters {
            if cluster.moid.is_empty() {
                return Err(eyre!("cluster '{}' has an empty moid", cluster.name));
            }
        }
        debug!(
            clusters = self.clusters.len(),
            groups = self.entity_groups.len(),
            lookback = %humantime::format_duration(self.lookback),
            "configuration validated"
        );
        Ok(())
    }
}
