use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    env,
    path::PathBuf,
};

#[derive(Clone, Debug, Deserialize, Default)]
pub(crate) struct AppConfig {
    #[serde(default)]
    pub(crate) data_dir: PathBuf,
}

pub(crate) const DATA_DIR_ENV: &str = "VSAN_PERF_COLLECTOR_DATA";
pub(crate) const CONFIG_DIR_ENV: &str = "VSAN_PERF_COLLECTOR_CONFIG";

lazy_static::lazy_static! {
    static ref DATA_FOLDER: Option<PathBuf> = env::var(DATA_DIR_ENV).ok().map(PathBuf::from);
    static ref CONFIG_FOLDER: Option<PathBuf> = env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
}

/// Directory for exported reports when no absolute output path is given.
/// `VSAN_PERF_COLLECTOR_DATA` overrides the platform default.
pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

/// Directory searched for `config.yaml`.
/// `VSAN_PERF_COLLECTOR_CONFIG` overrides the platform default.
pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "vsan", "vsan-perf-collector")
}
