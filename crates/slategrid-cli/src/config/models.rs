use slategrid::engine::config::GridConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerSettings {
    pub url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub layout_path: PathBuf,
    pub grid: GridConfig,
    pub optimizer: OptimizerSettings,
}
