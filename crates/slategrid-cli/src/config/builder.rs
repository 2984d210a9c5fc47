use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, OptimizerSettings};
use crate::cli::{OptimizerArgs, SessionArgs};
use crate::error::{CliError, Result};
use slategrid::engine::config::GridConfigBuilder;
use std::str::FromStr;
use std::time::Duration;

pub fn build_config(args: &SessionArgs, optimizer_args: Option<&OptimizerArgs>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let grid_file = file_config.grid.take().unwrap_or_default();
    let grid = GridConfigBuilder::new()
        .width(args.width.or(grid_file.width).unwrap_or(defaults.width))
        .min_slots(
            args.min_slots
                .or(grid_file.min_slots)
                .unwrap_or(defaults.min_slots),
        )
        .max_slots(
            args.max_slots
                .or(grid_file.max_slots)
                .unwrap_or(defaults.max_slots),
        )
        .default_slots(grid_file.default_slots.unwrap_or(defaults.default_slots))
        .max_possible_score(
            args.max_score
                .or(grid_file.max_possible_score)
                .unwrap_or(defaults.max_possible_score),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let optimizer_file = file_config.optimizer.take().unwrap_or_default();
    let cli_optimizer = optimizer_args.cloned().unwrap_or_default();
    let optimizer = OptimizerSettings {
        url: cli_optimizer
            .url
            .or(optimizer_file.url)
            .unwrap_or(defaults.optimizer_url),
        timeout: Duration::from_secs(
            cli_optimizer
                .timeout_secs
                .or(optimizer_file.timeout_secs)
                .unwrap_or(defaults.timeout_secs),
        ),
    };
    if optimizer.timeout.is_zero() {
        return Err(CliError::Config(
            "`optimizer.timeout-secs` must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        catalog_path: args.catalog.clone(),
        layout_path: args.layout.clone(),
        grid,
        optimizer,
    })
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "grid.width" => {
                config.grid.get_or_insert_with(Default::default).width =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "grid.min-slots" => {
                config.grid.get_or_insert_with(Default::default).min_slots =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "grid.max-slots" => {
                config.grid.get_or_insert_with(Default::default).max_slots =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "grid.default-slots" => {
                config.grid.get_or_insert_with(Default::default).default_slots =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "grid.max-possible-score" => {
                config
                    .grid
                    .get_or_insert_with(Default::default)
                    .max_possible_score = Some(parse_value(key, value_str, "float")?);
            }
            "optimizer.url" => {
                config.optimizer.get_or_insert_with(Default::default).url =
                    Some(value_str.to_string());
            }
            "optimizer.timeout-secs" => {
                config
                    .optimizer
                    .get_or_insert_with(Default::default)
                    .timeout_secs = Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
