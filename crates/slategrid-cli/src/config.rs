//! Layered configuration: CLI flags override `--set` values, which override the TOML
//! config file, which overrides the built-in defaults.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::build_config;
