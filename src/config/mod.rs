#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{AthleteCommand, CliConfig, CoachCommand, Command};
pub use toml_config::TomlConfig;
