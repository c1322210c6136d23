//! Configuration parsing
//!
//! This module handles discovery and parsing of the project configuration file
//! (`.frigg.yml` / `.frigg.yaml`) into typed settings.

pub mod project;

pub use project::{load_project_config, CoverageSettings, FriggConfig, DEFAULT_CONFIG_FILES};
