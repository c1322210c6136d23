use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::types::{FriggError, FriggResult};

/// Config file names looked up in the project directory, in priority order
pub const DEFAULT_CONFIG_FILES: [&str; 2] = [".frigg.yml", ".frigg.yaml"];

#[derive(Debug, Default, Deserialize, Clone)]
pub struct FriggConfig {
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default)]
    pub setup_tasks: Vec<String>,
    /// Commands whose output always streams live, regardless of `--verbose`.
    #[serde(default)]
    pub verbose_tasks: HashSet<String>,
    /// Per-task timeout in seconds. No timeout when absent.
    #[serde(default)]
    pub task_timeout: Option<u64>,
    #[serde(default, deserialize_with = "lenient_coverage")]
    pub coverage: Option<CoverageSettings>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CoverageSettings {
    pub path: String,
    pub parser: String,
}

/// A `coverage` key of the wrong shape disables coverage instead of failing the load.
fn lenient_coverage<'de, D>(deserializer: D) -> Result<Option<CoverageSettings>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_yaml::from_value::<CoverageSettings>(value) {
        Ok(settings) => Ok(Some(settings)),
        Err(e) => {
            tracing::warn!("Ignoring coverage settings: {}", e);
            Ok(None)
        }
    }
}

pub fn parse_project_config(yaml_str: &str) -> FriggResult<FriggConfig> {
    if yaml_str.trim().is_empty() {
        return Ok(FriggConfig::default());
    }
    let config: FriggConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

/// Find and parse the project configuration in `directory`.
///
/// Fails with [`FriggError::ConfigNotFound`] when no config file exists or the
/// file lists no tasks, and with [`FriggError::Yaml`] when the file is malformed.
pub fn load_project_config(directory: &Path) -> FriggResult<FriggConfig> {
    let config_path = DEFAULT_CONFIG_FILES
        .iter()
        .map(|name| directory.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            FriggError::ConfigNotFound(format!(
                "no {} file in {}",
                DEFAULT_CONFIG_FILES[0],
                directory.display()
            ))
        })?;

    tracing::debug!("Loading configuration from {}", config_path.display());
    let content = std::fs::read_to_string(&config_path)?;
    let config = parse_project_config(&content)?;

    if config.tasks.is_empty() {
        return Err(FriggError::ConfigNotFound(format!(
            "{} defines no tasks",
            config_path.display()
        )));
    }

    for (key, list) in [("setup_tasks", &config.setup_tasks), ("tasks", &config.tasks)] {
        if let Some(position) = list.iter().position(|task| task.trim().is_empty()) {
            return Err(FriggError::Config(format!(
                "entry #{} of `{}` in {} is an empty command",
                position + 1,
                key,
                config_path.display()
            )));
        }
    }

    Ok(config)
}
