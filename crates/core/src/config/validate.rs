use std::collections::HashSet;
use std::path::Path;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one instance is configured
/// - Instance names are non-empty and unique
/// - Mount paths are absolute, media folders are relative and non-empty
/// - API URL and key are either both set or both empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.instances.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one instance must be configured".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for instance in &config.instances {
        if instance.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "instance name cannot be empty".to_string(),
            ));
        }
        if !names.insert(instance.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate instance name '{}'",
                instance.name
            )));
        }

        if !instance.mount_path.is_absolute() {
            return Err(ConfigError::ValidationError(format!(
                "instances.{}.mount_path must be absolute",
                instance.name
            )));
        }

        if instance.media_folders.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "instances.{}.media_folders cannot be empty",
                instance.name
            )));
        }
        if let Some(folder) = instance
            .media_folders
            .iter()
            .find(|f| f.is_empty() || Path::new(f).is_absolute())
        {
            return Err(ConfigError::ValidationError(format!(
                "instances.{}.media_folders entry '{}' must be a relative path",
                instance.name, folder
            )));
        }

        if instance.api_url.is_empty() != instance.api_key.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "instances.{}: api_url and api_key must be set together",
                instance.name
            )));
        }
        if !instance.api_url.is_empty()
            && !(instance.api_url.starts_with("http://")
                || instance.api_url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(format!(
                "instances.{}.api_url must start with http:// or https://",
                instance.name
            )));
        }
    }

    Ok(())
}
