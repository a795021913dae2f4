use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Root of the media library holding the symlinks.
    pub media_dir: PathBuf,
    /// Directory receiving the JSONL event logs.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default)]
    pub scan_options: ScanOptions,
    pub instances: Vec<Instance>,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

/// Library category. Decides which catalog the instance reconciles against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[serde(alias = "movies")]
    Films,
    #[serde(alias = "tv")]
    Series,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Films => "films",
            Category::Series => "series",
        }
    }

    /// Films are matched on title and year, series on title alone.
    pub fn requires_year(&self) -> bool {
        matches!(self, Category::Films)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One library instance: a category, the mount its links point into, and the
/// media folders holding those links.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Instance {
    pub name: String,
    pub category: Category,
    /// Mount point the symlinks resolve into. Only links whose raw target
    /// starts with this path are considered.
    pub mount_path: PathBuf,
    /// Folders relative to `media_dir`, scanned in order.
    pub media_folders: Vec<String>,
    /// Radarr/Sonarr base URL (e.g., "http://localhost:7878").
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl Instance {
    /// Whether both API fields are filled in.
    pub fn has_api(&self) -> bool {
        !self.api_url.is_empty() && !self.api_key.is_empty()
    }
}

/// Run options.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanOptions {
    /// Render progress bars when attached to a terminal.
    #[serde(default = "default_true")]
    pub show_progress: bool,
    /// Forward process logs to journald.
    #[serde(default = "default_true")]
    pub syslog_logging: bool,
    #[serde(default = "default_syslog_ident")]
    pub syslog_ident: String,
    /// Write the JSONL event log under `log_dir`.
    #[serde(default = "default_true")]
    pub json_logging: bool,
    /// Notify Radarr/Sonarr after each deletion.
    #[serde(default)]
    pub enable_api_actions: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            show_progress: true,
            syslog_logging: true,
            syslog_ident: default_syslog_ident(),
            json_logging: true,
            enable_api_actions: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_syslog_ident() -> String {
    "broken-symlinks".to_string()
}

/// Sanitized config for display (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub media_dir: PathBuf,
    pub log_dir: PathBuf,
    pub scan_options: ScanOptions,
    pub instances: Vec<SanitizedInstance>,
}

/// Sanitized instance (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedInstance {
    pub name: String,
    pub category: Category,
    pub mount_path: PathBuf,
    pub media_folders: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_url: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            media_dir: config.media_dir.clone(),
            log_dir: config.log_dir.clone(),
            scan_options: config.scan_options.clone(),
            instances: config
                .instances
                .iter()
                .map(|i| SanitizedInstance {
                    name: i.name.clone(),
                    category: i.category,
                    mount_path: i.mount_path.clone(),
                    media_folders: i.media_folders.clone(),
                    api_url: i.api_url.clone(),
                    api_key_configured: !i.api_key.is_empty(),
                })
                .collect(),
        }
    }
}
