//! JSON configuration file: loading, validation and the `init-config` template.
use std::fs;
use std::path::{Path, PathBuf};

use migration_engine::{
    delay_from_secs, Credentials, FetchSettings, MigrationConfig, MAX_REQUEST_DELAY,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub ghost: Ghost,
    pub wordpress: WordPress,
    #[serde(default)]
    pub migration: Migration,
    #[serde(default)]
    pub output: Output,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ghost {
    #[serde(default)]
    pub url: String,
    pub rss_feed: String,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordPress {
    pub url: String,
    pub api_base: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for WordPress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordPress")
            .field("url", &self.url)
            .field("api_base", &self.api_base)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Migration {
    pub download_images: bool,
    pub import_as_draft: bool,
    /// Seconds to wait between posts.
    pub delay_between_requests: f64,
}

impl Default for Migration {
    fn default() -> Self {
        Self {
            download_images: true,
            import_as_draft: true,
            delay_between_requests: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Output {
    pub logs_dir: PathBuf,
    pub images_dir: PathBuf,
    pub report_file: PathBuf,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            logs_dir: PathBuf::from("logs"),
            images_dir: PathBuf::from("images"),
            report_file: PathBuf::from("reports/migration_report.json"),
        }
    }
}

impl AppConfig {
    /// Engine view of the configuration. `force_draft` overrides `import_as_draft`.
    pub fn to_migration_config(&self, force_draft: bool) -> MigrationConfig {
        MigrationConfig {
            source_url: self.ghost.url.clone(),
            feed_url: self.ghost.rss_feed.trim().to_string(),
            site_url: self.wordpress.url.trim().trim_end_matches('/').to_string(),
            api_base: self
                .wordpress
                .api_base
                .trim()
                .trim_end_matches('/')
                .to_string(),
            credentials: Credentials {
                username: self.wordpress.username.clone(),
                password: self.wordpress.password.clone(),
            },
            images_dir: self.output.images_dir.clone(),
            report_file: self.output.report_file.clone(),
            download_images: self.migration.download_images,
            import_as_draft: force_draft || self.migration.import_as_draft,
            request_delay: delay_from_secs(self.migration.delay_between_requests),
            fetch: FetchSettings::default(),
        }
    }
}

pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: AppConfig = serde_json::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &AppConfig) -> Result<(), ConfigError> {
    if cfg.ghost.rss_feed.trim().is_empty() {
        return Err(ConfigError::Invalid("ghost.rss_feed must be non-empty"));
    }
    if cfg.wordpress.url.trim().is_empty() {
        return Err(ConfigError::Invalid("wordpress.url must be non-empty"));
    }
    if cfg.wordpress.api_base.trim().is_empty() {
        return Err(ConfigError::Invalid("wordpress.api_base must be non-empty"));
    }
    if cfg.wordpress.username.trim().is_empty() {
        return Err(ConfigError::Invalid("wordpress.username must be non-empty"));
    }
    let delay = cfg.migration.delay_between_requests;
    if !delay.is_finite() || delay < 0.0 {
        return Err(ConfigError::Invalid(
            "migration.delay_between_requests must be a number >= 0",
        ));
    }
    if delay > MAX_REQUEST_DELAY.as_secs_f64() {
        return Err(ConfigError::Invalid(
            "migration.delay_between_requests must be at most 86400 seconds",
        ));
    }
    Ok(())
}

pub fn example() -> &'static str {
    r#"{
  "ghost": {
    "url": "https://your-ghost-blog.com",
    "rss_feed": "https://your-ghost-blog.com/rss/"
  },
  "wordpress": {
    "url": "https://your-wordpress-site.com",
    "api_base": "https://your-wordpress-site.com/wp-json/wp/v2",
    "username": "admin",
    "password": "xxxx xxxx xxxx xxxx xxxx xxxx"
  },
  "migration": {
    "download_images": true,
    "import_as_draft": true,
    "delay_between_requests": 1.0
  },
  "output": {
    "logs_dir": "logs",
    "images_dir": "images",
    "report_file": "reports/migration_report.json"
  }
}
"#
}

/// Write [`example`] to `path`. An existing file is kept unless `force` is set.
pub fn write_example(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::Invalid(
            "config file already exists (use --force to overwrite)",
        ));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, example())?;
    Ok(())
}
