use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::FetchSettings;

/// Basic-auth credentials for the target's write API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Everything a run needs, already loaded and validated by the caller.
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Public site of the source blog, used for log output only.
    pub source_url: String,
    pub feed_url: String,
    /// Public site of the target, e.g. `https://blog.example.com`.
    pub site_url: String,
    /// REST base, e.g. `https://blog.example.com/wp-json/wp/v2`.
    pub api_base: String,
    pub credentials: Credentials,
    pub images_dir: PathBuf,
    pub report_file: PathBuf,
    pub download_images: bool,
    pub import_as_draft: bool,
    pub request_delay: Duration,
    pub fetch: FetchSettings,
}

/// Longest pause allowed between two entries.
pub const MAX_REQUEST_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Seconds from configuration to a pause; zero, negative and NaN mean "no pause".
/// Larger values are capped at [`MAX_REQUEST_DELAY`].
pub fn delay_from_secs(seconds: f64) -> Duration {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::from_secs_f64(seconds.min(MAX_REQUEST_DELAY.as_secs_f64()))
    } else {
        Duration::ZERO
    }
}
