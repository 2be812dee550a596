use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One entry in the run's error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub post: String,
    pub error: String,
}

/// The six counters reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counters {
    pub posts_processed: u64,
    pub posts_created: u64,
    pub posts_failed: u64,
    pub images_downloaded: u64,
    pub images_uploaded: u64,
    pub images_failed: u64,
}

/// Run-wide aggregate. Only [`crate::update`] mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationStats {
    counters: Counters,
    started_at: DateTime<Local>,
    errors: Vec<ErrorRecord>,
}

impl MigrationStats {
    pub fn new() -> Self {
        Self::started_at(Local::now())
    }

    pub fn started_at(started_at: DateTime<Local>) -> Self {
        Self {
            counters: Counters::default(),
            started_at,
            errors: Vec::new(),
        }
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn start_time(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    /// Every processed post ended up either created or failed.
    pub fn is_balanced(&self) -> bool {
        let c = &self.counters;
        c.posts_processed == c.posts_created + c.posts_failed
    }

    pub(crate) fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    pub(crate) fn push_error(&mut self, post: String, error: String) {
        self.errors.push(ErrorRecord { post, error });
    }
}

impl Default for MigrationStats {
    fn default() -> Self {
        Self::new()
    }
}
