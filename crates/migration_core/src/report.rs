use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{Counters, ErrorRecord, MigrationStats};

/// Document written at the end of every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub migration_date: String,
    pub duration_seconds: f64,
    pub statistics: Counters,
    pub errors: Vec<ErrorRecord>,
}

impl RunReport {
    pub fn from_stats(stats: &MigrationStats, finished_at: DateTime<Local>) -> Self {
        let elapsed = finished_at.signed_duration_since(stats.start_time());
        let duration_seconds = elapsed
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Self {
            migration_date: stats.start_time().to_rfc3339(),
            duration_seconds,
            statistics: stats.counters(),
            errors: stats.errors().to_vec(),
        }
    }

    /// Human-readable summary, one log line per element.
    pub fn summary_lines(&self) -> Vec<String> {
        let s = &self.statistics;
        vec![
            "=".repeat(60),
            "MIGRATION COMPLETE".to_string(),
            "=".repeat(60),
            format!("Duration: {}", format_duration(self.duration_seconds)),
            format!("Posts processed: {}", s.posts_processed),
            format!("Posts created: {}", s.posts_created),
            format!("Posts failed: {}", s.posts_failed),
            format!("Images downloaded: {}", s.images_downloaded),
            format!("Images uploaded: {}", s.images_uploaded),
            format!("Images failed: {}", s.images_failed),
        ]
    }

    pub fn error_lines(&self) -> Vec<String> {
        if self.errors.is_empty() {
            return Vec::new();
        }
        let mut lines = Vec::with_capacity(self.errors.len() + 1);
        lines.push(format!("{} errors occurred:", self.errors.len()));
        for (idx, record) in self.errors.iter().enumerate() {
            lines.push(format!("  {}. {}: {}", idx + 1, record.post, record.error));
        }
        lines
    }
}

/// `H:MM:SS.mmm`
fn format_duration(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_millis / 3_600_000;
    let minutes = (total_millis / 60_000) % 60;
    let secs = (total_millis / 1000) % 60;
    let millis = total_millis % 1000;
    format!("{hours}:{minutes:02}:{secs:02}.{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::format_duration;

    #[test]
    fn duration_is_clock_formatted() {
        assert_eq!(format_duration(0.0), "0:00:00.000");
        assert_eq!(format_duration(3725.5), "1:02:05.500");
    }

    #[test]
    fn negative_duration_clamps_to_zero() {
        assert_eq!(format_duration(-4.0), "0:00:00.000");
    }
}
