use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use engine_logging::{engine_error, engine_info, engine_warn};
use futures_util::FutureExt;
use migration_core::{
    update, MediaId, MigrationStats, Msg, NormalizedPost, RawEntry, RunReport,
};

use crate::config::MigrationConfig;
use crate::feed::FeedReader;
use crate::image::ImageResolver;
use crate::persist::PersistError;
use crate::publish::PostPublisher;
use crate::report::generate_report;
use crate::transfer::AssetTransfer;
use crate::wordpress::TargetSite;
use crate::{EntryError, FeedError};

/// Pause between consecutive entries. Nothing waits after the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    delay: Duration,
}

impl Pacing {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Pause due after entry `index` (0-based) of `total`.
    pub fn pause_after(&self, index: usize, total: usize) -> Option<Duration> {
        (index + 1 < total && !self.delay.is_zero()).then_some(self.delay)
    }

    pub async fn wait_after(&self, index: usize, total: usize) {
        if let Some(pause) = self.pause_after(index, total) {
            tokio::time::sleep(pause).await;
        }
    }
}

/// How a run ended, before the report is written.
#[derive(Debug)]
pub enum RunOutcome {
    Completed,
    FeedFailed(FeedError),
    Interrupted,
}

/// Outcome, final statistics and the result of writing the report.
#[derive(Debug)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub stats: MigrationStats,
    pub report: Result<RunReport, PersistError>,
}

impl RunSummary {
    /// Every entry was attempted and the report is on disk.
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed) && self.report.is_ok()
    }
}

/// Sequential feed-to-site migration. Statistics are lent in by the caller so
/// they survive an interrupted run.
pub struct Migrator<S> {
    source_url: String,
    target_url: String,
    feed: FeedReader,
    resolver: ImageResolver,
    transfer: AssetTransfer,
    publisher: PostPublisher,
    site: S,
    pacing: Pacing,
    report_file: PathBuf,
}

impl<S: TargetSite> Migrator<S> {
    pub fn new(config: &MigrationConfig, client: reqwest::Client, site: S) -> Self {
        Self {
            source_url: config.source_url.clone(),
            target_url: config.site_url.clone(),
            feed: FeedReader::new(client.clone(), config.feed_url.clone(), config.fetch.clone()),
            resolver: ImageResolver::new(client.clone(), config.fetch.clone()),
            transfer: AssetTransfer::new(
                client,
                config.images_dir.clone(),
                config.download_images,
                config.fetch.clone(),
            ),
            publisher: PostPublisher::new(config.import_as_draft),
            site,
            pacing: Pacing::new(config.request_delay),
            report_file: config.report_file.clone(),
        }
    }

    pub fn site(&self) -> &S {
        &self.site
    }

    /// Run until done or until `interrupt` resolves, then write the report.
    /// The report is written on every path, including a fatal feed error.
    pub async fn run_and_report<F>(&self, interrupt: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        let mut stats = MigrationStats::new();
        let outcome = tokio::select! {
            result = self.run(&mut stats) => match result {
                Ok(()) => RunOutcome::Completed,
                Err(err) => {
                    engine_error!("Fatal error: {}", err);
                    RunOutcome::FeedFailed(err)
                }
            },
            _ = interrupt => {
                engine_info!("Migration interrupted by user");
                RunOutcome::Interrupted
            }
        };

        let report = generate_report(&stats, &self.report_file, Local::now());
        if let Err(err) = &report {
            engine_error!(
                "Failed to write report to {}: {}",
                self.report_file.display(),
                err
            );
        }
        RunSummary {
            outcome,
            stats,
            report,
        }
    }

    /// Only a feed failure is returned; every per-entry problem lands in `stats`.
    pub async fn run(&self, stats: &mut MigrationStats) -> Result<(), FeedError> {
        engine_info!("Starting Ghost to WordPress migration");
        engine_info!("Source: {}", self.source_url);
        engine_info!("Target: {}", self.target_url);

        let feed = match self.feed.fetch().await {
            Ok(feed) => feed,
            Err(err) => {
                engine_error!("Failed to fetch RSS feed: {}", err);
                return Err(err);
            }
        };

        if feed.entries.is_empty() {
            engine_warn!("No posts found in RSS feed");
            return Ok(());
        }

        let total = feed.entries.len();
        engine_info!("Migrating {} posts...", total);

        for (idx, entry) in feed.entries.iter().enumerate() {
            let outcome = AssertUnwindSafe(self.migrate_entry(entry, total, stats))
                .catch_unwind()
                .await;
            if let Err(payload) = outcome {
                let err = EntryError::Panicked(panic_message(payload.as_ref()));
                engine_error!("Unexpected error migrating post: {}", err);
                update(
                    stats,
                    Msg::EntryAborted {
                        post: entry.display_title().to_string(),
                        error: err.to_string(),
                    },
                );
            }

            self.pacing.wait_after(idx, total).await;
        }

        Ok(())
    }

    async fn migrate_entry(&self, entry: &RawEntry, total: usize, stats: &mut MigrationStats) {
        let ordinal = update(stats, Msg::PostStarted).unwrap_or_default();
        let title = entry.display_title().to_string();
        engine_info!("Processing post {}/{}: {}", ordinal, total, title);

        let post = entry.normalize();
        let media = self.featured_media(&post, stats).await;

        match self.publisher.create(&self.site, &post, media).await {
            Ok(id) => {
                engine_info!("Created WordPress post: {} (ID: {})", title, id);
                update(stats, Msg::PostCreated);
            }
            Err(err) => {
                engine_error!("Failed to create WordPress post '{}': {}", title, err);
                update(
                    stats,
                    Msg::PostFailed {
                        post: title,
                        error: err.to_string(),
                    },
                );
            }
        }
    }

    /// Scrape, download, upload. Any miss leaves the post without a featured image.
    async fn featured_media(
        &self,
        post: &NormalizedPost,
        stats: &mut MigrationStats,
    ) -> Option<MediaId> {
        let image_url = self.resolver.resolve(&post.link).await?;
        engine_info!("Found featured image: {}", image_url);

        let path = match self.transfer.download(&image_url, &post.slug).await {
            Ok(Some(path)) => {
                update(stats, Msg::ImageDownloaded);
                path
            }
            Ok(None) => {
                engine_info!("Image downloads disabled, skipping {}", image_url);
                update(stats, Msg::ImageSkipped);
                return None;
            }
            Err(err) => {
                engine_error!("Failed to download image {}: {}", image_url, err);
                update(stats, Msg::ImageFailed);
                return None;
            }
        };

        match self.transfer.upload(&self.site, &path, &post.title).await {
            Ok(id) => {
                update(stats, Msg::ImageUploaded);
                Some(id)
            }
            Err(err) => {
                engine_error!("Failed to upload image {}: {}", path.display(), err);
                update(stats, Msg::ImageFailed);
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[test]
    fn no_pause_after_last_entry_or_when_disabled() {
        let pacing = Pacing::new(Duration::from_secs(1));
        assert_eq!(pacing.pause_after(0, 3), Some(Duration::from_secs(1)));
        assert_eq!(pacing.pause_after(1, 3), Some(Duration::from_secs(1)));
        assert_eq!(pacing.pause_after(2, 3), None);
        assert_eq!(pacing.pause_after(0, 1), None);

        assert_eq!(Pacing::new(Duration::ZERO).pause_after(0, 3), None);
    }

    #[tokio::test(start_paused = true)]
    async fn two_entries_wait_exactly_one_delay() {
        let pacing = Pacing::new(Duration::from_secs(1));
        let start = Instant::now();

        pacing.wait_after(0, 2).await;
        let after_first = start.elapsed();
        assert!(after_first >= Duration::from_secs(1), "{after_first:?}");
        assert!(after_first < Duration::from_millis(1100), "{after_first:?}");

        pacing.wait_after(1, 2).await;
        assert_eq!(start.elapsed(), after_first);
    }

    #[test]
    fn panic_payload_text_is_kept() {
        assert_eq!(panic_message(&"static str"), "static str");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "panic");
    }
}
