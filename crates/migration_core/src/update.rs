use crate::{MigrationStats, Msg};

/// Pure update function: applies a message to the run statistics.
///
/// Returns the 1-based ordinal of the post for `Msg::PostStarted`, `None` otherwise.
pub fn update(stats: &mut MigrationStats, msg: Msg) -> Option<u64> {
    let counters = stats.counters_mut();
    match msg {
        Msg::PostStarted => {
            counters.posts_processed += 1;
            return Some(counters.posts_processed);
        }
        Msg::ImageDownloaded => counters.images_downloaded += 1,
        Msg::ImageUploaded => counters.images_uploaded += 1,
        Msg::ImageFailed => counters.images_failed += 1,
        Msg::PostCreated => counters.posts_created += 1,
        Msg::PostFailed { post, error } => {
            counters.posts_failed += 1;
            stats.push_error(post, error);
        }
        Msg::EntryAborted { post, error } => {
            // Keeps processed == created + failed when an entry dies mid-way.
            counters.posts_failed += 1;
            stats.push_error(post, error);
        }
        Msg::ImageSkipped => {}
    }
    None
}
