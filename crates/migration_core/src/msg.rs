#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Orchestrator picked up the next feed entry.
    PostStarted,
    /// Featured image bytes were written to the local images directory.
    ImageDownloaded,
    /// Featured image was accepted by the target media store.
    ImageUploaded,
    /// Featured image download or upload failed; the post goes on without it.
    ImageFailed,
    /// Target accepted the post.
    PostCreated,
    /// Target rejected the post or could not be reached.
    PostFailed { post: String, error: String },
    /// Something outside the expected failure paths stopped the entry.
    EntryAborted { post: String, error: String },
    /// A featured image was found but image transfer is switched off.
    /// Logged only; no counter moves.
    ImageSkipped,
}
