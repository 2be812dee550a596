//! Migration engine: feed, scraping, transfer and publishing IO around the core reducer.
mod check;
mod config;
mod feed;
mod fetch;
mod filename;
mod image;
mod migrate;
mod persist;
mod publish;
mod report;
mod transfer;
mod types;
mod wordpress;

pub use check::{check_connection, CheckOutcome, ConnectionReport};
pub use config::{delay_from_secs, Credentials, MigrationConfig, MAX_REQUEST_DELAY};
pub use feed::{parse_feed, FeedReader, ParsedFeed};
pub use fetch::{build_client, fetch_bytes, FetchSettings, USER_AGENT};
pub use filename::asset_filename;
pub use image::{select_featured_image, ImageResolver, ImageStrategy, IMAGE_STRATEGIES};
pub use migrate::{Migrator, Pacing, RunOutcome, RunSummary};
pub use persist::{ensure_output_dir, parent_dir, AtomicFileWriter, PersistError};
pub use publish::PostPublisher;
pub use report::generate_report;
pub use transfer::AssetTransfer;
pub use types::{
    EntryError, FailureKind, FeedError, FetchError, FetchMetadata, FetchOutput, SiteError,
    TransferError,
};
pub use wordpress::{
    ApiIndex, CurrentUser, MediaUpload, PostRequest, PostStatus, TargetSite, WordPressClient,
};
