//! Migration core: pure domain types and the statistics reducer.
mod entry;
mod image_url;
mod mime;
mod msg;
mod report;
mod stats;
mod update;

pub use entry::{derive_slug, normalize_date, NormalizedPost, RawEntry, UNKNOWN_TITLE};
pub use image_url::upgrade_image_size;
pub use mime::{mime_type_for, FALLBACK_MIME};
pub use msg::Msg;
pub use report::RunReport;
pub use stats::{Counters, ErrorRecord, MigrationStats};
pub use update::update;

/// Target-side identifier of an uploaded media item.
pub type MediaId = u64;

/// Target-side identifier of a created post.
pub type PostId = u64;
