use std::sync::LazyLock;

use regex::Regex;

/// Largest rendition the source CDN serves.
const MAX_IMAGE_SIZE_SEGMENT: &str = "/size/w2000/";

static SIZE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/size/w\d+/").expect("valid size segment pattern"));

/// Rewrite every `/size/w<digits>/` directory to the largest rendition.
/// URLs without a size directory are returned unchanged.
pub fn upgrade_image_size(url: &str) -> String {
    SIZE_SEGMENT
        .replace_all(url, MAX_IMAGE_SIZE_SEGMENT)
        .into_owned()
}
