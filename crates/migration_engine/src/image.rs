use engine_logging::{engine_debug, engine_warn};
use migration_core::upgrade_image_size;
use scraper::{Html, Selector};
use url::Url;

use crate::fetch::{fetch_bytes, FetchSettings};

/// One way of finding a post's featured image in its public page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStrategy {
    /// `src` of the first element matching the selector; CDN size is upgraded.
    Src(&'static str),
    /// `content` of the first element matching the selector, used as-is.
    MetaContent(&'static str),
}

/// Tried in order; the first strategy that yields a non-empty value wins.
pub const IMAGE_STRATEGIES: [ImageStrategy; 5] = [
    ImageStrategy::Src("article img.kg-image"),
    ImageStrategy::Src("article .post-full-image img"),
    ImageStrategy::Src("article figure img"),
    ImageStrategy::Src(r#"article img[src*="/content/images/"]"#),
    ImageStrategy::MetaContent(r#"meta[property="og:image"]"#),
];

impl ImageStrategy {
    pub fn try_extract(&self, doc: &Html) -> Option<String> {
        let (css, attr) = match self {
            ImageStrategy::Src(css) => (*css, "src"),
            ImageStrategy::MetaContent(css) => (*css, "content"),
        };
        let selector = Selector::parse(css).ok()?;
        let value = doc
            .select(&selector)
            .next()?
            .value()
            .attr(attr)?
            .trim();
        if value.is_empty() {
            return None;
        }
        match self {
            ImageStrategy::Src(_) => Some(upgrade_image_size(value)),
            ImageStrategy::MetaContent(_) => Some(value.to_string()),
        }
    }
}

/// Apply [`IMAGE_STRATEGIES`] to a page; relative results are resolved against `page_url`.
pub fn select_featured_image(html: &str, page_url: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let found = IMAGE_STRATEGIES
        .iter()
        .find_map(|strategy| strategy.try_extract(&doc))?;
    Some(absolutize(&found, page_url))
}

fn absolutize(found: &str, page_url: &str) -> String {
    if Url::parse(found).is_ok() {
        return found.to_string();
    }
    Url::parse(page_url)
        .and_then(|base| base.join(found))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| found.to_string())
}

pub struct ImageResolver {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ImageResolver {
    pub fn new(client: reqwest::Client, settings: FetchSettings) -> Self {
        Self { client, settings }
    }

    /// Best effort: every failure is logged and becomes "no image".
    pub async fn resolve(&self, post_url: &str) -> Option<String> {
        if post_url.trim().is_empty() {
            engine_debug!("Entry has no link; skipping featured image lookup");
            return None;
        }

        let output = match fetch_bytes(
            &self.client,
            post_url,
            self.settings.page_timeout,
            self.settings.max_page_bytes,
        )
        .await
        {
            Ok(output) => output,
            Err(err) => {
                engine_warn!("Failed to scrape featured image from {}: {}", post_url, err);
                return None;
            }
        };

        let html = String::from_utf8_lossy(&output.bytes);
        let found = select_featured_image(&html, &output.metadata.final_url);
        match &found {
            Some(url) => engine_debug!("Featured image for {}: {}", post_url, url),
            None => engine_debug!("No featured image found for {}", post_url),
        }
        found
    }
}
