use chrono::{DateTime, SecondsFormat};

/// Title used for error attribution when a feed item has none.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// One item as it appeared in the source feed. Fields keep their source format.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawEntry {
    pub title: String,
    pub content: String,
    pub summary: String,
    pub published: String,
    pub link: String,
}

impl RawEntry {
    /// Title for log lines and the error list.
    pub fn display_title(&self) -> &str {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            UNKNOWN_TITLE
        } else {
            trimmed
        }
    }

    pub fn normalize(&self) -> NormalizedPost {
        NormalizedPost {
            title: self.title.clone(),
            content: self.content.clone(),
            excerpt: self.summary.clone(),
            date: normalize_date(&self.published),
            slug: derive_slug(&self.link),
            link: self.link.clone(),
        }
    }
}

/// Post as it will be sent to the target, plus the source link it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPost {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub date: String,
    pub slug: String,
    pub link: String,
}

/// Last path component of `link` once trailing `/` are stripped.
///
/// `https://example.com/2021/05/10/my-first-post/` -> `my-first-post`.
pub fn derive_slug(link: &str) -> String {
    link.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// RFC 2822 / RFC 3339 timestamps become RFC 3339 (seconds precision, offset kept).
/// Anything else is passed through untouched.
pub fn normalize_date(published: &str) -> String {
    let trimmed = published.trim();
    let parsed = DateTime::parse_from_rfc2822(trimmed)
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed));
    match parsed {
        Ok(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, false),
        Err(_) => published.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_ignores_trailing_separators() {
        assert_eq!(derive_slug("https://example.com/a/b/post///"), "post");
        assert_eq!(derive_slug("https://example.com/a/b/post"), "post");
    }

    #[test]
    fn slug_of_empty_link_is_empty() {
        assert_eq!(derive_slug(""), "");
    }

    #[test]
    fn rfc2822_date_becomes_rfc3339() {
        assert_eq!(
            normalize_date("Mon, 10 May 2021 00:00:00 GMT"),
            "2021-05-10T00:00:00+00:00"
        );
    }

    #[test]
    fn rfc3339_date_keeps_offset() {
        assert_eq!(
            normalize_date("2021-05-10T08:30:00+02:00"),
            "2021-05-10T08:30:00+02:00"
        );
    }

    #[test]
    fn unparseable_date_passes_through() {
        assert_eq!(normalize_date("last tuesday"), "last tuesday");
        assert_eq!(normalize_date(""), "");
    }

    #[test]
    fn missing_title_displays_as_unknown() {
        let entry = RawEntry::default();
        assert_eq!(entry.display_title(), UNKNOWN_TITLE);
    }
}
