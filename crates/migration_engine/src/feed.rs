use engine_logging::{engine_info, engine_warn};
use feed_rs::model::Entry;
use migration_core::RawEntry;

use crate::fetch::{fetch_bytes, FetchSettings};
use crate::FeedError;

/// Entries recovered from the feed, plus the parser complaint if strict parsing failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFeed {
    pub entries: Vec<RawEntry>,
    pub anomaly: Option<String>,
}

pub struct FeedReader {
    client: reqwest::Client,
    url: String,
    settings: FetchSettings,
}

impl FeedReader {
    pub fn new(client: reqwest::Client, url: impl Into<String>, settings: FetchSettings) -> Self {
        Self {
            client,
            url: url.into(),
            settings,
        }
    }

    /// Fetch and parse the feed. Transport errors and unparseable bodies are fatal.
    pub async fn fetch(&self) -> Result<ParsedFeed, FeedError> {
        engine_info!("Fetching RSS feed from {}", self.url);
        let output = fetch_bytes(
            &self.client,
            &self.url,
            self.settings.feed_timeout,
            self.settings.max_page_bytes,
        )
        .await?;

        let parsed = parse_feed(&output.bytes)?;
        if let Some(anomaly) = &parsed.anomaly {
            engine_warn!("RSS feed has issues: {}", anomaly);
        }
        engine_info!("Found {} posts in RSS feed", parsed.entries.len());
        Ok(parsed)
    }
}

const DEFAULT_RSS_ROOT: &str =
    r#"<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">"#;
const DEFAULT_ATOM_ROOT: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">"#;

/// Strict RSS 2.0 first, then the lenient multi-format parser, then a
/// per-item salvage of whatever complete items the body still holds.
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed, FeedError> {
    let strict_err = match rss::Channel::read_from(bytes) {
        Ok(channel) => {
            return Ok(ParsedFeed {
                entries: channel.items().iter().map(entry_from_rss).collect(),
                anomaly: None,
            })
        }
        Err(err) => err.to_string(),
    };

    let lenient_err = match feed_rs::parser::parse(bytes) {
        Ok(feed) => {
            return Ok(ParsedFeed {
                entries: feed.entries.iter().map(entry_from_lenient).collect(),
                anomaly: Some(strict_err),
            })
        }
        Err(err) => err.to_string(),
    };

    let text = String::from_utf8_lossy(bytes);
    let (entries, found) = salvage_entries(&text);
    if entries.is_empty() {
        return Err(FeedError::Parse(format!("{strict_err}; {lenient_err}")));
    }
    Ok(ParsedFeed {
        anomaly: Some(format!(
            "{strict_err} (recovered {} of {found} items)",
            entries.len()
        )),
        entries,
    })
}

/// Re-parse every complete `<item>` (or Atom `<entry>`) on its own, inside the
/// document's original root tag. Broken items are dropped. Returns the
/// recovered entries and the number of complete items seen.
fn salvage_entries(text: &str) -> (Vec<RawEntry>, usize) {
    let items = element_chunks(text, "item");
    if !items.is_empty() {
        let root = open_tag(text, "rss").unwrap_or(DEFAULT_RSS_ROOT);
        let entries = items
            .iter()
            .filter_map(|item| {
                let doc = format!(
                    "{root}<channel><title></title><link></link><description></description>{item}</channel></rss>"
                );
                let channel = rss::Channel::read_from(doc.as_bytes()).ok()?;
                channel.items().first().map(entry_from_rss)
            })
            .collect();
        return (entries, items.len());
    }

    let atom_entries = element_chunks(text, "entry");
    let root = open_tag(text, "feed").unwrap_or(DEFAULT_ATOM_ROOT);
    let entries = atom_entries
        .iter()
        .filter_map(|entry| {
            let doc = format!("{root}{entry}</feed>");
            let feed = feed_rs::parser::parse(doc.as_bytes()).ok()?;
            feed.entries.first().map(entry_from_lenient)
        })
        .collect();
    (entries, atom_entries.len())
}

/// Every `<name ...>...</name>` span, in document order. A span left open at
/// the end of the text is not returned.
fn element_chunks<'a>(text: &'a str, name: &str) -> Vec<&'a str> {
    let open = format!("<{name}");
    let close = format!("</{name}>");
    let mut chunks = Vec::new();
    let mut rest = text;
    while let Some(start) = find_open(rest, &open) {
        let from_open = &rest[start..];
        let Some(end) = from_open.find(&close) else {
            break;
        };
        let span_end = end + close.len();
        chunks.push(&from_open[..span_end]);
        rest = &from_open[span_end..];
    }
    chunks
}

/// Opening tag of the first `name` element, attributes included.
fn open_tag<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let start = find_open(text, &format!("<{name}"))?;
    let end = text[start..].find('>')?;
    Some(&text[start..=start + end])
}

/// Position of `<name` followed by `>`, `/` or whitespace, so `<item` never
/// matches `<items`.
fn find_open(text: &str, open: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(idx) = text[from..].find(open) {
        let at = from + idx;
        match text[at + open.len()..].chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_whitespace() => return Some(at),
            Some(_) => from = at + open.len(),
            None => return None,
        }
    }
    None
}

fn entry_from_rss(item: &rss::Item) -> RawEntry {
    RawEntry {
        title: item.title().unwrap_or_default().to_string(),
        content: item.content().unwrap_or_default().to_string(),
        summary: item.description().unwrap_or_default().to_string(),
        published: item.pub_date().unwrap_or_default().to_string(),
        link: item.link().unwrap_or_default().trim().to_string(),
    }
}

fn entry_from_lenient(entry: &Entry) -> RawEntry {
    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.trim().to_string())
        .unwrap_or_default();
    RawEntry {
        title: entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default(),
        content: entry
            .content
            .as_ref()
            .and_then(|c| c.body.clone())
            .unwrap_or_default(),
        summary: entry
            .summary
            .as_ref()
            .map(|s| s.content.clone())
            .unwrap_or_default(),
        published: entry
            .published
            .or(entry.updated)
            .map(|dt| dt.to_rfc2822())
            .unwrap_or_default(),
        link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Blog</title>
    <link>https://example.com/</link>
    <description>d</description>
    <item>
      <title>My First Post</title>
      <link>https://example.com/2021/05/10/my-first-post/</link>
      <description>Hello</description>
      <content:encoded><![CDATA[<p>Hi</p>]]></content:encoded>
      <pubDate>Mon, 10 May 2021 00:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Second</title>
      <link>https://example.com/second/</link>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Blog</title>
  <id>urn:uuid:feed</id>
  <updated>2021-05-10T00:00:00Z</updated>
  <entry>
    <title>Atom Post</title>
    <id>urn:uuid:1</id>
    <link rel="alternate" href="https://example.com/atom-post/"/>
    <updated>2021-05-10T00:00:00Z</updated>
    <summary>Short</summary>
  </entry>
</feed>"#;

    #[test]
    fn strict_rss_keeps_source_fields_and_order() {
        let parsed = parse_feed(RSS.as_bytes()).unwrap();
        assert!(parsed.anomaly.is_none());
        assert_eq!(parsed.entries.len(), 2);

        let first = &parsed.entries[0];
        assert_eq!(first.title, "My First Post");
        assert_eq!(first.content, "<p>Hi</p>");
        assert_eq!(first.summary, "Hello");
        assert_eq!(first.published, "Mon, 10 May 2021 00:00:00 GMT");
        assert_eq!(first.link, "https://example.com/2021/05/10/my-first-post/");

        let second = &parsed.entries[1];
        assert_eq!(second.title, "Second");
        assert!(second.content.is_empty());
        assert!(second.published.is_empty());
    }

    #[test]
    fn non_rss_feed_is_recovered_with_anomaly() {
        let parsed = parse_feed(ATOM.as_bytes()).unwrap();
        assert!(parsed.anomaly.is_some());
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].title, "Atom Post");
        assert_eq!(parsed.entries[0].link, "https://example.com/atom-post/");
        assert_eq!(parsed.entries[0].summary, "Short");
        assert!(!parsed.entries[0].published.is_empty());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = parse_feed(b"definitely not a feed").unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[test]
    fn feed_cut_before_channel_close_keeps_all_items() {
        let parsed = parse_feed(&RSS.as_bytes()[..RSS.len() - 20]).unwrap();

        let anomaly = parsed.anomaly.expect("salvage is reported");
        assert!(anomaly.contains("recovered 2 of 2 items"), "{anomaly}");
        let titles: Vec<&str> = parsed.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["My First Post", "Second"]);
        assert_eq!(parsed.entries[0].content, "<p>Hi</p>");
    }

    #[test]
    fn feed_cut_inside_item_keeps_earlier_items() {
        let cut = RSS.find("<title>Second</title>").unwrap();
        let parsed = parse_feed(&RSS.as_bytes()[..cut]).unwrap();

        assert!(parsed.anomaly.is_some());
        assert_eq!(parsed.entries[0].title, "My First Post");
        assert_eq!(
            parsed.entries[0].link,
            "https://example.com/2021/05/10/my-first-post/"
        );
    }

    #[test]
    fn item_with_mismatched_tag_is_dropped_and_rest_kept() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Blog</title><link>https://example.com/</link><description>d</description>
<item><title>Broken</title><description>x</description><p>oops</item>
<item><title>Fine</title><link>https://example.com/fine/</link></item>
</channel></rss>"#;
        let parsed = parse_feed(xml.as_bytes()).unwrap();

        assert!(parsed.anomaly.is_some());
        let titles: Vec<&str> = parsed.entries.iter().map(|e| e.title.as_str()).collect();
        assert!(titles.contains(&"Fine"), "got {titles:?}");
        assert!(!titles.contains(&"Broken"));
    }

    #[test]
    fn truncated_atom_feed_keeps_complete_entries() {
        let cut = ATOM.find("</feed>").unwrap();
        let parsed = parse_feed(&ATOM.as_bytes()[..cut]).unwrap();
        assert_eq!(parsed.entries[0].title, "Atom Post");
        assert!(parsed.anomaly.is_some());
    }

    #[test]
    fn chunks_ignore_longer_tag_names_and_open_tail() {
        let text = "<items>x</items><item>a</item><item >b</item><item>c";
        assert_eq!(
            element_chunks(text, "item"),
            vec!["<item>a</item>", "<item >b</item>"]
        );
        assert_eq!(
            open_tag(r#"<?xml?><rss version="2.0" xmlns:a="u"><channel>"#, "rss"),
            Some(r#"<rss version="2.0" xmlns:a="u">"#)
        );
    }

    #[test]
    fn empty_channel_is_not_an_error() {
        let xml = r#"<rss version="2.0"><channel><title>t</title><link>l</link><description>d</description></channel></rss>"#;
        let parsed = parse_feed(xml.as_bytes()).unwrap();
        assert!(parsed.entries.is_empty());
        assert!(parsed.anomaly.is_none());
    }
}
