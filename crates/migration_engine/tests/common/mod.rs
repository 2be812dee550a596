#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use migration_engine::{
    Credentials, FetchSettings, MediaUpload, MigrationConfig, PostRequest, SiteError, TargetSite,
};

/// In-memory target that records every call.
#[derive(Default)]
pub struct RecordingSite {
    pub uploads: Mutex<Vec<MediaUpload>>,
    pub posts: Mutex<Vec<PostRequest>>,
    pub fail_uploads: bool,
    pub panic_on_title: Option<String>,
}

impl RecordingSite {
    pub fn posts(&self) -> Vec<PostRequest> {
        self.posts.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<MediaUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl TargetSite for RecordingSite {
    async fn upload_media(&self, upload: MediaUpload) -> Result<u64, SiteError> {
        if self.fail_uploads {
            return Err(SiteError::HttpStatus {
                status: 500,
                body: "upload broke".into(),
            });
        }
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(upload);
        Ok(50 + uploads.len() as u64)
    }

    async fn create_post(&self, post: &PostRequest) -> Result<u64, SiteError> {
        if self.panic_on_title.as_deref() == Some(post.title.as_str()) {
            panic!("boom while creating {}", post.title);
        }
        let mut posts = self.posts.lock().unwrap();
        posts.push(post.clone());
        Ok(100 + posts.len() as u64)
    }
}

pub struct Item<'a> {
    pub title: &'a str,
    pub link: String,
    pub description: &'a str,
    pub content: &'a str,
    pub pub_date: &'a str,
}

pub fn rss(items: &[Item<'_>]) -> String {
    let body: String = items
        .iter()
        .map(|item| {
            format!(
                "<item><title>{}</title><link>{}</link><description>{}</description>\
                 <content:encoded><![CDATA[{}]]></content:encoded><pubDate>{}</pubDate></item>",
                item.title, item.link, item.description, item.content, item.pub_date
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
<channel><title>Blog</title><link>https://example.com/</link><description>d</description>{body}</channel>
</rss>"#
    )
}

pub fn config(server_uri: &str, output: &Path) -> MigrationConfig {
    MigrationConfig {
        source_url: server_uri.to_string(),
        feed_url: format!("{server_uri}/rss/"),
        site_url: server_uri.to_string(),
        api_base: format!("{server_uri}/wp-json/wp/v2"),
        credentials: Credentials {
            username: "editor".into(),
            password: "secret".into(),
        },
        images_dir: output.join("images"),
        report_file: output.join("migration_report.json"),
        download_images: true,
        import_as_draft: true,
        request_delay: Duration::ZERO,
        fetch: FetchSettings::default(),
    }
}
