use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use engine_logging::engine_debug;
use migration_core::{MediaId, PostId};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::config::Credentials;
use crate::fetch::FetchSettings;
use crate::SiteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Publish,
}

/// Body of a create-post call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub slug: String,
    pub date: String,
    pub status: PostStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<MediaId>,
}

/// A local file on its way to the media library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub title: String,
    pub bytes: Vec<u8>,
}

/// The write side of the target site.
#[async_trait]
pub trait TargetSite: Send + Sync {
    async fn upload_media(&self, upload: MediaUpload) -> Result<MediaId, SiteError>;

    async fn create_post(&self, post: &PostRequest) -> Result<PostId, SiteError>;
}

/// `GET /wp-json/` index.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiIndex {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespaces: Vec<String>,
}

/// `GET {api_base}/users/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub capabilities: HashMap<String, bool>,
}

#[derive(Deserialize)]
struct CreatedResource {
    id: u64,
}

#[derive(Clone)]
pub struct WordPressClient {
    http: reqwest::Client,
    site_url: String,
    api_base: String,
    credentials: Credentials,
    settings: FetchSettings,
}

impl fmt::Debug for WordPressClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordPressClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl WordPressClient {
    pub fn new(
        http: reqwest::Client,
        site_url: &str,
        api_base: &str,
        credentials: Credentials,
        settings: FetchSettings,
    ) -> Self {
        Self {
            http,
            site_url: site_url.trim_end_matches('/').to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            credentials,
            settings,
        }
    }

    pub fn endpoint(&self, path: &str) -> Result<reqwest::Url, SiteError> {
        let raw = format!("{}/{}", self.api_base, path.trim_start_matches('/'));
        reqwest::Url::parse(&raw).map_err(|err| SiteError::InvalidUrl(format!("{raw}: {err}")))
    }

    pub fn build_post_request(&self, post: &PostRequest) -> Result<reqwest::Request, SiteError> {
        self.http
            .post(self.endpoint("posts")?)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .timeout(self.settings.post_timeout)
            .json(post)
            .build()
            .map_err(|err| SiteError::InvalidUrl(err.to_string()))
    }

    /// Public REST index; no credentials are sent.
    pub async fn fetch_api_index(&self, timeout: Duration) -> Result<ApiIndex, SiteError> {
        let raw = format!("{}/wp-json/", self.site_url);
        let url =
            reqwest::Url::parse(&raw).map_err(|err| SiteError::InvalidUrl(format!("{raw}: {err}")))?;
        let response = self
            .http
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| SiteError::Network(err.to_string()))?;
        read_json(response).await
    }

    pub async fn current_user(&self, timeout: Duration) -> Result<CurrentUser, SiteError> {
        let response = self
            .http
            .get(self.endpoint("users/me")?)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| SiteError::Network(err.to_string()))?;
        read_json(response).await
    }
}

#[async_trait]
impl TargetSite for WordPressClient {
    async fn upload_media(&self, upload: MediaUpload) -> Result<MediaId, SiteError> {
        let disposition = format!("attachment; filename=\"{}\"", upload.file_name);
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(upload.mime_type)
            .map_err(|err| SiteError::InvalidResponse(err.to_string()))?;
        let form = Form::new().text("title", upload.title).part("file", part);

        let response = self
            .http
            .post(self.endpoint("media")?)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(CONTENT_DISPOSITION, disposition)
            .timeout(self.settings.upload_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|err| SiteError::Network(err.to_string()))?;

        let created: CreatedResource = read_json(response).await?;
        engine_debug!("Uploaded image to WordPress, media ID: {}", created.id);
        Ok(created.id)
    }

    async fn create_post(&self, post: &PostRequest) -> Result<PostId, SiteError> {
        let request = self.build_post_request(post)?;
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|err| SiteError::Network(err.to_string()))?;
        let created: CreatedResource = read_json(response).await?;
        Ok(created.id)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SiteError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SiteError::HttpStatus {
            status: status.as_u16(),
            body,
        });
    }
    let body = response
        .text()
        .await
        .map_err(|err| SiteError::Network(err.to_string()))?;
    serde_json::from_str(&body).map_err(|err| SiteError::InvalidResponse(err.to_string()))
}
