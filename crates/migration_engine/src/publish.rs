use engine_logging::engine_debug;
use migration_core::{MediaId, NormalizedPost, PostId};

use crate::wordpress::{PostRequest, PostStatus, TargetSite};
use crate::SiteError;

/// Turns normalized posts into create-post calls against a [`TargetSite`].
#[derive(Debug, Clone, Copy)]
pub struct PostPublisher {
    status: PostStatus,
}

impl PostPublisher {
    pub fn new(import_as_draft: bool) -> Self {
        let status = if import_as_draft {
            PostStatus::Draft
        } else {
            PostStatus::Publish
        };
        Self { status }
    }

    pub fn status(&self) -> PostStatus {
        self.status
    }

    pub fn build_request(&self, post: &NormalizedPost, media: Option<MediaId>) -> PostRequest {
        PostRequest {
            title: post.title.clone(),
            content: post.content.clone(),
            excerpt: post.excerpt.clone(),
            slug: post.slug.clone(),
            date: post.date.clone(),
            status: self.status,
            featured_media: media,
        }
    }

    /// One attempt, no retries.
    pub async fn create(
        &self,
        site: &dyn TargetSite,
        post: &NormalizedPost,
        media: Option<MediaId>,
    ) -> Result<PostId, SiteError> {
        let request = self.build_request(post, media);
        let result = site.create_post(&request).await;
        if let Err(err) = &result {
            if let Some(body) = err.response_body() {
                engine_debug!("Response: {}", body);
            }
        }
        result
    }
}
