use std::path::{Path, PathBuf};

use engine_logging::engine_debug;
use migration_core::{mime_type_for, MediaId};

use crate::fetch::{fetch_bytes, FetchSettings};
use crate::filename::asset_filename;
use crate::wordpress::{MediaUpload, TargetSite};
use crate::TransferError;

/// Moves a featured image from the source CDN, through the local images
/// directory, into the target media library.
pub struct AssetTransfer {
    client: reqwest::Client,
    images_dir: PathBuf,
    enabled: bool,
    settings: FetchSettings,
}

impl AssetTransfer {
    pub fn new(
        client: reqwest::Client,
        images_dir: PathBuf,
        enabled: bool,
        settings: FetchSettings,
    ) -> Self {
        Self {
            client,
            images_dir,
            enabled,
            settings,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// `Ok(None)` when downloads are switched off.
    pub async fn download(
        &self,
        image_url: &str,
        slug: &str,
    ) -> Result<Option<PathBuf>, TransferError> {
        if !self.enabled {
            return Ok(None);
        }

        let output = fetch_bytes(
            &self.client,
            image_url,
            self.settings.download_timeout,
            self.settings.max_asset_bytes,
        )
        .await?;

        tokio::fs::create_dir_all(&self.images_dir).await?;
        let path = self.images_dir.join(asset_filename(slug, image_url));
        tokio::fs::write(&path, &output.bytes).await?;
        engine_debug!(
            "Downloaded {} bytes to {}",
            output.metadata.byte_len,
            path.display()
        );
        Ok(Some(path))
    }

    pub async fn upload(
        &self,
        site: &dyn TargetSite,
        path: &Path,
        title: &str,
    ) -> Result<MediaId, TransferError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let upload = MediaUpload {
            file_name,
            mime_type: mime_type_for(path),
            title: title.to_string(),
            bytes,
        };
        match site.upload_media(upload).await {
            Ok(id) => Ok(id),
            Err(err) => {
                if let Some(body) = err.response_body() {
                    engine_debug!("Response: {}", body);
                }
                Err(err.into())
            }
        }
    }
}
