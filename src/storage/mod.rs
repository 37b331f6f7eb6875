//! Local-disk store for staff profile images. One image per staff member,
//! keyed by staff_id with overwrite; files are served publicly under the
//! configured prefix by the static-file layer.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Image is {size} bytes; the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub struct ImageStore {
    dir: PathBuf,
    public_prefix: String,
    max_bytes: usize,
}

impl ImageStore {
    pub fn from_config() -> Self {
        let storage = &config::config().storage;
        Self {
            dir: PathBuf::from(&storage.image_dir),
            public_prefix: storage.public_prefix.clone(),
            max_bytes: storage.max_image_bytes,
        }
    }

    pub fn new(dir: impl Into<PathBuf>, public_prefix: impl Into<String>, max_bytes: usize) -> Self {
        Self { dir: dir.into(), public_prefix: public_prefix.into(), max_bytes }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store an image for a staff member, replacing any previous one. The
    /// size ceiling is enforced before any byte hits the disk. Returns the
    /// public URL path for the stored file.
    pub async fn store(
        &self,
        staff_id: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        if bytes.len() > self.max_bytes {
            return Err(StorageError::TooLarge { size: bytes.len(), max: self.max_bytes });
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = format!("{}.{}", staff_id, extension_for(content_type));

        // Overwrite keyed on staff_id: drop any image stored under a
        // different extension first so only one file per member survives.
        for ext in EXTENSIONS {
            let stale = self.dir.join(format!("{}.{}", staff_id, ext));
            if stale.file_name() != Path::new(&filename).file_name() {
                let _ = tokio::fs::remove_file(&stale).await;
            }
        }

        tokio::fs::write(self.dir.join(&filename), bytes).await?;
        tracing::info!(staff_id = %staff_id, bytes = bytes.len(), "Stored profile image");

        Ok(format!("{}/{}", self.public_prefix, filename))
    }
}

const EXTENSIONS: &[&str] = &["jpg", "png", "webp"];

fn extension_for(content_type: Option<&str>) -> &'static str {
    match content_type {
        Some("image/png") => "png",
        Some("image/webp") => "webp",
        _ => "jpg",
    }
}
