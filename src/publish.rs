//! Handing a prepared page to whatever posts it.
//!
//! Posting to a remote service is not part of this crate. A [`Publisher`]
//! receives the encoded buffer, its MIME type, alt text and aspect ratio,
//! and either accepts it or fails. The cursor only advances after a
//! successful hand-off, so a failed publish means the same page is tried
//! again next run.
//!
//! [`OutboxPublisher`] is the shipped implementation: it drops each post
//! into a directory for an external uploader to pick up.
//!
//! ```text
//! outbox/
//! ├── post-000-001-0013.jpg
//! └── post-000-001-0013.json   # {"alt_text": ..., "mime_type": ..., "aspect_ratio": ...}
//! ```

use crate::cursor::ArchiveIndex;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Post rejected: {0}")]
    Rejected(String),
}

/// Width:height of the source image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

/// The page image as it will be published.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub aspect_ratio: AspectRatio,
}

/// Everything a publisher gets for one post.
#[derive(Debug, Clone, Copy)]
pub struct Post<'a> {
    pub index: ArchiveIndex,
    pub image: &'a LoadedImage,
    pub alt_text: &'a str,
}

/// Proof of a successful hand-off, e.g. a remote post id or a file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub reference: String,
}

pub trait Publisher {
    fn publish(&self, post: &Post<'_>) -> Result<Receipt, PublishError>;
}

/// Writes each post as an image file plus a JSON sidecar into a directory.
#[derive(Debug, Clone)]
pub struct OutboxPublisher {
    dir: PathBuf,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    alt_text: &'a str,
    mime_type: &'a str,
    aspect_ratio: AspectRatio,
    index: ArchiveIndex,
}

impl OutboxPublisher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Publisher for OutboxPublisher {
    fn publish(&self, post: &Post<'_>) -> Result<Receipt, PublishError> {
        fs::create_dir_all(&self.dir)?;
        let stem = format!(
            "post-{:03}-{:03}-{:04}",
            post.index.series, post.index.volume, post.index.page
        );

        let image_path = self
            .dir
            .join(format!("{stem}.{}", extension_for(post.image.mime_type)));
        fs::write(&image_path, &post.image.bytes)?;

        let sidecar = Sidecar {
            alt_text: post.alt_text,
            mime_type: post.image.mime_type,
            aspect_ratio: post.image.aspect_ratio,
            index: post.index,
        };
        fs::write(
            self.dir.join(format!("{stem}.json")),
            serde_json::to_string_pretty(&sidecar)?,
        )?;

        Ok(Receipt {
            reference: image_path.to_string_lossy().into_owned(),
        })
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/tiff" => "tiff",
        _ => "bin",
    }
}
