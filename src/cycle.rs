//! One complete run: load cursor → resolve → encode → publish → advance → save.
//!
//! ```text
//! CursorStore::load ──► Archive::resolve ──► read page ──► encode_to_fit
//!                                                               │
//! CursorStore::save ◄── cursor::advance ◄── Publisher::publish ◄┘
//! ```
//!
//! Every step before the publish is free of side effects, so any failure
//! there leaves the cursor where it was. After a successful publish the only
//! remaining failure is the save; that one is reported as
//! [`CycleError::CursorNotAdvanced`], because the post has already happened
//! and an operator has to move the cursor by hand.

use crate::cursor::{self, ArchiveIndex};
use crate::imaging::{self, BackendError, FitConfig, FitOutcome, ImageBackend};
use crate::metadata::PostMetadata;
use crate::navigate::{Archive, NavigateError, Resolved};
use crate::publish::{AspectRatio, LoadedImage, Post, PublishError, Publisher, Receipt};
use crate::store::{CursorStore, StoreError};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CycleError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Navigate(#[from] NavigateError),
    #[error("Cannot read page {path}: {source}")]
    ReadPage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot process page {path}: {source}")]
    Imaging {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Publishing failed, cursor left at {index}: {source}")]
    Publish {
        index: ArchiveIndex,
        #[source]
        source: PublishError,
    },
    #[error(
        "Page {posted} WAS POSTED ({receipt}) but the cursor could not be saved: {source}. \
         Set the cursor to {next} by hand (`pagecast set {} {} {}`) before the next run.",
        .next.series, .next.volume, .next.page
    )]
    CursorNotAdvanced {
        posted: ArchiveIndex,
        next: ArchiveIndex,
        receipt: String,
        #[source]
        source: StoreError,
    },
}

/// A page resolved and encoded, ready to hand to a publisher.
#[derive(Debug, Clone)]
pub struct PreparedPost {
    pub resolved: Resolved,
    pub image: LoadedImage,
    pub alt_text: String,
    pub outcome: FitOutcome,
    pub source_size: usize,
    pub attempts: usize,
}

impl PreparedPost {
    pub fn metadata(&self) -> &PostMetadata {
        &self.resolved.metadata
    }

    /// Where the cursor goes once this page has been published.
    pub fn next_index(&self) -> ArchiveIndex {
        cursor::advance(self.resolved.index, self.resolved.flags)
    }
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub prepared: PreparedPost,
    pub receipt: Receipt,
    pub next: ArchiveIndex,
}

/// The collaborators one run needs.
pub struct Runner<'a, B: ImageBackend, P: Publisher> {
    pub archive: &'a Archive,
    pub store: &'a CursorStore,
    pub backend: &'a B,
    pub publisher: &'a P,
    pub fit: FitConfig,
}

impl<B: ImageBackend, P: Publisher> Runner<'_, B, P> {
    /// Resolve and encode the page at `index`. No side effects.
    pub fn prepare(&self, index: ArchiveIndex) -> Result<PreparedPost, CycleError> {
        prepare(self.archive, self.backend, &self.fit, index)
    }

    /// Run one full cycle against the persisted cursor.
    pub fn run(&self) -> Result<CycleReport, CycleError> {
        let index = self.store.load()?;
        info!(%index, cursor = %self.store.path().display(), "loaded cursor");

        let prepared = self.prepare(index)?;

        let post = Post {
            index,
            image: &prepared.image,
            alt_text: &prepared.alt_text,
        };
        let receipt = self
            .publisher
            .publish(&post)
            .map_err(|source| CycleError::Publish { index, source })?;
        info!(%index, reference = %receipt.reference, "published page");

        let next = prepared.next_index();
        self.store
            .save(next)
            .map_err(|source| CycleError::CursorNotAdvanced {
                posted: index,
                next,
                receipt: receipt.reference.clone(),
                source,
            })?;
        info!(%next, "cursor advanced");

        Ok(CycleReport {
            prepared,
            receipt,
            next,
        })
    }
}

/// Resolve `index`, read the page and encode it to fit `fit.byte_budget`.
pub fn prepare<B: ImageBackend>(
    archive: &Archive,
    backend: &B,
    fit: &FitConfig,
    index: ArchiveIndex,
) -> Result<PreparedPost, CycleError> {
    let resolved = archive.resolve(index)?;
    info!(
        %index,
        path = %resolved.path.display(),
        last_page = resolved.flags.is_last_page_in_volume,
        last_volume = resolved.flags.is_last_volume_in_series,
        last_series = resolved.flags.is_last_series,
        "resolved page"
    );

    let source = std::fs::read(&resolved.path).map_err(|source| CycleError::ReadPage {
        path: resolved.path.clone(),
        source,
    })?;
    let source_size = source.len();
    let imaging_error = |source| CycleError::Imaging {
        path: resolved.path.clone(),
        source,
    };

    let (width, height) = imaging::get_dimensions(backend, &source).map_err(imaging_error)?;
    let encoded =
        imaging::encode_to_fit(backend, source, (width, height), fit).map_err(imaging_error)?;
    info!(
        source_size,
        size = encoded.bytes.len(),
        outcome = ?encoded.outcome,
        attempts = encoded.attempts.len(),
        "encoded page"
    );

    let alt_text = resolved.metadata.alt_text();
    Ok(PreparedPost {
        image: LoadedImage {
            bytes: encoded.bytes,
            mime_type: encoded.mime_type,
            aspect_ratio: AspectRatio { width, height },
        },
        alt_text,
        outcome: encoded.outcome,
        source_size,
        attempts: encoded.attempts.len(),
        resolved,
    })
}
