//! Human-readable description of a resolved page.
//!
//! Volumes and pages are 1-based here; everything upstream is zero-based.

use crate::cursor::ArchiveIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMetadata {
    pub series_name: String,
    /// 1-based.
    pub volume_number: usize,
    /// 1-based.
    pub page_number: usize,
}

impl PostMetadata {
    pub fn for_index(series_name: impl Into<String>, index: ArchiveIndex) -> Self {
        Self {
            series_name: series_name.into(),
            volume_number: index.volume + 1,
            page_number: index.page + 1,
        }
    }

    /// Alt text attached to the published image.
    ///
    /// ```text
    /// Nausicaa - Volume 2, Page 14
    /// ```
    pub fn alt_text(&self) -> String {
        format!(
            "{} - Volume {}, Page {}",
            self.series_name, self.volume_number, self.page_number
        )
    }
}
