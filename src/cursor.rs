//! Archive positions and the cursor state machine.
//!
//! An [`ArchiveIndex`] is a three-digit mixed-radix counter: page is the
//! least significant digit, series the most significant. The radix of each
//! digit is the live directory count at that level, which this module never
//! sees. The [`navigate`](crate::navigate) module compares the index against
//! the archive and hands back [`SequenceFlags`], one carry signal per level,
//! and [`advance`] uses only those.
//!
//! ```text
//! not last page                 → page + 1
//! last page, not last volume    → volume + 1, page 0
//! last page + volume, not last series → series + 1, volume 0, page 0
//! last of everything            → 0, 0, 0
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based position in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveIndex {
    pub series: usize,
    pub volume: usize,
    pub page: usize,
}

impl ArchiveIndex {
    /// First page of the first volume of the first series.
    pub const START: ArchiveIndex = ArchiveIndex::new(0, 0, 0);

    pub const fn new(series: usize, volume: usize, page: usize) -> Self {
        Self {
            series,
            volume,
            page,
        }
    }
}

impl fmt::Display for ArchiveIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "series {} / volume {} / page {}",
            self.series, self.volume, self.page
        )
    }
}

/// Carry signals for one resolved index. Derived per load, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequenceFlags {
    pub is_last_page_in_volume: bool,
    pub is_last_volume_in_series: bool,
    pub is_last_series: bool,
}

impl SequenceFlags {
    /// True when the index is the very last page of the archive.
    pub fn is_end_of_archive(&self) -> bool {
        self.is_last_page_in_volume && self.is_last_volume_in_series && self.is_last_series
    }
}

/// Compute the index to post after `current`.
pub fn advance(current: ArchiveIndex, flags: SequenceFlags) -> ArchiveIndex {
    if !flags.is_last_page_in_volume {
        return ArchiveIndex {
            page: current.page + 1,
            ..current
        };
    }
    if !flags.is_last_volume_in_series {
        return ArchiveIndex::new(current.series, current.volume + 1, 0);
    }
    if !flags.is_last_series {
        return ArchiveIndex::new(current.series + 1, 0, 0);
    }
    ArchiveIndex::START
}
