//! Resolving an [`ArchiveIndex`] against the live archive.
//!
//! ## Layout
//!
//! ```text
//! archive/                     # archive_root
//! ├── 01-nausicaa/             # series (catalog position 0)
//! │   ├── vol-01/              # volume 0
//! │   │   ├── 001.jpg          # page 0
//! │   │   └── 002.jpg          # page 1
//! │   └── vol-02/
//! │       └── 001.jpg
//! └── 02-akira/                # series (catalog position 1)
//!     └── vol-01/
//!         └── 001.jpg
//! ```
//!
//! Every resolve lists the three levels again. The archive may have grown
//! since the cursor was saved; if it has shrunk below the cursor the resolve
//! fails with [`NavigateError::OutOfBounds`] and nothing is advanced.
//!
//! Nothing here writes to the archive.

use crate::catalog::SeriesCatalog;
use crate::cursor::{ArchiveIndex, SequenceFlags};
use crate::metadata::PostMetadata;
use crate::scan::{self, EntryKind, ScanError};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigateError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Cursor {level} index {index} is out of bounds ({count} {level} entries on disk)")]
    OutOfBounds {
        level: Level,
        index: usize,
        count: usize,
    },
    #[error("Series catalog names {catalog} series but the archive has {on_disk} series directories")]
    CatalogMismatch { catalog: usize, on_disk: usize },
}

/// One of the three archive levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Series,
    Volume,
    Page,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Series => "series",
            Level::Volume => "volume",
            Level::Page => "page",
        })
    }
}

/// Live entry counts seen while resolving one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCounts {
    pub series: usize,
    pub volumes: usize,
    pub pages: usize,
}

/// Everything the rest of a run needs about the page under the cursor.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub index: ArchiveIndex,
    pub path: PathBuf,
    pub metadata: PostMetadata,
    pub flags: SequenceFlags,
    pub counts: LevelCounts,
}

/// A read-only view of an archive directory plus its series catalog.
#[derive(Debug, Clone)]
pub struct Archive {
    root: PathBuf,
    catalog: SeriesCatalog,
}

impl Archive {
    pub fn new(root: impl Into<PathBuf>, catalog: SeriesCatalog) -> Self {
        Self {
            root: root.into(),
            catalog,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn catalog(&self) -> &SeriesCatalog {
        &self.catalog
    }

    /// Resolve `index` to a page file, its display metadata and carry flags.
    pub fn resolve(&self, index: ArchiveIndex) -> Result<Resolved, NavigateError> {
        let series = scan::list_sorted(&self.root, EntryKind::Directories)?;
        check_bounds(Level::Series, index.series, series.len())?;
        let series_dir = self.root.join(&series[index.series]);

        let volumes = scan::list_sorted(&series_dir, EntryKind::Directories)?;
        check_bounds(Level::Volume, index.volume, volumes.len())?;
        let volume_dir = series_dir.join(&volumes[index.volume]);

        let pages = scan::list_sorted(&volume_dir, EntryKind::Files)?;
        check_bounds(Level::Page, index.page, pages.len())?;

        self.catalog
            .ensure_matches(series.len())
            .map_err(|(catalog, on_disk)| NavigateError::CatalogMismatch { catalog, on_disk })?;
        let series_name = match self.catalog.name(index.series) {
            Some(name) => name.to_owned(),
            None => series[index.series].to_string_lossy().into_owned(),
        };

        let counts = LevelCounts {
            series: series.len(),
            volumes: volumes.len(),
            pages: pages.len(),
        };

        Ok(Resolved {
            index,
            path: volume_dir.join(&pages[index.page]),
            metadata: PostMetadata::for_index(series_name, index),
            flags: SequenceFlags {
                is_last_page_in_volume: index.page == counts.pages - 1,
                is_last_volume_in_series: index.volume == counts.volumes - 1,
                is_last_series: index.series == counts.series - 1,
            },
            counts,
        })
    }

    /// List every level of the archive.
    ///
    /// Used by `check` and tests; a run only ever lists the path it resolves.
    pub fn survey(&self) -> Result<ArchiveSurvey, NavigateError> {
        let mut series = Vec::new();
        for series_name in scan::list_sorted(&self.root, EntryKind::Directories)? {
            let series_dir = self.root.join(&series_name);
            let mut volumes = Vec::new();
            for volume_name in scan::list_sorted(&series_dir, EntryKind::Directories)? {
                let pages = scan::list_sorted(&series_dir.join(&volume_name), EntryKind::Files)?;
                volumes.push(VolumeSurvey {
                    name: volume_name,
                    pages,
                });
            }
            series.push(SeriesSurvey {
                name: series_name,
                volumes,
            });
        }
        Ok(ArchiveSurvey { series })
    }
}

fn check_bounds(level: Level, index: usize, count: usize) -> Result<(), NavigateError> {
    if index < count {
        Ok(())
    } else {
        Err(NavigateError::OutOfBounds {
            level,
            index,
            count,
        })
    }
}

/// Sorted names at every level of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSurvey {
    pub series: Vec<SeriesSurvey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSurvey {
    pub name: OsString,
    pub volumes: Vec<VolumeSurvey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeSurvey {
    pub name: OsString,
    pub pages: Vec<OsString>,
}

impl ArchiveSurvey {
    /// Page counts as `shape[series][volume]`.
    pub fn shape(&self) -> Vec<Vec<usize>> {
        self.series
            .iter()
            .map(|s| s.volumes.iter().map(|v| v.pages.len()).collect())
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.shape().iter().flatten().sum()
    }
}
