//! Archive health report for `pagecast check`.
//!
//! A run only lists the path it resolves, so problems elsewhere in the tree
//! surface weeks later when the cursor reaches them. `check` walks the whole
//! archive once and reports what a run would trip over:
//!
//! - catalog length differs from the number of series directories
//! - empty series or volumes, which a run would report as out of bounds
//! - names whose byte-wise order contradicts their embedded numbers
//!
//! It also reports whether the current cursor resolves.

use crate::cursor::ArchiveIndex;
use crate::naming::{self, OrderingWarning};
use crate::navigate::{Archive, Level, NavigateError};
use crate::store::StoreError;
use std::ffi::OsStr;
use std::io;

/// Where in the archive an ordering problem was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MisorderedNames {
    /// Level of the entries being compared.
    pub level: Level,
    /// Directory the entries live in, relative to the archive root ("" for series).
    pub parent: String,
    pub warning: OrderingWarning,
}

/// An empty container: a series with no volumes or a volume with no pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyContainer {
    pub level: Level,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorHealth {
    /// No cursor record exists yet.
    Missing(String),
    /// The record exists but could not be read or parsed.
    Unreadable(String),
    Resolves(ArchiveIndex),
    Broken { index: ArchiveIndex, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub catalog_len: usize,
    pub shape: Vec<Vec<usize>>,
    pub series_names: Vec<String>,
    pub empty: Vec<EmptyContainer>,
    pub misordered: Vec<MisorderedNames>,
    pub cursor: Option<CursorHealth>,
}

impl CheckReport {
    pub fn total_pages(&self) -> usize {
        self.shape.iter().flatten().sum()
    }

    pub fn catalog_matches(&self) -> bool {
        self.catalog_len == self.shape.len()
    }

    /// Problems that will stop a run once the cursor reaches them.
    pub fn is_healthy(&self) -> bool {
        self.catalog_matches()
            && self.empty.is_empty()
            && !matches!(
                self.cursor,
                Some(
                    CursorHealth::Missing(_)
                        | CursorHealth::Unreadable(_)
                        | CursorHealth::Broken { .. }
                )
            )
    }
}

/// Survey `archive` and collect everything worth warning about.
///
/// `cursor` is the result of loading the cursor record, if the caller has
/// one; its error is reported rather than propagated.
///
/// Names are converted lossily for the report; they are only displayed.
pub fn check(
    archive: &Archive,
    cursor: Option<Result<ArchiveIndex, StoreError>>,
) -> Result<CheckReport, NavigateError> {
    let survey = archive.survey()?;

    let mut misordered = Vec::new();
    let mut empty = Vec::new();
    let series_names = display_names(survey.series.iter().map(|s| s.name.as_os_str()));
    collect(&mut misordered, Level::Series, "", &series_names);

    for (series, series_name) in survey.series.iter().zip(&series_names) {
        if series.volumes.is_empty() {
            empty.push(EmptyContainer {
                level: Level::Series,
                path: series_name.clone(),
            });
        }
        let volume_names = display_names(series.volumes.iter().map(|v| v.name.as_os_str()));
        collect(&mut misordered, Level::Volume, series_name, &volume_names);

        for (volume, volume_name) in series.volumes.iter().zip(&volume_names) {
            let parent = format!("{series_name}/{volume_name}");
            if volume.pages.is_empty() {
                empty.push(EmptyContainer {
                    level: Level::Volume,
                    path: parent.clone(),
                });
            }
            let page_names = display_names(volume.pages.iter().map(|p| p.as_os_str()));
            collect(&mut misordered, Level::Page, &parent, &page_names);
        }
    }

    let cursor = cursor.map(|loaded| match loaded {
        Err(e) if is_not_found(&e) => CursorHealth::Missing(e.to_string()),
        Err(e) => CursorHealth::Unreadable(e.to_string()),
        Ok(index) => match archive.resolve(index) {
            Ok(_) => CursorHealth::Resolves(index),
            Err(e) => CursorHealth::Broken {
                index,
                reason: e.to_string(),
            },
        },
    });

    Ok(CheckReport {
        catalog_len: archive.catalog().len(),
        shape: survey.shape(),
        series_names,
        empty,
        misordered,
        cursor,
    })
}

fn display_names<'a>(names: impl Iterator<Item = &'a OsStr>) -> Vec<String> {
    names.map(|n| n.to_string_lossy().into_owned()).collect()
}

fn is_not_found(e: &StoreError) -> bool {
    matches!(e, StoreError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
}

fn collect(out: &mut Vec<MisorderedNames>, level: Level, parent: &str, names: &[String]) {
    out.extend(
        naming::ordering_warnings(names)
            .into_iter()
            .map(|warning| MisorderedNames {
                level,
                parent: parent.to_string(),
                warning,
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CursorStore;
    use crate::test_helpers::*;
    use std::fs;

    #[test]
    fn clean_archive() {
        let tmp = build_archive(&[&[3, 2], &[1]]);
        let archive = Archive::new(tmp.path(), catalog_of(2));

        let report = check(&archive, Some(Ok(ArchiveIndex::new(1, 0, 0)))).unwrap();
        assert_eq!(report.shape, vec![vec![3, 2], vec![1]]);
        assert_eq!(report.total_pages(), 6);
        assert!(report.catalog_matches());
        assert!(report.misordered.is_empty());
        assert!(report.empty.is_empty());
        assert_eq!(
            report.cursor,
            Some(CursorHealth::Resolves(ArchiveIndex::new(1, 0, 0)))
        );
        assert!(report.is_healthy());
    }

    #[test]
    fn catalog_length_mismatch() {
        let tmp = build_archive(&[&[1], &[1], &[1]]);
        let archive = Archive::new(tmp.path(), catalog_of(2));

        let report = check(&archive, None).unwrap();
        assert_eq!(report.catalog_len, 2);
        assert!(!report.catalog_matches());
        assert!(!report.is_healthy());
    }

    #[test]
    fn unpadded_pages_are_reported() {
        let tmp = build_archive(&[&[0]]);
        let volume = tmp.path().join("series-00/vol-00");
        for name in ["page1.jpg", "page10.jpg", "page2.jpg"] {
            write_page(&volume, name);
        }
        let archive = Archive::new(tmp.path(), catalog_of(1));

        let report = check(&archive, None).unwrap();
        assert_eq!(report.misordered.len(), 1);
        let found = &report.misordered[0];
        assert_eq!(found.level, Level::Page);
        assert_eq!(found.parent, "series-00/vol-00");
        assert_eq!(found.warning.earlier, "page10.jpg");
        assert_eq!(found.warning.later, "page2.jpg");
        // Ordering is advisory
        assert!(report.is_healthy());
    }

    #[test]
    fn unpadded_volumes_are_reported() {
        let tmp = build_archive(&[&[]]);
        for name in ["vol-1", "vol-10", "vol-9"] {
            let dir = tmp.path().join("series-00").join(name);
            fs::create_dir_all(&dir).unwrap();
            write_page(&dir, "001.jpg");
        }
        let archive = Archive::new(tmp.path(), catalog_of(1));

        let report = check(&archive, None).unwrap();
        assert_eq!(report.misordered.len(), 1);
        assert_eq!(report.misordered[0].level, Level::Volume);
        assert_eq!(report.misordered[0].parent, "series-00");
    }

    #[test]
    fn empty_containers() {
        let tmp = build_archive(&[&[2, 0], &[]]);
        let archive = Archive::new(tmp.path(), catalog_of(2));

        let report = check(&archive, None).unwrap();
        assert_eq!(
            report.empty,
            vec![
                EmptyContainer {
                    level: Level::Volume,
                    path: "series-00/vol-01".into(),
                },
                EmptyContainer {
                    level: Level::Series,
                    path: "series-01".into(),
                },
            ]
        );
        assert!(!report.is_healthy());
    }

    #[test]
    fn cursor_past_end_is_broken() {
        let tmp = build_archive(&[&[2]]);
        let archive = Archive::new(tmp.path(), catalog_of(1));

        let report = check(&archive, Some(Ok(ArchiveIndex::new(0, 0, 5)))).unwrap();
        match report.cursor {
            Some(CursorHealth::Broken { index, reason }) => {
                assert_eq!(index, ArchiveIndex::new(0, 0, 5));
                assert!(reason.contains("out of bounds"));
            }
            other => panic!("unexpected cursor health {other:?}"),
        }
    }

    #[test]
    fn missing_cursor_is_reported() {
        let tmp = build_archive(&[&[1]]);
        let archive = Archive::new(tmp.path(), catalog_of(1));
        let state = tempfile::TempDir::new().unwrap();
        let store = CursorStore::new(state.path().join("cursor.json"));

        let report = check(&archive, Some(store.load())).unwrap();
        assert!(matches!(report.cursor, Some(CursorHealth::Missing(_))));
        assert!(!report.is_healthy());
    }

    #[test]
    fn corrupt_cursor_is_unreadable_not_missing() {
        let tmp = build_archive(&[&[1]]);
        let archive = Archive::new(tmp.path(), catalog_of(1));
        let state = tempfile::TempDir::new().unwrap();
        let path = state.path().join("cursor.json");
        fs::write(&path, "{\"series\": 0").unwrap();
        let store = CursorStore::new(&path);

        let report = check(&archive, Some(store.load())).unwrap();
        match report.cursor {
            Some(CursorHealth::Unreadable(reason)) => assert!(reason.contains("cursor.json")),
            other => panic!("unexpected cursor health {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_do_not_break_the_survey() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = build_archive(&[&[1]]);
        let volume = tmp.path().join("series-00/vol-00");
        fs::write(volume.join(OsStr::from_bytes(b"p\xff.jpg")), b"x").unwrap();
        let archive = Archive::new(tmp.path(), catalog_of(1));

        let report = check(&archive, Some(Ok(ArchiveIndex::new(0, 0, 1)))).unwrap();
        assert_eq!(report.shape, vec![vec![2]]);
        assert_eq!(
            report.cursor,
            Some(CursorHealth::Resolves(ArchiveIndex::new(0, 0, 1)))
        );
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let archive = Archive::new(tmp.path().join("nope"), catalog_of(0));
        assert!(matches!(check(&archive, None), Err(NavigateError::Scan(_))));
    }
}
