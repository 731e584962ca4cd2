//! Sorted directory listings for each archive level.
//!
//! The archive has no index file: the position of a series, volume or page is
//! its rank in a sorted listing of its parent directory. Sorting is therefore
//! part of the data model, not presentation. Names are compared byte-wise, so
//! `page10` sorts before `page2`; archives are expected to zero-pad.
//! [`naming`](crate::naming) can flag directories where that assumption breaks.
//!
//! Entries whose names start with `.` are never listed.
//!
//! Names are kept as the [`OsString`] the filesystem returned, so a name that
//! is not valid UTF-8 still joins back onto its parent as the real entry.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot list directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which entries a listing keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directories,
    Files,
}

impl EntryKind {
    fn matches(self, path: &Path) -> bool {
        match self {
            EntryKind::Directories => path.is_dir(),
            EntryKind::Files => path.is_file(),
        }
    }
}

/// List the names in `dir` of the given kind, sorted ascending byte-wise.
///
/// The result does not depend on the order the filesystem returns entries in.
pub fn list_sorted(dir: &Path, kind: EntryKind) -> Result<Vec<OsString>, ScanError> {
    let read_error = |source| ScanError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let name = entry.file_name();
        if name.as_encoded_bytes().starts_with(b".") || !kind.matches(&entry.path()) {
            continue;
        }
        names.push(name);
    }

    names.sort_unstable_by(|a, b| a.as_encoded_bytes().cmp(b.as_encoded_bytes()));
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn files_sorted_ascending() {
        let tmp = TempDir::new().unwrap();
        for name in ["003.jpg", "001.jpg", "002.jpg"] {
            touch(tmp.path(), name);
        }

        let names = list_sorted(tmp.path(), EntryKind::Files).unwrap();
        assert_eq!(names, vec!["001.jpg", "002.jpg", "003.jpg"]);
    }

    #[test]
    fn sort_is_lexical_not_numeric() {
        let tmp = TempDir::new().unwrap();
        for name in ["page2.jpg", "page10.jpg", "page1.jpg"] {
            touch(tmp.path(), name);
        }

        let names = list_sorted(tmp.path(), EntryKind::Files).unwrap();
        assert_eq!(names, vec!["page1.jpg", "page10.jpg", "page2.jpg"]);
    }

    #[test]
    fn uppercase_sorts_before_lowercase() {
        let tmp = TempDir::new().unwrap();
        for name in ["b.jpg", "B.jpg", "a.jpg"] {
            touch(tmp.path(), name);
        }

        let names = list_sorted(tmp.path(), EntryKind::Files).unwrap();
        assert_eq!(names, vec!["B.jpg", "a.jpg", "b.jpg"]);
    }

    #[test]
    fn kind_filter_separates_dirs_and_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("vol-02")).unwrap();
        fs::create_dir(tmp.path().join("vol-01")).unwrap();
        touch(tmp.path(), "notes.txt");

        assert_eq!(
            list_sorted(tmp.path(), EntryKind::Directories).unwrap(),
            vec!["vol-01", "vol-02"]
        );
        assert_eq!(
            list_sorted(tmp.path(), EntryKind::Files).unwrap(),
            vec!["notes.txt"]
        );
    }

    #[test]
    fn hidden_entries_skipped() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), ".DS_Store");
        touch(tmp.path(), "001.jpg");
        fs::create_dir(tmp.path().join(".git")).unwrap();

        assert_eq!(
            list_sorted(tmp.path(), EntryKind::Files).unwrap(),
            vec!["001.jpg"]
        );
        assert!(
            list_sorted(tmp.path(), EntryKind::Directories)
                .unwrap()
                .is_empty()
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_kept_exact() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let fe = OsStr::from_bytes(b"a\xfe.jpg");
        let ff = OsStr::from_bytes(b"a\xff.jpg");
        fs::write(tmp.path().join(ff), b"x").unwrap();
        fs::write(tmp.path().join(fe), b"x").unwrap();
        touch(tmp.path(), "a.jpg");

        let names = list_sorted(tmp.path(), EntryKind::Files).unwrap();
        assert_eq!(
            names,
            vec![OsString::from("a.jpg"), fe.to_os_string(), ff.to_os_string()]
        );
        for name in &names {
            assert!(tmp.path().join(name).is_file());
        }
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(list_sorted(tmp.path(), EntryKind::Files).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_reports_path() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");

        let err = list_sorted(&missing, EntryKind::Directories).unwrap_err();
        let ScanError::DirectoryRead { path, .. } = &err;
        assert_eq!(path, &missing);
        assert!(err.to_string().contains("nope"));
    }
}
