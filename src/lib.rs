//! # pagecast
//!
//! Posts a scanned archive one page at a time. Each run publishes the page
//! under a persisted cursor and then moves the cursor to the next page, so a
//! scheduler calling `pagecast post` walks the whole archive in order and
//! starts over once it reaches the end.
//!
//! # Archive Layout
//!
//! Your filesystem is the data source. Three directory levels, each ordered
//! by the byte-wise sort of its names:
//!
//! ```text
//! archive/
//! ├── 01-nausicaa/        # series
//! │   ├── vol-01/         # volume
//! │   │   ├── 001.jpg     # page
//! │   │   └── 002.jpg
//! │   └── vol-02/
//! └── 02-akira/
//! ```
//!
//! # One Run
//!
//! ```text
//! load cursor → resolve page → encode under byte budget → publish → advance → save cursor
//! ```
//!
//! The cursor is saved only after a successful publish. Any earlier failure
//! leaves it untouched so the next run retries the same page.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Sorted, dotfile-free directory listings |
//! | [`navigate`] | Resolves a cursor to a page file, its metadata and carry flags |
//! | [`cursor`] | `ArchiveIndex` and the pure advance rule |
//! | [`store`] | Durable JSON cursor record |
//! | [`catalog`] | Series display names |
//! | [`metadata`] | Display metadata and alt text for a page |
//! | [`imaging`] | Size-constrained JPEG re-encoding, pure Rust |
//! | [`publish`] | `Publisher` seam and the outbox implementation |
//! | [`cycle`] | One complete run wiring the above together |
//! | [`naming`] | Numbers embedded in entry names, for ordering diagnostics |
//! | [`check`] | Whole-archive health report |
//! | [`config`] | `pagecast.toml` loading, env overrides, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Byte-wise Ordering
//!
//! Names are sorted exactly as stored, never "naturally". An index always
//! refers to the same file no matter how names are spelled, and a page added
//! at the end of a volume never shifts earlier indices. Unpadded numbers
//! (`page2` after `page10`) are reported by `pagecast check` instead.
//!
//! ## Re-listing on Every Run
//!
//! Nothing about the archive is cached between runs. The archive can grow
//! while the cursor is mid-way through it, and the next run picks up the new
//! entries at their sorted position.
//!
//! ## Pure-Rust Imaging
//!
//! Oversized pages are re-encoded with the `image` crate (Lanczos3 resize,
//! baseline JPEG). No system libraries are needed.

pub mod catalog;
pub mod check;
pub mod config;
pub mod cursor;
pub mod cycle;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod navigate;
pub mod output;
pub mod publish;
pub mod scan;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;
