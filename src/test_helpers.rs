//! Shared test utilities for the pagecast test suite.
//!
//! Builds throwaway archives in a temp directory from a shape description,
//! so tests can say "one series, two volumes of three and two pages" instead
//! of spelling out directory trees.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = build_archive(&[&[3, 2]]);
//! let archive = Archive::new(tmp.path(), catalog_of(1));
//! let resolved = archive.resolve(ArchiveIndex::new(0, 0, 2)).unwrap();
//! assert!(resolved.flags.is_last_page_in_volume);
//! ```

use crate::catalog::SeriesCatalog;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Archive fixtures
// =========================================================================

/// Create an archive where `shape[s][v]` is the page count of volume `v` of
/// series `s`.
///
/// Directories are `series-SS/vol-VV/page-PPP.jpg`, zero-padded so lexical
/// order equals index order. Every page is a small valid JPEG.
pub fn build_archive(shape: &[&[usize]]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (s, volumes) in shape.iter().enumerate() {
        std::fs::create_dir_all(tmp.path().join(format!("series-{s:02}"))).unwrap();
        for (v, &pages) in volumes.iter().enumerate() {
            let dir = tmp.path().join(format!("series-{s:02}/vol-{v:02}"));
            std::fs::create_dir_all(&dir).unwrap();
            for p in 0..pages {
                write_page(&dir, &format!("page-{p:03}.jpg"));
            }
        }
    }
    tmp
}

/// Write a small JPEG page into `dir`.
pub fn write_page(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), gradient_jpeg(32, 24, 90)).unwrap();
}

/// Catalog with `n` names: `"Series 0"`, `"Series 1"`, ...
pub fn catalog_of(n: usize) -> SeriesCatalog {
    SeriesCatalog::new((0..n).map(|i| format!("Series {i}")))
}

// =========================================================================
// Image fixtures
// =========================================================================

/// Smooth gradient JPEG; compresses well.
pub fn gradient_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    encode_jpeg(&img, quality)
}

/// Pseudo-random noise JPEG; compresses badly, so it is large for its size.
pub fn noise_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let mut state: u32 = 0x9E37_79B9;
    let img = RgbImage::from_fn(width, height, |_, _| {
        let mut channel = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        };
        image::Rgb([channel(), channel(), channel()])
    });
    encode_jpeg(&img, quality)
}

fn encode_jpeg(img: &RgbImage, quality: u8) -> Vec<u8> {
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgb8,
        )
        .unwrap();
    buf
}
