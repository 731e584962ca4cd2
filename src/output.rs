//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! The primary line for a page is its semantic identity (the alt text a
//! reader will see, plus the cursor position) with filesystem paths shown as
//! indented `Source:` context lines.
//!
//! # Output Format
//!
//! ## Post / Preview
//!
//! ```text
//! Nausicaa - Volume 2, Page 14
//!     Cursor: series 0 / volume 1 / page 13
//!     Source: archive/01-nausicaa/vol-02/014.jpg
//!     Image: image/jpeg, 2400x3600, 812345 bytes (re-encoded from 3100211 bytes in 6 attempts)
//!     Posted: outbox/post-000-001-0013.jpg
//!     Next: series 0 / volume 1 / page 14
//! ```
//!
//! ## Check
//!
//! ```text
//! Archive
//! 001 Nausicaa (2 volumes, 37 pages)
//!     Source: 01-nausicaa/
//! 002 Akira (6 volumes, 2101 pages)
//!     Source: 02-akira/
//!
//! Warnings
//!     02-akira/vol-1: page "page10.jpg" sorts before "page2.jpg"
//!
//! Cursor
//!     series 0 / volume 1 / page 13 resolves
//!
//! 2 series, 8 volumes, 2138 pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::check::{CheckReport, CursorHealth};
use crate::cursor::ArchiveIndex;
use crate::cycle::{CycleReport, PreparedPost};
use crate::imaging::FitOutcome;
use crate::navigate::Resolved;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

fn source_line(depth: usize, path: &Path) -> String {
    format!("{}Source: {}", indent(depth), path.display())
}

fn encoding_summary(prepared: &PreparedPost) -> String {
    let size = prepared.image.bytes.len();
    match prepared.outcome {
        FitOutcome::Original => format!("{size} bytes (original)"),
        FitOutcome::Fitted => format!(
            "{size} bytes (re-encoded from {} bytes in {})",
            prepared.source_size,
            plural(prepared.attempts, "attempt", "attempts")
        ),
        FitOutcome::BudgetUnmet => format!(
            "{size} bytes (OVER BUDGET: smallest of {}, source {} bytes)",
            plural(prepared.attempts, "attempt", "attempts"),
            prepared.source_size
        ),
    }
}

// ============================================================================
// status
// ============================================================================

/// Cursor position and the page it points at.
pub fn format_status(cursor_path: &Path, resolved: &Resolved) -> Vec<String> {
    let counts = resolved.counts;
    let index = resolved.index;
    vec![
        format!("Cursor: {}", index),
        source_line(1, cursor_path),
        format!("Next post: {}", resolved.metadata.alt_text()),
        source_line(1, &resolved.path),
        format!(
            "{}Position: page {} of {}, volume {} of {}, series {} of {}",
            indent(1),
            index.page + 1,
            counts.pages,
            index.volume + 1,
            counts.volumes,
            index.series + 1,
            counts.series
        ),
        format!(
            "Then: {}",
            crate::cursor::advance(index, resolved.flags)
        ),
    ]
}

pub fn print_status(cursor_path: &Path, resolved: &Resolved) {
    for line in format_status(cursor_path, resolved) {
        println!("{}", line);
    }
}

// ============================================================================
// preview / post
// ============================================================================

/// A prepared page, before or without publishing.
///
/// `written` is where `preview --output` saved the buffer, if anywhere.
pub fn format_prepared(prepared: &PreparedPost, written: Option<&Path>) -> Vec<String> {
    let ratio = prepared.image.aspect_ratio;
    let mut lines = vec![
        prepared.alt_text.clone(),
        format!("{}Cursor: {}", indent(1), prepared.resolved.index),
        source_line(1, &prepared.resolved.path),
        format!(
            "{}Image: {}, {}x{}, {}",
            indent(1),
            prepared.image.mime_type,
            ratio.width,
            ratio.height,
            encoding_summary(prepared)
        ),
    ];
    if let Some(path) = written {
        lines.push(format!("{}Written: {}", indent(1), path.display()));
    }
    lines.push(format!("{}Next: {}", indent(1), prepared.next_index()));
    lines
}

pub fn print_prepared(prepared: &PreparedPost, written: Option<&Path>) {
    for line in format_prepared(prepared, written) {
        println!("{}", line);
    }
}

/// A completed run: the prepared page plus where it went.
pub fn format_cycle_report(report: &CycleReport) -> Vec<String> {
    let mut lines = format_prepared(&report.prepared, None);
    // Replace the projected "Next" with the saved cursor.
    lines.pop();
    lines.push(format!("{}Posted: {}", indent(1), report.receipt.reference));
    lines.push(format!("{}Next: {}", indent(1), report.next));
    lines
}

pub fn print_cycle_report(report: &CycleReport) {
    for line in format_cycle_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// set
// ============================================================================

pub fn format_cursor_set(index: ArchiveIndex, resolved: &Resolved, cursor_path: &Path) -> Vec<String> {
    vec![
        format!("Cursor set to {}", index),
        source_line(1, cursor_path),
        format!("{}Next post: {}", indent(1), resolved.metadata.alt_text()),
    ]
}

pub fn print_cursor_set(index: ArchiveIndex, resolved: &Resolved, cursor_path: &Path) {
    for line in format_cursor_set(index, resolved, cursor_path) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Archive inventory, warnings and cursor health.
pub fn format_check_report(report: &CheckReport, catalog: &[String]) -> Vec<String> {
    let mut lines = vec!["Archive".to_string()];

    for (i, (name, volumes)) in report.series_names.iter().zip(&report.shape).enumerate() {
        let title = catalog.get(i).map(String::as_str).unwrap_or("(uncatalogued)");
        lines.push(format!(
            "{} {} ({}, {})",
            format_index(i + 1),
            title,
            plural(volumes.len(), "volume", "volumes"),
            plural(volumes.iter().sum(), "page", "pages")
        ));
        lines.push(format!("{}Source: {}/", indent(1), name));
    }

    let mut warnings = Vec::new();
    if !report.catalog_matches() {
        warnings.push(format!(
            "catalog names {} but the archive has {}",
            plural(report.catalog_len, "series", "series"),
            plural(report.shape.len(), "series directory", "series directories")
        ));
    }
    for empty in &report.empty {
        warnings.push(format!("{}/ is an empty {}", empty.path, empty.level));
    }
    for found in &report.misordered {
        let location = if found.parent.is_empty() {
            "archive root".to_string()
        } else {
            found.parent.clone()
        };
        warnings.push(format!(
            "{}: {} {:?} sorts before {:?}",
            location, found.level, found.warning.earlier, found.warning.later
        ));
    }
    if !warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        lines.extend(warnings.into_iter().map(|w| format!("{}{}", indent(1), w)));
    }

    if let Some(cursor) = &report.cursor {
        lines.push(String::new());
        lines.push("Cursor".to_string());
        lines.push(match cursor {
            CursorHealth::Resolves(index) => format!("{}{} resolves", indent(1), index),
            CursorHealth::Broken { index, reason } => {
                format!("{}{} does not resolve: {}", indent(1), index, reason)
            }
            CursorHealth::Missing(reason) => format!(
                "{}missing: {} (create it with `pagecast set`)",
                indent(1),
                reason
            ),
            CursorHealth::Unreadable(reason) => format!("{}unreadable: {}", indent(1), reason),
        });
    }

    let volume_count: usize = report.shape.iter().map(Vec::len).sum();
    lines.push(String::new());
    lines.push(format!(
        "{}, {}, {}",
        plural(report.shape.len(), "series", "series"),
        plural(volume_count, "volume", "volumes"),
        plural(report.total_pages(), "page", "pages")
    ));
    lines
}

pub fn print_check_report(report: &CheckReport, catalog: &[String]) {
    for line in format_check_report(report, catalog) {
        println!("{}", line);
    }
}
