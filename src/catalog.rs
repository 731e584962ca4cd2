//! Display names for series.
//!
//! On-disk directory names decide ordering and count; the catalog only
//! supplies the human-readable label for each position. The two are kept in
//! step by hand, so [`SeriesCatalog::ensure_matches`] is checked on every
//! resolve rather than trusting the config.

use serde::{Deserialize, Serialize};

/// Ordered series display names, indexed by series position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesCatalog(Vec<String>);

impl SeriesCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn name(&self, series: usize) -> Option<&str> {
        self.0.get(series).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// `Err((catalog_len, on_disk))` unless the catalog names exactly `on_disk` series.
    pub fn ensure_matches(&self, on_disk: usize) -> Result<(), (usize, usize)> {
        if self.0.len() == on_disk {
            Ok(())
        } else {
            Err((self.0.len(), on_disk))
        }
    }
}
