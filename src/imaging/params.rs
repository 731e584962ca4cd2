//! Parameter types for image operations.
//!
//! These structs describe *what* to encode, not *how*. They are the
//! interface between the degrade policy in [`operations`](super::operations)
//! and the pixel work in the [`backend`](super::backend), which lets the
//! policy run against a mock backend in tests.
//!
//! ## Types
//!
//! - [`Quality`]: lossy encoding quality (1-100, default 89), clamped on construction.
//! - [`EncodeParams`]: target pixel dimensions plus quality for one encode attempt.

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(89)
    }
}

/// One encode attempt: resize to exactly `width × height`, encode at `quality`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
