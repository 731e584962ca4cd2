//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the pixel work the encoder policy
//! needs: identify, decode once, then encode at a given size and quality as
//! many times as the search asks.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests drive the policy through a mock that fakes output sizes.

use super::params::EncodeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot decode image: {0}")]
    Decode(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Decoded pixels, reused across encode attempts.
    type Decoded;

    /// Read pixel dimensions from an encoded buffer.
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError>;

    /// MIME type of an encoded buffer, if recognised.
    fn mime_type(&self, data: &[u8]) -> Option<&'static str>;

    /// Decode an encoded buffer into pixels.
    fn decode(&self, data: &[u8]) -> Result<Self::Decoded, BackendError>;

    /// Resize to exactly `params.width × params.height` and encode as JPEG.
    fn encode_jpeg(
        &self,
        image: &Self::Decoded,
        params: &EncodeParams,
    ) -> Result<Vec<u8>, BackendError>;
}
