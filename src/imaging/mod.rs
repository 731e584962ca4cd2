//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Decode** | `image::load_from_memory` |
//! | **Resize → JPEG** | Lanczos3 + `JpegEncoder` |
//! | **Fit to budget** | [`encode_to_fit`] degrade schedule |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for the degrade schedule and dimension math (unit testable)
//! - **Parameters**: Data structures describing one encode attempt
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: The size-constrained encoder combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{DegradeSchedule, DegradeStep};
pub use operations::{Attempt, Encoded, FitConfig, FitOutcome, encode_to_fit, get_dimensions};
pub use params::{EncodeParams, Quality};
pub use rust_backend::RustBackend;
