//! High-level image operations.
//!
//! [`encode_to_fit`] is the size-constrained encoder: it walks a
//! [`DegradeSchedule`] against a backend until a buffer fits the byte budget.
//! Resolution goes first because, for scanned pages, dropping pixels costs
//! less visible quality per byte saved than dropping JPEG quality.
//!
//! Missing the budget is not an error. The smallest buffer produced is
//! returned with [`FitOutcome::BudgetUnmet`] and the caller decides what to
//! do with it.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{DegradeSchedule, scaled_dimensions};
use super::params::{EncodeParams, Quality};
use tracing::{debug, warn};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Hard ceiling on encode attempts, whatever the schedule says.
pub const MAX_ATTEMPTS: usize = 64;

/// MIME type of every re-encoded buffer.
pub const JPEG_MIME: &str = "image/jpeg";

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, data: &[u8]) -> Result<(u32, u32)> {
    let dims = backend.identify(data)?;
    Ok((dims.width, dims.height))
}

/// Configuration for size-constrained encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitConfig {
    pub byte_budget: usize,
    pub schedule: DegradeSchedule,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            byte_budget: 1_000_000,
            schedule: DegradeSchedule::new(Quality::default(), 0.04),
        }
    }
}

/// How an [`Encoded`] buffer came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    /// The source already fit and is returned byte-for-byte.
    Original,
    /// A re-encode fit the budget.
    Fitted,
    /// Every attempt was over budget; the smallest one is returned.
    BudgetUnmet,
}

/// One encode attempt and the size it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub width: u32,
    pub height: u32,
    pub quality: u32,
    pub size: usize,
}

/// Output of [`encode_to_fit`].
#[derive(Debug, Clone)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub outcome: FitOutcome,
    pub attempts: Vec<Attempt>,
}

impl Encoded {
    pub fn fits(&self) -> bool {
        self.outcome != FitOutcome::BudgetUnmet
    }
}

/// Produce a buffer no larger than `config.byte_budget`, if the schedule allows.
///
/// `source` is returned unchanged when it already fits. Otherwise it is
/// decoded once and re-encoded as JPEG at each schedule step, starting from
/// `dims`, until an attempt fits or the schedule (or [`MAX_ATTEMPTS`]) runs out.
pub fn encode_to_fit<B: ImageBackend>(
    backend: &B,
    source: Vec<u8>,
    dims: (u32, u32),
    config: &FitConfig,
) -> Result<Encoded> {
    if source.len() <= config.byte_budget {
        let mime_type = backend.mime_type(&source).unwrap_or(JPEG_MIME);
        return Ok(Encoded {
            bytes: source,
            mime_type,
            outcome: FitOutcome::Original,
            attempts: Vec::new(),
        });
    }

    let decoded = backend.decode(&source)?;
    let mut attempts = Vec::new();
    let mut smallest: Option<Vec<u8>> = None;

    for step in config.schedule.steps().take(MAX_ATTEMPTS) {
        let (width, height) = scaled_dimensions(dims, step.scale);
        let params = EncodeParams {
            width,
            height,
            quality: step.quality,
        };
        let bytes = backend.encode_jpeg(&decoded, &params)?;
        let attempt = Attempt {
            width,
            height,
            quality: step.quality.value(),
            size: bytes.len(),
        };
        debug!(
            width,
            height,
            quality = attempt.quality,
            size = attempt.size,
            budget = config.byte_budget,
            "encode attempt"
        );
        attempts.push(attempt);

        if bytes.len() <= config.byte_budget {
            return Ok(Encoded {
                bytes,
                mime_type: JPEG_MIME,
                outcome: FitOutcome::Fitted,
                attempts,
            });
        }
        if smallest.as_ref().is_none_or(|best| bytes.len() < best.len()) {
            smallest = Some(bytes);
        }
    }

    // An empty schedule still has the source to fall back on
    let (bytes, mime_type) = match smallest {
        Some(bytes) => (bytes, JPEG_MIME),
        None => {
            let mime_type = backend.mime_type(&source).unwrap_or(JPEG_MIME);
            (source, mime_type)
        }
    };
    warn!(
        size = bytes.len(),
        budget = config.byte_budget,
        attempts = attempts.len(),
        "could not fit image within byte budget, using smallest attempt"
    );
    Ok(Encoded {
        bytes,
        mime_type,
        outcome: FitOutcome::BudgetUnmet,
        attempts,
    })
}
