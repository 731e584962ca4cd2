//! Pure arithmetic for the degrade-until-fit search.
//!
//! No I/O, no pixels: the schedule of (scale, quality) steps and the pixel
//! dimensions each step implies. Everything here is unit tested without an
//! encoder.
//!
//! ## Schedule
//!
//! ```text
//! scale 0.90 0.86 ... 0.22 0.18   quality 89   (resolution first)
//! scale 0.18                      quality 85 81 ... 53 49   (then quality)
//! ```
//!
//! Scale keeps stepping down while it is above [`SCALE_FLOOR`]; once it is
//! not, it stays where it landed and quality steps down by
//! [`QUALITY_STEP`] while it is above [`QUALITY_FLOOR`]. The step that takes
//! a value to or past its floor is still taken, so the last scale is at or
//! below 0.2 and the last quality at or below 50.

use super::params::Quality;

/// First scale factor tried when the source does not fit.
pub const START_SCALE: f64 = 0.9;
/// Scale stops decreasing once it is at or below this.
pub const SCALE_FLOOR: f64 = 0.2;
/// Quality stops decreasing once it is at or below this.
pub const QUALITY_FLOOR: u32 = 50;
/// Quality decrement once scale has bottomed out.
pub const QUALITY_STEP: u32 = 4;

/// Tolerance for comparing accumulated float scale against its floor.
const SCALE_EPSILON: f64 = 1e-9;

/// One step of the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegradeStep {
    pub scale: f64,
    pub quality: Quality,
}

/// The ordered sequence of steps for a given start quality and scale step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegradeSchedule {
    pub start_quality: Quality,
    pub scale_step: f64,
}

impl DegradeSchedule {
    pub fn new(start_quality: Quality, scale_step: f64) -> Self {
        Self {
            start_quality,
            scale_step,
        }
    }

    /// Iterate the steps in order. Finite whenever `scale_step > 0`.
    pub fn steps(&self) -> DegradeSteps {
        DegradeSteps {
            schedule: *self,
            scale_steps: 0,
            quality: self.start_quality.value(),
            done: false,
        }
    }

    fn scale_at(&self, scale_steps: u32) -> f64 {
        // Recomputed from the step count so rounding does not accumulate
        (START_SCALE - self.scale_step * f64::from(scale_steps)).max(0.0)
    }
}

/// Iterator over [`DegradeSchedule`] steps.
#[derive(Debug, Clone)]
pub struct DegradeSteps {
    schedule: DegradeSchedule,
    scale_steps: u32,
    quality: u32,
    done: bool,
}

impl Iterator for DegradeSteps {
    type Item = DegradeStep;

    fn next(&mut self) -> Option<DegradeStep> {
        if self.done {
            return None;
        }
        let scale = self.schedule.scale_at(self.scale_steps);
        let step = DegradeStep {
            scale,
            quality: Quality::new(self.quality),
        };

        if scale > SCALE_FLOOR + SCALE_EPSILON {
            self.scale_steps += 1;
        } else if self.quality > QUALITY_FLOOR {
            self.quality = self.quality.saturating_sub(QUALITY_STEP).max(1);
        } else {
            self.done = true;
        }
        Some(step)
    }
}

/// `floor(width * scale) × floor(height * scale)`, never below 1×1.
///
/// The epsilon keeps `1000 * 0.86` at 860 when 0.86 is stored as 0.8599….
pub fn scaled_dimensions(dims: (u32, u32), scale: f64) -> (u32, u32) {
    let scale_edge = |edge: u32| ((f64::from(edge) * scale + 1e-6).floor() as u32).max(1);
    (scale_edge(dims.0), scale_edge(dims.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_schedule() -> DegradeSchedule {
        DegradeSchedule::new(Quality::default(), 0.04)
    }

    #[test]
    fn default_schedule_has_29_steps() {
        // 19 scale steps (0.90 → 0.18) at q89, then q85 → q49
        assert_eq!(default_schedule().steps().count(), 29);
    }

    #[test]
    fn default_schedule_starts_at_090_q89() {
        let first = default_schedule().steps().next().unwrap();
        assert!((first.scale - 0.9).abs() < 1e-12);
        assert_eq!(first.quality.value(), 89);
    }

    #[test]
    fn scale_descends_before_quality() {
        let steps: Vec<DegradeStep> = default_schedule().steps().collect();

        let scale_phase = &steps[..19];
        assert!(scale_phase.iter().all(|s| s.quality.value() == 89));
        assert!(scale_phase.windows(2).all(|w| w[1].scale < w[0].scale));
        assert!((scale_phase[18].scale - 0.18).abs() < 1e-9);

        let quality_phase = &steps[19..];
        assert!(quality_phase.iter().all(|s| (s.scale - 0.18).abs() < 1e-9));
        let qualities: Vec<u32> = quality_phase.iter().map(|s| s.quality.value()).collect();
        assert_eq!(qualities, vec![85, 81, 77, 73, 69, 65, 61, 57, 53, 49]);
    }

    #[test]
    fn step_landing_on_floor_stops_scaling() {
        // 0.9 - 0.1 * 7 = 0.2: at the floor, not above it
        let steps: Vec<DegradeStep> = DegradeSchedule::new(Quality::new(50), 0.1)
            .steps()
            .collect();
        assert_eq!(steps.len(), 8);
        assert!((steps[7].scale - 0.2).abs() < 1e-9);
    }

    #[test]
    fn low_start_quality_skips_quality_phase() {
        let steps: Vec<DegradeStep> = DegradeSchedule::new(Quality::new(40), 0.04)
            .steps()
            .collect();
        assert_eq!(steps.len(), 19);
        assert!(steps.iter().all(|s| s.quality.value() == 40));
    }

    #[test]
    fn coarse_step_reaches_floor_quickly() {
        let steps = DegradeSchedule::new(Quality::new(89), 0.5).steps().count();
        // 0.9, 0.4 and 0.0 at q89, then ten quality steps at 0.0
        assert_eq!(steps, 3 + 10);
    }

    #[test]
    fn scaled_dimensions_floor() {
        assert_eq!(scaled_dimensions((1000, 750), 0.9), (900, 675));
        assert_eq!(scaled_dimensions((999, 333), 0.5), (499, 166));
    }

    #[test]
    fn scaled_dimensions_never_zero() {
        assert_eq!(scaled_dimensions((3, 2), 0.18), (1, 1));
        assert_eq!(scaled_dimensions((10, 10), 0.0), (1, 1));
    }
}
