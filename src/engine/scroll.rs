//! Per-tick scroll arithmetic.
//!
//! Pure functions over already-sanitised numbers; the controller owns the
//! state and decides what to do with the results.

use crate::model::MIN_STEP_PX;

/// Direction of a manual step or vertical nudge. `Up` moves toward the top
/// of the script (smaller offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

impl StepDirection {
    /// `-1.0` for up, `1.0` for down.
    pub fn sign(self) -> f64 {
        match self {
            StepDirection::Up => -1.0,
            StepDirection::Down => 1.0,
        }
    }
}

/// Result of advancing the offset by one committed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    pub offset_px: f64,
    pub reached_end: bool,
}

/// Advance `offset_px` by `speed * dt`, never past `max_offset_px`.
///
/// `None` means the bounds are not measured yet: there is no ceiling and
/// the end can't be reached. The end only counts when there is something
/// to scroll (`max > 0`).
pub fn advance(offset_px: f64, speed_px_per_sec: f64, dt: f64, max_offset_px: Option<f64>) -> Advance {
    let moved = offset_px + speed_px_per_sec * dt.max(0.0);
    match max_offset_px {
        Some(max) => {
            let next = moved.min(max);
            Advance {
                offset_px: next,
                reached_end: max > 0.0 && next >= max,
            }
        }
        None => Advance {
            offset_px: moved,
            reached_end: false,
        },
    }
}

/// One rendered text line, with a floor for unreadably small fonts.
pub fn step_px(font_size_px: f64, line_height: f64) -> f64 {
    let line = font_size_px * line_height;
    if line.is_finite() {
        line.max(MIN_STEP_PX)
    } else {
        MIN_STEP_PX
    }
}

/// Clamp an offset into `[0, max]`, or `[0, ∞)` when the bounds are unknown.
pub fn clamp_offset(offset_px: f64, max_offset_px: Option<f64>) -> f64 {
    let floored = offset_px.max(0.0);
    match max_offset_px {
        Some(max) => floored.min(max),
        None => floored,
    }
}

/// Batches raw frame deltas so state is mutated at a bounded rate.
///
/// Sub-threshold deltas are kept, not dropped: the committed delta is the
/// whole accumulated time.
#[derive(Debug, Clone, PartialEq)]
pub struct TickThrottle {
    threshold_secs: f64,
    pending_secs: f64,
}

impl TickThrottle {
    pub fn new(threshold_secs: f64) -> Self {
        Self {
            threshold_secs: threshold_secs.max(0.0),
            pending_secs: 0.0,
        }
    }

    /// Add a delta. Returns the accumulated time once it reaches the
    /// threshold, and starts over.
    pub fn push(&mut self, delta_secs: f64) -> Option<f64> {
        if delta_secs.is_finite() && delta_secs > 0.0 {
            self.pending_secs += delta_secs;
        }
        if self.pending_secs > 0.0 && self.pending_secs >= self.threshold_secs {
            Some(std::mem::take(&mut self.pending_secs))
        } else {
            None
        }
    }

    pub fn pending(&self) -> f64 {
        self.pending_secs
    }

    pub fn reset(&mut self) {
        self.pending_secs = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const THRESHOLD: f64 = 1.0 / 45.0;

    #[test]
    fn advance_stops_exactly_at_max() {
        let a = advance(90.0, 20.0, 1.0, Some(100.0));
        assert_eq!(a.offset_px, 100.0);
        assert!(a.reached_end);

        let b = advance(40.0, 20.0, 1.0, Some(100.0));
        assert_eq!(b.offset_px, 60.0);
        assert!(!b.reached_end);
    }

    #[test]
    fn zero_max_never_reaches_end() {
        let a = advance(0.0, 20.0, 1.0, Some(0.0));
        assert_eq!(a.offset_px, 0.0);
        assert!(!a.reached_end);
    }

    #[test]
    fn unknown_bounds_have_no_ceiling() {
        let a = advance(1_000.0, 50.0, 2.0, None);
        assert_eq!(a.offset_px, 1_100.0);
        assert!(!a.reached_end);
    }

    #[test]
    fn step_has_floor() {
        assert_eq!(step_px(4.0, 1.0), 8.0);
        assert!((step_px(20.0, 1.5) - 30.0).abs() < 1e-9);
        assert_eq!(step_px(f64::NAN, 1.0), 8.0);
    }

    #[test]
    fn throttle_batches_small_deltas() {
        let mut t = TickThrottle::new(THRESHOLD);
        assert_eq!(t.push(0.01), None);
        assert_eq!(t.push(0.01), None);
        let committed = t.push(0.01).unwrap();
        assert!((committed - 0.03).abs() < 1e-12);
        assert_eq!(t.pending(), 0.0);
    }

    #[test]
    fn throttle_passes_large_deltas_through() {
        let mut t = TickThrottle::new(THRESHOLD);
        assert_eq!(t.push(1.0), Some(1.0));
        assert_eq!(t.push(f64::NAN), None);
        assert_eq!(t.push(-1.0), None);
    }

    proptest! {
        #[test]
        fn advance_is_monotonic_and_bounded(
            offset in 0.0f64..500.0,
            extra in 0.0f64..500.0,
            speed in 4.0f64..260.0,
            dt in 0.0f64..2.0,
        ) {
            let max = offset + extra;
            let a = advance(offset, speed, dt, Some(max));
            prop_assert!(a.offset_px >= offset);
            prop_assert!(a.offset_px <= max);
            prop_assert_eq!(a.reached_end, max > 0.0 && a.offset_px >= max);
        }

        #[test]
        fn throttle_never_loses_time(deltas in proptest::collection::vec(0.0f64..0.05, 1..200)) {
            let mut t = TickThrottle::new(THRESHOLD);
            let mut committed = 0.0;
            for d in &deltas {
                if let Some(c) = t.push(*d) {
                    committed += c;
                }
            }
            let total: f64 = deltas.iter().sum();
            prop_assert!((committed + t.pending() - total).abs() < 1e-9);
        }
    }
}
