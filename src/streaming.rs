//! Real-time speed estimation for audio adaptation.
//!
//! Unlike the batch engine in [`crate::metrics`], this only needs the two most
//! recent samples. The state is explicit and owned by whoever drives playback.

use crate::constants::{
    PLAYBACK_RATE_MAX, PLAYBACK_RATE_MIN, PLAYBACK_SPEED_CEILING_PX_PER_SEC,
};
use crate::types::Point;

/// Last sample of the pen currently on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpeedTracker {
    last: Option<Point>,
}

impl SpeedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next sample and get the instantaneous speed in px/s.
    ///
    /// Returns `None` for the first sample after a reset and when the time
    /// delta is not positive. The sample is always remembered.
    pub fn update(&mut self, point: Point) -> Option<f64> {
        let speed = self.last.and_then(|last| instantaneous_speed(&last, &point));
        self.last = Some(point);
        speed
    }

    /// Forget the last sample (pen lift or new session).
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn last_point(&self) -> Option<&Point> {
        self.last.as_ref()
    }
}

/// Speed between two samples in px/s, `None` if `to` is not strictly later.
pub fn instantaneous_speed(from: &Point, to: &Point) -> Option<f64> {
    let dt_ms = to.t.checked_sub(from.t).filter(|dt| *dt > 0)?;
    Some(from.distance_to(to) / dt_ms as f64 * 1000.0)
}

/// Map writing speed to a playback rate.
///
/// Speed is clamped to 0..=1500 px/s and mapped linearly onto 0.8x..=1.6x.
pub fn playback_rate_for_speed(speed_px_per_sec: f64) -> f64 {
    let clamped = if speed_px_per_sec.is_nan() {
        0.0
    } else {
        speed_px_per_sec.clamp(0.0, PLAYBACK_SPEED_CEILING_PX_PER_SEC)
    };
    let ratio = clamped / PLAYBACK_SPEED_CEILING_PX_PER_SEC;
    PLAYBACK_RATE_MIN + (PLAYBACK_RATE_MAX - PLAYBACK_RATE_MIN) * ratio
}

/// Clamp a playback volume to 0.0..=1.0.
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}
