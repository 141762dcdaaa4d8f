//! Handwriting kinematics: derives pause, speed, geometry, correction and
//! fluidity metrics from time-stamped touch strokes.

pub mod constants;
pub mod error;
pub mod metrics;
pub mod session;
pub mod streaming;
pub mod types;
pub mod utils;


pub use error::{Error, Result};
pub use metrics::{compute_metrics, compute_metrics_with};
pub use session::{RecordingSession, SessionUpdate};
pub use streaming::{
    clamp_volume, instantaneous_speed, playback_rate_for_speed, SpeedTracker,
};
pub use types::{
    CTouchPoint, CWritingMetrics, MetricsConfig, Point, SessionConfig, Stroke, StrokeCollection,
    WritingMetrics,
};

// ============================================================================
// C ABI
// ============================================================================

/// Compute metrics for strokes passed as one flat point array.
///
/// `stroke_lens` holds the number of points in each stroke, in order, and must
/// sum to `points_len`. Invalid input yields the empty record.
///
/// # Safety
/// `points` must be valid for `points_len` reads and `stroke_lens` for
/// `stroke_lens_len` reads, or be null.
#[no_mangle]
pub unsafe extern "C" fn compute_writing_metrics(
    points: *const CTouchPoint,
    points_len: usize,
    stroke_lens: *const usize,
    stroke_lens_len: usize,
) -> CWritingMetrics {
    if points_len == 0 || stroke_lens_len == 0 {
        return WritingMetrics::EMPTY.into();
    }
    if points.is_null() || stroke_lens.is_null() {
        log::warn!("compute_writing_metrics called with a null pointer");
        return WritingMetrics::EMPTY.into();
    }

    let raw_points = unsafe { std::slice::from_raw_parts(points, points_len) };
    let lens = unsafe { std::slice::from_raw_parts(stroke_lens, stroke_lens_len) };

    let converted: Vec<Point> = raw_points.iter().copied().map(Point::from).collect();
    match StrokeCollection::from_flat(&converted, lens) {
        Ok(strokes) => compute_metrics(strokes.strokes()).into(),
        Err(err) => {
            log::warn!("Rejected stroke buffer: {}", err);
            WritingMetrics::EMPTY.into()
        }
    }
}

/// Playback rate (0.8-1.6) for a writing speed in px/s.
#[no_mangle]
pub extern "C" fn playback_rate_for_speed_ffi(speed_px_per_sec: f64) -> f64 {
    playback_rate_for_speed(speed_px_per_sec)
}
