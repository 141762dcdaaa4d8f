//! Documented constants for the handwriting metrics engine.
//!
//! These values are tuned for finger or stylus writing on a phone or tablet
//! canvas, where a single word is written in a few seconds.

// ============================================================================
// Unit Conversion
// ============================================================================

/// Approximate pixels per millimetre.
///
/// **Rationale**: 96 DPI / 25.4 mm per inch ≈ 3.78. This is a fixed
/// approximation and is not calibrated to the real pixel density of the
/// device, so every millimetre value is only as accurate as that assumption.
pub const PX_PER_MM: f64 = 3.78;

// ============================================================================
// Detection Thresholds
// ============================================================================

/// Minimum gap between two strokes (ms) for it to count as a pause.
///
/// **Rationale**: Lifting the pen between letters of a fluent word takes
/// well under 150ms. Longer gaps reflect hesitation or planning.
pub const PAUSE_THRESHOLD_MS: i64 = 150;

/// Minimum difference between consecutive segment speeds (px/s) for it to
/// count as a sudden speed change.
pub const SPEED_CHANGE_THRESHOLD_PX_PER_SEC: f64 = 600.0;

/// Minimum turn angle (radians) between two consecutive segments of a stroke
/// for it to count as a correction.
///
/// **Rationale**: Turns sharper than a right angle are rare in cursive
/// letter shapes and usually mean the writer went back over the trace.
pub const CORRECTION_ANGLE_RAD: f64 = std::f64::consts::FRAC_PI_2;

/// Floor applied to the effective drawing duration (seconds).
///
/// Keeps the average speed finite for instant or near-instant sessions.
pub const MIN_DURATION_SEC: f64 = 0.1;

// ============================================================================
// Fluidity Sub-score Normalisers
// ============================================================================

/// Pause ratio (pause time / total time) at which the pause-time score is 0.
pub const PAUSE_RATIO_CEILING: f64 = 0.5;

/// Pause count at which the pause-count score is 0.
pub const PAUSE_COUNT_CEILING: f64 = 6.0;

/// Path length (mm) at which the length score saturates at 1.
pub const PATH_LENGTH_CEILING_MM: f64 = 20.0;

/// Sudden-change rate (changes / speed samples) at which smoothness is 0.
pub const CHANGE_RATE_CEILING: f64 = 0.3;

/// Average speed (px/s) at which the speed score saturates at 1.
pub const SPEED_CEILING_PX_PER_SEC: f64 = 800.0;

// ============================================================================
// Fluidity Weights
// ============================================================================
//
// These sum to exactly 1.0 and are never renormalised.

pub const WEIGHT_SMOOTHNESS: f64 = 0.35;
pub const WEIGHT_PAUSE_TIME: f64 = 0.25;
pub const WEIGHT_PAUSE_COUNT: f64 = 0.20;
pub const WEIGHT_LENGTH: f64 = 0.10;
pub const WEIGHT_SPEED: f64 = 0.10;

// ============================================================================
// Session & Audio Adaptation
// ============================================================================

/// Minimum interval (ms) between two metric recomputations while the pen moves.
///
/// **Rationale**: Touch events arrive every 8-16ms. Recomputing at 20Hz keeps
/// the dashboard live without redoing the full pass for every sample.
pub const METRICS_UPDATE_INTERVAL_MS: i64 = 50;

/// Force recorded for points from devices without pressure sensing.
pub const DEFAULT_FORCE: f64 = 0.5;

/// Writing speed (px/s) mapped to the fastest playback rate.
pub const PLAYBACK_SPEED_CEILING_PX_PER_SEC: f64 = 1500.0;

/// Playback rate for a pen at rest.
pub const PLAYBACK_RATE_MIN: f64 = 0.8;

/// Playback rate at or above [`PLAYBACK_SPEED_CEILING_PX_PER_SEC`].
pub const PLAYBACK_RATE_MAX: f64 = 1.6;
