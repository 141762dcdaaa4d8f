use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Error, Result};

/// One touch sample. Immutable once captured.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Capture time in milliseconds (epoch or monotonic)
    pub t: i64,
    /// Normalized pressure in 0.0-1.0, `None` on devices without pressure sensing
    pub force: Option<f64>,
}

impl Point {
    /// Create a point without pressure information
    pub fn new(x: f64, y: f64, t: i64) -> Self {
        Self {
            x,
            y,
            t,
            force: None,
        }
    }

    /// Create a point with a pressure reading
    pub fn with_force(x: f64, y: f64, t: i64, force: f64) -> Self {
        Self {
            x,
            y,
            t,
            force: Some(force),
        }
    }

    /// The force value if it is usable for averaging.
    pub fn valid_force(&self) -> Option<f64> {
        self.force.filter(|f| !f.is_nan())
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Points captured between finger down and finger up, in time order.
pub type Stroke = Vec<Point>;

/// Ordered strokes of one recording session.
///
/// Grows by appending strokes and by appending points to the last stroke.
/// The metrics engine only ever reads a snapshot through [`StrokeCollection::strokes`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeCollection {
    strokes: Vec<Stroke>,
}

impl StrokeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already captured strokes as-is.
    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    /// Split a flat point buffer into strokes of the given lengths.
    ///
    /// Used at FFI boundaries where strokes arrive as one contiguous array.
    pub fn from_flat(points: &[Point], stroke_lengths: &[usize]) -> Result<Self> {
        let expected = stroke_lengths
            .iter()
            .try_fold(0usize, |acc, &len| acc.checked_add(len))
            .ok_or(Error::StrokeLayout {
                expected: usize::MAX,
                actual: points.len(),
            })?;
        if expected != points.len() {
            return Err(Error::StrokeLayout {
                expected,
                actual: points.len(),
            });
        }

        let mut strokes = Vec::with_capacity(stroke_lengths.len());
        let mut offset: usize = 0;
        for (index, &len) in stroke_lengths.iter().enumerate() {
            if len == 0 {
                return Err(Error::EmptyStroke { index });
            }
            let stroke = offset
                .checked_add(len)
                .and_then(|end| points.get(offset..end))
                .ok_or(Error::StrokeLayout {
                    expected,
                    actual: points.len(),
                })?;
            strokes.push(stroke.to_vec());
            offset += len;
        }

        Ok(Self { strokes })
    }

    /// Open a new stroke starting at `point`.
    pub fn begin_stroke(&mut self, point: Point) {
        self.strokes.push(vec![point]);
    }

    /// Append to the last stroke. Returns `false` when no stroke is open.
    pub fn push_point(&mut self, point: Point) -> bool {
        match self.strokes.last_mut() {
            Some(stroke) => {
                stroke.push(point);
                true
            }
            None => false,
        }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Vec::len).sum()
    }

    /// All points in chronological order, ignoring stroke boundaries.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.strokes.iter().flatten()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }
}

impl AsRef<[Stroke]> for StrokeCollection {
    fn as_ref(&self) -> &[Stroke] {
        &self.strokes
    }
}

/// Handwriting metrics derived from one stroke collection snapshot.
///
/// `Default` is the neutral record returned when there is not enough data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingMetrics {
    // Kinetic
    /// Average pressure, 0-100
    pub applied_force: u8,
    /// Total pause time in ms
    pub pause_time: i64,
    pub pause_count: u32,
    pub speed_changes: u32,
    /// Composite score, 0-100
    pub fluidity: u8,

    // Kinematic
    /// px/s
    pub average_speed: i64,
    /// Degrees in (-180, 180], 0 = rightward, 90 = downward
    pub direction: i64,
    /// mm
    pub path_length: i64,
    pub corrections: u32,
    /// Vertical extent in mm
    pub amplitude: i64,
    /// Horizontal extent in mm
    pub word_length: i64,
}

impl WritingMetrics {
    pub const EMPTY: WritingMetrics = WritingMetrics {
        applied_force: 0,
        pause_time: 0,
        pause_count: 0,
        speed_changes: 0,
        fluidity: 0,
        average_speed: 0,
        direction: 0,
        path_length: 0,
        corrections: 0,
        amplitude: 0,
        word_length: 0,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

/// Tunable parameters of the metrics engine.
///
/// # Fluidity weights
/// The five weights must sum to 1.0. They are applied as given and are
/// never renormalised.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Inter-stroke gap above which a pause is counted (ms)
    pub pause_threshold_ms: i64,
    /// Segment speed delta above which a sudden change is counted (px/s)
    pub speed_change_threshold: f64,
    /// Turn angle above which a correction is counted (radians)
    pub correction_angle_rad: f64,
    /// Pixel to millimetre conversion factor
    pub px_per_mm: f64,
    /// Floor for the effective drawing duration (s)
    pub min_duration_sec: f64,

    pub pause_ratio_ceiling: f64,
    pub pause_count_ceiling: f64,
    pub path_length_ceiling_mm: f64,
    pub change_rate_ceiling: f64,
    pub speed_ceiling: f64,

    pub weight_smoothness: f64,
    pub weight_pause_time: f64,
    pub weight_pause_count: f64,
    pub weight_length: f64,
    pub weight_speed: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            pause_threshold_ms: PAUSE_THRESHOLD_MS,
            speed_change_threshold: SPEED_CHANGE_THRESHOLD_PX_PER_SEC,
            correction_angle_rad: CORRECTION_ANGLE_RAD,
            px_per_mm: PX_PER_MM,
            min_duration_sec: MIN_DURATION_SEC,
            pause_ratio_ceiling: PAUSE_RATIO_CEILING,
            pause_count_ceiling: PAUSE_COUNT_CEILING,
            path_length_ceiling_mm: PATH_LENGTH_CEILING_MM,
            change_rate_ceiling: CHANGE_RATE_CEILING,
            speed_ceiling: SPEED_CEILING_PX_PER_SEC,
            weight_smoothness: WEIGHT_SMOOTHNESS,
            weight_pause_time: WEIGHT_PAUSE_TIME,
            weight_pause_count: WEIGHT_PAUSE_COUNT,
            weight_length: WEIGHT_LENGTH,
            weight_speed: WEIGHT_SPEED,
        }
    }
}

impl MetricsConfig {
    pub fn weight_sum(&self) -> f64 {
        self.weight_smoothness
            + self.weight_pause_time
            + self.weight_pause_count
            + self.weight_length
            + self.weight_speed
    }

    pub fn validate(&self) -> Result<()> {
        if self.pause_threshold_ms < 0 {
            return Err(Error::InvalidConfig(format!(
                "pause_threshold_ms must be >= 0, got {}",
                self.pause_threshold_ms
            )));
        }

        let positive = [
            ("speed_change_threshold", self.speed_change_threshold),
            ("correction_angle_rad", self.correction_angle_rad),
            ("px_per_mm", self.px_per_mm),
            ("min_duration_sec", self.min_duration_sec),
            ("pause_ratio_ceiling", self.pause_ratio_ceiling),
            ("pause_count_ceiling", self.pause_count_ceiling),
            ("path_length_ceiling_mm", self.path_length_ceiling_mm),
            ("change_rate_ceiling", self.change_rate_ceiling),
            ("speed_ceiling", self.speed_ceiling),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }

        let weights = [
            self.weight_smoothness,
            self.weight_pause_time,
            self.weight_pause_count,
            self.weight_length,
            self.weight_speed,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::InvalidConfig(
                "fluidity weights must be finite and >= 0".into(),
            ));
        }
        let sum = self.weight_sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(Error::InvalidConfig(format!(
                "fluidity weights must sum to 1.0, got {sum}"
            )));
        }

        Ok(())
    }
}

/// Parameters of a recording session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minimum time between two metric updates while the pen moves (ms)
    pub metrics_interval_ms: i64,
    /// Force stored for samples without a pressure reading
    pub default_force: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            metrics_interval_ms: METRICS_UPDATE_INTERVAL_MS,
            default_force: DEFAULT_FORCE,
        }
    }
}

// ============================================================================
// C ABI mirrors
// ============================================================================

/// Touch sample as passed over FFI. A NaN `force` means "no pressure reading".
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CTouchPoint {
    pub x: f64,
    pub y: f64,
    pub t_ms: i64,
    pub force: f64,
}

impl From<CTouchPoint> for Point {
    fn from(p: CTouchPoint) -> Self {
        Point {
            x: p.x,
            y: p.y,
            t: p.t_ms,
            force: (!p.force.is_nan()).then_some(p.force),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CWritingMetrics {
    pub applied_force: i64,
    pub pause_time: i64,
    pub pause_count: i64,
    pub speed_changes: i64,
    pub fluidity: i64,
    pub average_speed: i64,
    pub direction: i64,
    pub path_length: i64,
    pub corrections: i64,
    pub amplitude: i64,
    pub word_length: i64,
}

impl From<WritingMetrics> for CWritingMetrics {
    fn from(m: WritingMetrics) -> Self {
        CWritingMetrics {
            applied_force: m.applied_force.into(),
            pause_time: m.pause_time,
            pause_count: m.pause_count.into(),
            speed_changes: m.speed_changes.into(),
            fluidity: m.fluidity.into(),
            average_speed: m.average_speed,
            direction: m.direction,
            path_length: m.path_length,
            corrections: m.corrections.into(),
            amplitude: m.amplitude,
            word_length: m.word_length,
        }
    }
}
