//! Stroke-to-metrics engine: four independent analyzers + one aggregator.

use crate::types::{MetricsConfig, Point, Stroke, WritingMetrics};

/// Result of the pause pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PauseStats {
    pub total_pause_ms: i64,
    pub pause_count: u32,
}

/// Result of the speed pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpeedStats {
    /// Sum of segment lengths (px)
    pub total_distance: f64,
    /// One instantaneous speed (px/s) per accepted segment
    pub speeds: Vec<f64>,
    pub sudden_changes: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

// ============================================================================
// PAUSE ANALYZER
// ============================================================================

/// Sum the gaps between consecutive strokes that exceed the pause threshold.
///
/// Only the gap from the last point of one stroke to the first point of the
/// next is considered; nothing inside a stroke counts as a pause.
pub fn compute_pause_stats(strokes: &[Stroke], pause_threshold_ms: i64) -> PauseStats {
    let mut stats = PauseStats::default();

    for pair in strokes.windows(2) {
        let (Some(last), Some(first_next)) = (pair[0].last(), pair[1].first()) else {
            continue;
        };

        let gap = first_next.t.saturating_sub(last.t);
        if gap > pause_threshold_ms {
            stats.total_pause_ms = stats.total_pause_ms.saturating_add(gap);
            stats.pause_count += 1;
        }
    }

    stats
}

// ============================================================================
// SPEED ANALYZER
// ============================================================================

/// Walk every segment of every stroke, accumulating distance and speeds.
///
/// The previous speed carries over pen lifts, so the first segment of a
/// stroke is compared with the last segment of the stroke before it.
pub fn compute_speed_stats(strokes: &[Stroke], speed_change_threshold: f64) -> SpeedStats {
    let mut stats = SpeedStats::default();
    let mut last_speed: Option<f64> = None;
    let mut skipped = 0usize;

    for stroke in strokes {
        for segment in stroke.windows(2) {
            let (p0, p1) = (&segment[0], &segment[1]);
            // Duplicate, out-of-order or unrepresentable time deltas
            let dt_ms = match p1.t.checked_sub(p0.t) {
                Some(dt) if dt > 0 => dt,
                _ => {
                    skipped += 1;
                    continue;
                }
            };
            let dt_sec = dt_ms as f64 / 1000.0;

            let dist = p0.distance_to(p1);
            let speed = dist / dt_sec;

            stats.total_distance += dist;
            stats.speeds.push(speed);

            if let Some(previous) = last_speed {
                if (speed - previous).abs() > speed_change_threshold {
                    stats.sudden_changes += 1;
                }
            }
            last_speed = Some(speed);
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} segments with non-positive time delta", skipped);
    }

    stats
}

// ============================================================================
// GEOMETRY ANALYZER
// ============================================================================

/// Bounding box over all points, across stroke boundaries.
///
/// Returns `None` for an empty input.
pub fn compute_bounding_box<'a, I>(points: I) -> Option<BoundingBox>
where
    I: IntoIterator<Item = &'a Point>,
{
    let mut iter = points.into_iter();
    let first = iter.next()?;

    let init = BoundingBox {
        min_x: first.x,
        max_x: first.x,
        min_y: first.y,
        max_y: first.y,
    };

    Some(iter.fold(init, |b, p| BoundingBox {
        min_x: b.min_x.min(p.x),
        max_x: b.max_x.max(p.x),
        min_y: b.min_y.min(p.y),
        max_y: b.max_y.max(p.y),
    }))
}

/// Global writing direction in degrees, from the first to the last point.
///
/// Screen coordinates: 0 is rightward and 90 is downward.
pub fn compute_direction(first: &Point, last: &Point) -> f64 {
    (last.y - first.y).atan2(last.x - first.x).to_degrees()
}

// ============================================================================
// CORRECTION ANALYZER
// ============================================================================

/// Count sharp turns between consecutive segments within each stroke.
pub fn compute_corrections(strokes: &[Stroke], correction_angle_rad: f64) -> u32 {
    let mut corrections = 0;

    for stroke in strokes {
        for triple in stroke.windows(3) {
            let (a, b, c) = (&triple[0], &triple[1], &triple[2]);

            let angle1 = (b.y - a.y).atan2(b.x - a.x);
            let angle2 = (c.y - b.y).atan2(c.x - b.x);

            if turn_angle(angle1, angle2) > correction_angle_rad {
                corrections += 1;
            }
        }
    }

    corrections
}

/// Shortest angular distance between two headings, in [0, PI].
fn turn_angle(angle1: f64, angle2: f64) -> f64 {
    let diff = (angle2 - angle1).abs();
    if diff > std::f64::consts::PI {
        std::f64::consts::TAU - diff
    } else {
        diff
    }
}

// ============================================================================
// PUBLIC API: Aggregation & Fluidity Scoring
// ============================================================================

/// Compute all metrics with the default configuration.
pub fn compute_metrics(strokes: &[Stroke]) -> WritingMetrics {
    compute_metrics_with(strokes, &MetricsConfig::default())
}

/// Compute all metrics for one stroke collection snapshot.
///
/// Total over well-formed input: fewer than two points yield
/// [`WritingMetrics::EMPTY`], and no field is ever NaN.
pub fn compute_metrics_with(strokes: &[Stroke], config: &MetricsConfig) -> WritingMetrics {
    let all_points: Vec<&Point> = strokes.iter().flatten().collect();
    let (first_point, last_point) = match all_points.as_slice() {
        [first, .., last] => (*first, *last),
        _ => return WritingMetrics::EMPTY,
    };

    let pauses = compute_pause_stats(strokes, config.pause_threshold_ms);
    let speed = compute_speed_stats(strokes, config.speed_change_threshold);
    let corrections = compute_corrections(strokes, config.correction_angle_rad);
    let Some(bbox) = compute_bounding_box(all_points.iter().copied()) else {
        return WritingMetrics::EMPTY;
    };

    let total_time_ms = last_point.t.saturating_sub(first_point.t);
    let effective_drawing_ms = total_time_ms.saturating_sub(pauses.total_pause_ms).max(0);
    let duration_sec = (effective_drawing_ms as f64 / 1000.0).max(config.min_duration_sec);

    let average_speed = speed.total_distance / duration_sec;
    let path_length_mm = speed.total_distance / config.px_per_mm;
    let word_length_mm = bbox.width() / config.px_per_mm;
    let amplitude_mm = bbox.height() / config.px_per_mm;

    let fluidity_score = fluidity_score(
        &pauses,
        &speed,
        total_time_ms,
        path_length_mm,
        average_speed,
        config,
    );

    let mut direction = round_half_up(compute_direction(first_point, last_point));
    if direction == -180 {
        direction = 180;
    }

    let metrics = WritingMetrics {
        applied_force: average_force(&all_points),
        pause_time: pauses.total_pause_ms,
        pause_count: pauses.pause_count,
        speed_changes: speed.sudden_changes,
        fluidity: round_half_up(fluidity_score * 100.0).clamp(0, 100) as u8,
        average_speed: round_half_up(average_speed),
        direction,
        path_length: round_half_up(path_length_mm),
        corrections,
        amplitude: round_half_up(amplitude_mm),
        word_length: round_half_up(word_length_mm),
    };

    log::debug!(
        "Metrics over {} strokes / {} points: fluidity={} speed={}px/s pauses={}",
        strokes.len(),
        all_points.len(),
        metrics.fluidity,
        metrics.average_speed,
        metrics.pause_count
    );

    metrics
}

/// Weighted blend of the five sub-scores, each clamped to [0, 1].
fn fluidity_score(
    pauses: &PauseStats,
    speed: &SpeedStats,
    total_time_ms: i64,
    path_length_mm: f64,
    average_speed: f64,
    config: &MetricsConfig,
) -> f64 {
    let pause_ratio = if total_time_ms > 0 {
        pauses.total_pause_ms as f64 / total_time_ms as f64
    } else {
        0.0
    };
    let pause_time_score = 1.0 - unit_clamp(pause_ratio / config.pause_ratio_ceiling);
    let pause_count_score =
        1.0 - unit_clamp(f64::from(pauses.pause_count) / config.pause_count_ceiling);
    let length_score = unit_clamp(path_length_mm / config.path_length_ceiling_mm);

    let smoothness_score = if speed.speeds.len() < 2 {
        1.0
    } else {
        let change_rate = f64::from(speed.sudden_changes) / speed.speeds.len() as f64;
        1.0 - unit_clamp(change_rate / config.change_rate_ceiling)
    };

    let speed_score = unit_clamp(average_speed / config.speed_ceiling);

    config.weight_smoothness * smoothness_score
        + config.weight_pause_time * pause_time_score
        + config.weight_pause_count * pause_count_score
        + config.weight_length * length_score
        + config.weight_speed * speed_score
}

/// Mean of the usable force readings as a 0-100 percentage; 0 when none.
fn average_force(points: &[&Point]) -> u8 {
    let (sum, count) = points
        .iter()
        .filter_map(|p| p.valid_force())
        .fold((0.0, 0usize), |(sum, count), f| (sum + f, count + 1));

    if count == 0 {
        return 0;
    }

    round_half_up(sum / count as f64 * 100.0).clamp(0, 100) as u8
}

fn unit_clamp(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Round to nearest, halves toward positive infinity.
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
