//! Recording session coordinator.
//!
//! Owns the stroke collection being captured, the streaming speed state and
//! the metrics throttle. The metrics themselves are always recomputed from the
//! full snapshot, so throttling never changes the final result.

use crate::error::Result;
use crate::metrics::compute_metrics_with;
use crate::streaming::{playback_rate_for_speed, SpeedTracker};
use crate::types::{
    MetricsConfig, Point, SessionConfig, Stroke, StrokeCollection, WritingMetrics,
};

/// What a pen movement produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionUpdate {
    /// Instantaneous speed since the previous sample (px/s)
    pub speed: Option<f64>,
    /// Playback rate derived from `speed`
    pub playback_rate: Option<f64>,
    /// Fresh metrics, only when the throttle interval has elapsed
    pub metrics: Option<WritingMetrics>,
}

#[derive(Clone, Debug, Default)]
pub struct RecordingSession {
    metrics_config: MetricsConfig,
    config: SessionConfig,
    strokes: StrokeCollection,
    tracker: SpeedTracker,
    last_metrics_ms: Option<i64>,
    recording: bool,
    pen_is_down: bool,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with custom parameters. The metrics config is validated.
    pub fn with_config(metrics_config: MetricsConfig, config: SessionConfig) -> Result<Self> {
        if let Err(err) = metrics_config.validate() {
            log::warn!("Rejected metrics configuration: {}", err);
            return Err(err);
        }

        Ok(Self {
            metrics_config,
            config,
            ..Self::default()
        })
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Begin a new session, discarding the previous strokes.
    pub fn start(&mut self) {
        log::info!(
            "Recording started (previous session: {} strokes)",
            self.strokes.len()
        );
        self.strokes.clear();
        self.tracker.reset();
        self.last_metrics_ms = None;
        self.recording = true;
        self.pen_is_down = false;
    }

    /// Stop capturing. Strokes stay available for the summary.
    pub fn stop(&mut self) {
        if self.recording {
            log::info!(
                "Recording stopped: {} strokes, {} points",
                self.strokes.len(),
                self.strokes.point_count()
            );
        }
        self.recording = false;
        self.pen_is_down = false;
        self.tracker.reset();
    }

    /// Finger down. Returns `None` when not recording.
    pub fn pen_down(
        &mut self,
        x: f64,
        y: f64,
        t: i64,
        force: Option<f64>,
    ) -> Option<WritingMetrics> {
        if !self.recording {
            return None;
        }

        let point = self.make_point(x, y, t, force);
        self.strokes.begin_stroke(point);
        self.pen_is_down = true;
        self.tracker.reset();
        self.tracker.update(point);

        self.last_metrics_ms = Some(t);
        Some(self.metrics())
    }

    /// Finger moved. Ignored unless recording with an open stroke.
    pub fn pen_move(
        &mut self,
        x: f64,
        y: f64,
        t: i64,
        force: Option<f64>,
    ) -> Option<SessionUpdate> {
        if !self.recording || !self.pen_is_down {
            return None;
        }

        let point = self.make_point(x, y, t, force);
        self.strokes.push_point(point);

        let speed = self.tracker.update(point);
        let due = match self.last_metrics_ms {
            Some(last) => t.saturating_sub(last) >= self.config.metrics_interval_ms,
            None => true,
        };

        let metrics = if due {
            self.last_metrics_ms = Some(t);
            Some(self.metrics())
        } else {
            None
        };

        Some(SessionUpdate {
            speed,
            playback_rate: speed.map(playback_rate_for_speed),
            metrics,
        })
    }

    /// Finger lifted. Returns `None` when not recording.
    pub fn pen_up(&mut self) -> Option<WritingMetrics> {
        if !self.recording {
            return None;
        }

        self.pen_is_down = false;
        self.tracker.reset();
        self.last_metrics_ms = None;
        Some(self.metrics())
    }

    /// Recompute the metrics from the current snapshot.
    pub fn metrics(&self) -> WritingMetrics {
        compute_metrics_with(self.strokes.strokes(), &self.metrics_config)
    }

    pub fn strokes(&self) -> &[Stroke] {
        self.strokes.strokes()
    }

    pub fn stroke_collection(&self) -> &StrokeCollection {
        &self.strokes
    }

    fn make_point(&self, x: f64, y: f64, t: i64, force: Option<f64>) -> Point {
        Point {
            x,
            y,
            t,
            force: Some(force.unwrap_or(self.config.default_force)),
        }
    }
}
