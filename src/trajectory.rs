//! Trajectory points, motion phases and playback.
//!
//! The integrator runs at a millisecond step but callers animate or plot at a
//! much coarser rate, so points are thinned through `TrajectorySampler` and
//! read back through the `Trajectory` trait.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Motion phase of the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Flight,
    Bounce,
    Rolling,
    Stopped,
}

impl Phase {
    /// Whether moving from `self` to `next` is a legal phase change.
    ///
    /// Flight may only end in a bounce, except for the safety abort that
    /// forces a runaway flight straight to Stopped. Stopped is terminal.
    pub fn can_transition_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Flight, Flight)
                | (Flight, Bounce)
                | (Flight, Stopped)
                | (Bounce, Bounce)
                | (Bounce, Rolling)
                | (Bounce, Stopped)
                | (Rolling, Rolling)
                | (Rolling, Stopped)
        )
    }

    pub fn is_grounded(self) -> bool {
        !matches!(self, Phase::Flight)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Flight => "flight",
            Phase::Bounce => "bounce",
            Phase::Rolling => "rolling",
            Phase::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Single sampled trajectory point (time s, position m, phase)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub time: f64,
    pub position: Vector3<f64>,
    pub phase: Phase,
}

impl TrajectoryPoint {
    pub fn new(time: f64, position: Vector3<f64>, phase: Phase) -> Self {
        Self {
            time,
            position,
            phase,
        }
    }
}

/// Retains one point per fixed time interval out of a much finer
/// integration stream, plus any point pushed explicitly (phase changes).
#[derive(Debug, Clone)]
pub struct TrajectorySampler {
    interval: f64,
    next_sample_time: f64,
    points: Vec<TrajectoryPoint>,
}

impl TrajectorySampler {
    /// Sampling interval below 1 ms is raised to 1 ms
    pub fn new(interval: f64) -> Self {
        let interval = if interval.is_finite() { interval.max(0.001) } else { 0.001 };
        Self {
            interval,
            next_sample_time: 0.0,
            points: Vec::new(),
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Offer a point; kept only when its sample slot has come due.
    pub fn offer(&mut self, point: TrajectoryPoint) {
        if point.time + 1e-12 >= self.next_sample_time {
            self.push(point);
        }
    }

    /// Always keep this point and restart the sample clock from it.
    pub fn push(&mut self, point: TrajectoryPoint) {
        if let Some(last) = self.points.last() {
            debug_assert!(
                point.time >= last.time,
                "trajectory time went backwards: {} -> {}",
                last.time,
                point.time
            );
            debug_assert!(
                last.phase.can_transition_to(point.phase),
                "illegal phase change {} -> {}",
                last.phase,
                point.phase
            );
        }
        self.next_sample_time = point.time + self.interval;
        self.points.push(point);
    }

    pub fn extend(&mut self, points: impl IntoIterator<Item = TrajectoryPoint>) {
        for point in points {
            self.push(point);
        }
    }

    pub fn into_points(self) -> Vec<TrajectoryPoint> {
        self.points
    }
}

/// Read-only playback helpers over a sampled trajectory
pub trait Trajectory {
    /// Position at time `t`, linearly interpolated and clamped to the ends
    fn position_at(&self, t: f64) -> Option<Vector3<f64>>;

    /// Highest point of the trajectory
    fn apex(&self) -> Option<&TrajectoryPoint>;

    /// First point that is no longer in flight
    fn landing_point(&self) -> Option<&TrajectoryPoint>;

    /// Time of the last point
    fn duration(&self) -> f64;
}

impl Trajectory for [TrajectoryPoint] {
    fn position_at(&self, t: f64) -> Option<Vector3<f64>> {
        let first = self.first()?;
        let last = self.last()?;

        if t <= first.time {
            return Some(first.position);
        }
        if t >= last.time {
            return Some(last.position);
        }

        // Binary search for the correct interval
        let mut left = 0;
        let mut right = self.len() - 1;

        while right - left > 1 {
            let mid = (left + right) / 2;
            if self[mid].time <= t {
                left = mid;
            } else {
                right = mid;
            }
        }

        let p1 = &self[left];
        let p2 = &self[right];
        let span = p2.time - p1.time;
        if span.abs() < f64::EPSILON {
            return Some(p1.position);
        }

        let alpha = (t - p1.time) / span;
        Some(p1.position + (p2.position - p1.position) * alpha)
    }

    fn apex(&self) -> Option<&TrajectoryPoint> {
        self.iter()
            .max_by(|a, b| a.position.y.total_cmp(&b.position.y))
    }

    fn landing_point(&self) -> Option<&TrajectoryPoint> {
        self.iter().find(|p| p.phase.is_grounded())
    }

    fn duration(&self) -> f64 {
        self.last().map(|p| p.time).unwrap_or(0.0)
    }
}
