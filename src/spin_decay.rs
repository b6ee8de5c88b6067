//! Spin decay physics for golf ball flight.
//!
//! Spin is launched as a backspin and a sidespin component. Together they
//! define a spin axis tilted by atan2(sidespin, backspin) from horizontal.
//! The axis is held fixed for the whole flight and only the magnitude decays
//! exponentially: spin(t) = spin(0)·exp(-k·t).
//!
//! This is the simplified Magnus model. Real balls precess slightly as the
//! velocity vector rotates under them; that drift is not modeled, and a
//! future axis-drift extension would only change `SpinState::at`.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::units::{rad_s_to_rpm, rpm_to_rad_s};

/// Parameters affecting spin decay rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinDecayParameters {
    /// Exponential decay constant k (1/s)
    ///
    /// Value: 0.03 /s (roughly 3% of spin lost per second)
    /// Radar-tracked tour drives keep ~80% of their spin at landing
    /// after 6-7 s of flight.
    pub decay_rate_per_s: f64,
}

impl SpinDecayParameters {
    /// Create default parameters
    pub fn new() -> Self {
        Self {
            decay_rate_per_s: 0.03,
        }
    }

    /// Fraction of launch spin remaining after `time_elapsed_s`
    pub fn retention(&self, time_elapsed_s: f64) -> f64 {
        if time_elapsed_s <= 0.0 {
            return 1.0;
        }
        (-self.decay_rate_per_s.max(0.0) * time_elapsed_s).exp()
    }
}

impl Default for SpinDecayParameters {
    fn default() -> Self {
        Self::new()
    }
}

/// Spin as launched, resolved once into a fixed axis and a magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinState {
    /// Launch spin vector (rad/s) in world coordinates
    initial: Vector3<f64>,
    initial_backspin_rpm: f64,
    initial_sidespin_rpm: f64,
    params: SpinDecayParameters,
}

impl SpinState {
    /// Resolve launch spin into a world-space vector.
    ///
    /// Coordinates: x to the right of the target line, y up, z down-range.
    /// Backspin turns about -x so that ω × v lifts a forward-moving ball;
    /// positive sidespin turns about +y and curves the ball right.
    pub fn from_launch(backspin_rpm: f64, sidespin_rpm: f64, params: SpinDecayParameters) -> Self {
        let initial = Vector3::new(
            -rpm_to_rad_s(backspin_rpm),
            rpm_to_rad_s(sidespin_rpm),
            0.0,
        );
        Self {
            initial,
            initial_backspin_rpm: backspin_rpm,
            initial_sidespin_rpm: sidespin_rpm,
            params,
        }
    }

    /// Spin axis tilt from horizontal (radians), atan2(sidespin, backspin)
    pub fn axis_tilt(&self) -> f64 {
        self.initial_sidespin_rpm.atan2(self.initial_backspin_rpm)
    }

    /// Total spin magnitude at launch (rpm)
    pub fn initial_total_rpm(&self) -> f64 {
        rad_s_to_rpm(self.initial.norm())
    }

    /// Spin vector (rad/s) after `time_elapsed_s` of flight
    #[inline]
    pub fn at(&self, time_elapsed_s: f64) -> Vector3<f64> {
        self.initial * self.params.retention(time_elapsed_s)
    }

    /// Backspin component (rpm) after `time_elapsed_s`
    pub fn backspin_rpm_at(&self, time_elapsed_s: f64) -> f64 {
        self.initial_backspin_rpm * self.params.retention(time_elapsed_s)
    }

    /// Sidespin component (rpm) after `time_elapsed_s`
    pub fn sidespin_rpm_at(&self, time_elapsed_s: f64) -> f64 {
        self.initial_sidespin_rpm * self.params.retention(time_elapsed_s)
    }
}

/// Current spin vector from launch spin and elapsed flight time.
///
/// Convenience wrapper over [`SpinState`] for one-off evaluations.
pub fn decayed_spin(
    initial_backspin_rpm: f64,
    initial_sidespin_rpm: f64,
    time_elapsed_s: f64,
    params: &SpinDecayParameters,
) -> Vector3<f64> {
    SpinState::from_launch(initial_backspin_rpm, initial_sidespin_rpm, *params).at(time_elapsed_s)
}
