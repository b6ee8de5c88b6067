//! Bounce and roll physics after first ground contact.
//!
//! The ball runs a small state machine:
//!
//! ```text
//! Flight ──► Bounce ──► Bounce ... ──► Rolling ──► Stopped
//!               └─────────────────────────────────►┘
//! ```
//!
//! Every impact reverses the vertical velocity and scales it by a restitution
//! coefficient that drops with steeper impact angles, and strips horizontal
//! speed through surface friction that grows with backspin (a wedge "checks",
//! a driver releases). Once a rebound is too weak to leave the turf the ball
//! rolls under rolling friction plus a speed-proportional turf drag, which has
//! a closed-form solution, until it stops.

use log::{debug, trace};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{G_ACCEL_MPS2, MIN_VELOCITY_THRESHOLD};
use crate::trajectory::{Phase, TrajectoryPoint};

/// Turf response calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundCoefficients {
    /// Vertical restitution of a grazing impact
    pub restitution_base: f64,
    /// Restitution lost per unit sin(impact angle)
    pub restitution_angle_factor: f64,
    pub min_restitution: f64,
    pub max_restitution: f64,
    /// Fraction of horizontal speed lost per impact with no spin
    pub friction_base: f64,
    /// Extra horizontal loss at `spin_reference_rpm` of backspin on a vertical impact
    pub friction_spin_factor: f64,
    pub max_friction: f64,
    pub spin_reference_rpm: f64,
    /// Fraction of spin kept through each impact
    pub spin_retention_per_bounce: f64,
    /// Rebound vertical speed (m/s) below which the ball starts rolling
    pub roll_threshold_mps: f64,
    /// Rolling friction coefficient μ (deceleration μ·g)
    pub rolling_friction: f64,
    /// Speed-proportional turf drag (1/s)
    pub rolling_drag_per_s: f64,
    /// Horizontal speed (m/s) treated as at rest
    pub stop_speed_mps: f64,
    pub max_bounces: u32,
    /// Safety cap on time spent bouncing (s)
    pub max_ground_time_s: f64,
}

impl GroundCoefficients {
    /// Fairway-firmness defaults
    pub fn new() -> Self {
        Self {
            restitution_base: 0.50,
            restitution_angle_factor: 0.30,
            min_restitution: 0.05,
            max_restitution: 0.60,
            friction_base: 0.30,
            friction_spin_factor: 0.50,
            max_friction: 0.90,
            spin_reference_rpm: 10_000.0,
            spin_retention_per_bounce: 0.5,
            roll_threshold_mps: 1.5,
            rolling_friction: 0.25,
            rolling_drag_per_s: 0.5,
            stop_speed_mps: 0.05,
            max_bounces: 20,
            max_ground_time_s: crate::constants::MAX_GROUND_TIME,
        }
    }

    /// Vertical restitution for an impact at `impact_angle` (radians below horizontal)
    pub fn restitution(&self, impact_angle: f64) -> f64 {
        (self.restitution_base - self.restitution_angle_factor * impact_angle.sin())
            .clamp(self.min_restitution, self.max_restitution)
    }

    /// Fraction of horizontal speed removed by an impact
    pub fn impact_friction(&self, impact_angle: f64, backspin_rpm: f64) -> f64 {
        let spin_term = if self.spin_reference_rpm > 0.0 {
            backspin_rpm.max(0.0) / self.spin_reference_rpm
        } else {
            0.0
        };
        (self.friction_base + self.friction_spin_factor * spin_term * impact_angle.sin())
            .clamp(0.0, self.max_friction)
    }

    /// Speed-independent part of the rolling deceleration (m/s²)
    fn rolling_deceleration(&self) -> f64 {
        (self.rolling_friction * G_ACCEL_MPS2).max(1e-3)
    }
}

impl Default for GroundCoefficients {
    fn default() -> Self {
        Self::new()
    }
}

/// Ball state at the instant of first ground contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    pub time: f64,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub backspin_rpm: f64,
}

impl GroundContact {
    /// Angle of the velocity below horizontal (radians)
    pub fn landing_angle(&self) -> f64 {
        impact_angle(self.velocity.y.min(0.0).abs(), horizontal(&self.velocity).norm())
    }
}

/// Points and summary produced by the bounce/roll phases
#[derive(Debug, Clone, PartialEq)]
pub struct GroundOutcome {
    /// Starts with the contact point (Bounce) and ends Stopped
    pub points: Vec<TrajectoryPoint>,
    pub rest_position: Vector3<f64>,
    pub bounce_count: u32,
    /// Time since launch at which the ball came to rest (s)
    pub total_time: f64,
}

#[inline]
fn horizontal(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.x, 0.0, v.z)
}

#[inline]
fn impact_angle(vertical_speed: f64, horizontal_speed: f64) -> f64 {
    if vertical_speed < MIN_VELOCITY_THRESHOLD && horizontal_speed < MIN_VELOCITY_THRESHOLD {
        return 0.0;
    }
    vertical_speed.atan2(horizontal_speed)
}

/// Appends points while enforcing the phase state machine.
struct GroundPath {
    points: Vec<TrajectoryPoint>,
}

impl GroundPath {
    fn push(&mut self, time: f64, position: Vector3<f64>, phase: Phase) {
        if let Some(last) = self.points.last() {
            debug_assert!(
                last.phase.can_transition_to(phase),
                "illegal ground phase change {} -> {}",
                last.phase,
                phase
            );
        }
        self.points.push(TrajectoryPoint::new(time, position, phase));
    }
}

/// Distance and speed after `t` seconds of rolling from `v0`.
///
/// dv/dt = -(a0 + c·v), solved in closed form.
fn roll_state(v0: f64, a0: f64, c: f64, t: f64) -> (f64, f64) {
    if c < 1e-9 {
        let speed = (v0 - a0 * t).max(0.0);
        let distance = v0 * t - 0.5 * a0 * t * t;
        return (distance, speed);
    }
    let b = a0 / c;
    let decay = (-c * t).exp();
    let speed = ((v0 + b) * decay - b).max(0.0);
    let distance = (v0 + b) * (1.0 - decay) / c - b * t;
    (distance, speed)
}

/// Time for a roll starting at `v0` to come to rest.
fn roll_duration(v0: f64, a0: f64, c: f64) -> f64 {
    if v0 <= 0.0 {
        return 0.0;
    }
    if c < 1e-9 {
        return v0 / a0;
    }
    let b = a0 / c;
    ((v0 + b) / b).ln() / c
}

/// Resolve bounce and roll from the first ground contact to rest.
///
/// # Arguments
/// * `contact` - Landing state handed over by the flight integrator
/// * `coefficients` - Turf response
/// * `sample_interval` - Spacing of emitted points (s)
pub fn resolve_ground_contact(
    contact: &GroundContact,
    coefficients: &GroundCoefficients,
    sample_interval: f64,
) -> GroundOutcome {
    let sample_interval = sample_interval.max(0.001);
    let mut path = GroundPath { points: Vec::new() };

    let mut time = contact.time;
    let mut position = Vector3::new(contact.position.x, 0.0, contact.position.z);
    let mut horizontal_velocity = horizontal(&contact.velocity);
    let mut vertical_speed = contact.velocity.y.min(0.0).abs();
    let mut backspin_rpm = contact.backspin_rpm;
    let mut bounce_count = 0u32;

    path.push(time, position, Phase::Bounce);

    // Bounce phase
    loop {
        let angle = impact_angle(vertical_speed, horizontal_velocity.norm());
        let restitution = coefficients.restitution(angle);
        let friction = coefficients.impact_friction(angle, backspin_rpm);

        vertical_speed *= restitution;
        horizontal_velocity *= 1.0 - friction;
        backspin_rpm *= coefficients.spin_retention_per_bounce;

        trace!(
            "impact {} at t={:.3}: angle {:.1} deg, e={:.3}, friction={:.3}, rebound {:.2} m/s",
            bounce_count + 1,
            time,
            angle.to_degrees(),
            restitution,
            friction,
            vertical_speed
        );

        if vertical_speed < coefficients.roll_threshold_mps
            || bounce_count >= coefficients.max_bounces
            || time - contact.time >= coefficients.max_ground_time_s
        {
            break;
        }

        // Ballistic hop; aerodynamic forces are negligible this close to the turf
        bounce_count += 1;
        let hop_time = 2.0 * vertical_speed / G_ACCEL_MPS2;
        let mut t = sample_interval;
        while t < hop_time {
            let height = vertical_speed * t - 0.5 * G_ACCEL_MPS2 * t * t;
            let hop_position = position + horizontal_velocity * t + Vector3::new(0.0, height.max(0.0), 0.0);
            path.push(time + t, hop_position, Phase::Bounce);
            t += sample_interval;
        }
        time += hop_time;
        position += horizontal_velocity * hop_time;
        path.push(time, position, Phase::Bounce);
    }

    // Rolling phase
    let roll_speed = horizontal_velocity.norm();
    if roll_speed > coefficients.stop_speed_mps {
        let direction = horizontal_velocity / roll_speed;
        let a0 = coefficients.rolling_deceleration();
        let c = coefficients.rolling_drag_per_s.max(0.0);
        let duration = roll_duration(roll_speed, a0, c);

        path.push(time, position, Phase::Rolling);
        let mut t = sample_interval;
        while t < duration {
            let (distance, _) = roll_state(roll_speed, a0, c, t);
            path.push(time + t, position + direction * distance, Phase::Rolling);
            t += sample_interval;
        }
        let (distance, _) = roll_state(roll_speed, a0, c, duration);
        time += duration;
        position += direction * distance.max(0.0);
    }

    path.push(time, position, Phase::Stopped);

    debug!(
        "ball at rest after {} bounce(s), {:.2} s on the ground, rest x={:.2} z={:.2}",
        bounce_count,
        time - contact.time,
        position.x,
        position.z
    );

    GroundOutcome {
        points: path.points,
        rest_position: position,
        bounce_count,
        total_time: time,
    }
}
