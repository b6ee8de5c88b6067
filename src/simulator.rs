//! Golf shot simulator.
//!
//! Integrates the ball through the air with fixed-step RK4 under gravity,
//! drag and Magnus lift, refines the ground crossing with a Newton-corrected
//! partial step, then hands the landing state to the ground model for bounce
//! and roll. Carry and total are horizontal distances from the tee.

use log::{debug, warn};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::aerodynamics::compute_forces;
use crate::atmosphere::AtmosphericConditions;
use crate::config::SimulationConfig;
use crate::constants::{
    BALL_MASS_KG, G_ACCEL_MPS2, MAX_AZIMUTH_DEG, MAX_BALL_SPEED_MPH, MAX_ITERATIONS,
    MAX_LAUNCH_ANGLE_DEG, MAX_SPIN_RPM,
};
use crate::ground::{resolve_ground_contact, GroundContact};
use crate::spin_decay::SpinState;
use crate::trajectory::{Phase, TrajectoryPoint, TrajectorySampler};
use crate::units::{meters_to_yards, mph_to_mps, mps_to_mph};

/// Launch conditions as a launch monitor reports them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchParameters {
    /// Ball speed (mph)
    pub ball_speed_mph: f64,
    /// Vertical launch angle above horizontal (degrees)
    pub launch_angle_deg: f64,
    /// Horizontal launch direction, positive right of the target line (degrees)
    pub azimuth_deg: f64,
    pub backspin_rpm: f64,
    /// Positive curves the ball right
    pub sidespin_rpm: f64,
}

fn clamp_input(value: f64, min: f64, max: f64, name: &str) -> f64 {
    if !value.is_finite() {
        warn!("non-finite {name} ({value}), using 0");
        return 0.0;
    }
    if value < min || value > max {
        warn!("{name} {value} outside [{min}, {max}], clamping");
    }
    value.clamp(min, max)
}

impl LaunchParameters {
    pub fn new(
        ball_speed_mph: f64,
        launch_angle_deg: f64,
        azimuth_deg: f64,
        backspin_rpm: f64,
        sidespin_rpm: f64,
    ) -> Self {
        Self {
            ball_speed_mph,
            launch_angle_deg,
            azimuth_deg,
            backspin_rpm,
            sidespin_rpm,
        }
    }

    /// Straight shot with pure backspin
    pub fn straight(ball_speed_mph: f64, launch_angle_deg: f64, backspin_rpm: f64) -> Self {
        Self::new(ball_speed_mph, launch_angle_deg, 0.0, backspin_rpm, 0.0)
    }

    /// Copy with every field clamped to its supported domain and NaN replaced by 0.
    pub fn sanitized(&self) -> Self {
        Self {
            ball_speed_mph: clamp_input(self.ball_speed_mph, 0.0, MAX_BALL_SPEED_MPH, "ball_speed_mph"),
            launch_angle_deg: clamp_input(self.launch_angle_deg, 0.0, MAX_LAUNCH_ANGLE_DEG, "launch_angle_deg"),
            azimuth_deg: clamp_input(self.azimuth_deg, -MAX_AZIMUTH_DEG, MAX_AZIMUTH_DEG, "azimuth_deg"),
            backspin_rpm: clamp_input(self.backspin_rpm, -MAX_SPIN_RPM, MAX_SPIN_RPM, "backspin_rpm"),
            sidespin_rpm: clamp_input(self.sidespin_rpm, -MAX_SPIN_RPM, MAX_SPIN_RPM, "sidespin_rpm"),
        }
    }

    /// Initial velocity (m/s): x right, y up, z down-range
    pub fn initial_velocity(&self) -> Vector3<f64> {
        let speed = mph_to_mps(self.ball_speed_mph);
        let elevation = self.launch_angle_deg.to_radians();
        let azimuth = self.azimuth_deg.to_radians();
        let horizontal = speed * elevation.cos();
        Vector3::new(
            horizontal * azimuth.sin(),
            speed * elevation.sin(),
            horizontal * azimuth.cos(),
        )
    }
}

/// Ball state during flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub time: f64,
    pub phase: Phase,
}

impl BallState {
    pub fn at_launch(launch: &LaunchParameters) -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: launch.initial_velocity(),
            time: 0.0,
            phase: Phase::Flight,
        }
    }

    fn point(&self) -> TrajectoryPoint {
        TrajectoryPoint::new(self.time, self.position, self.phase)
    }

    /// Distance from the tee in the ground plane (m)
    fn horizontal_distance(&self) -> f64 {
        self.position.x.hypot(self.position.z)
    }
}

/// Newton corrections applied to the ground-crossing step length
const CROSSING_ITERATIONS: usize = 6;

/// Outcome of one simulated shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotResult {
    pub carry_yards: f64,
    pub total_yards: f64,
    pub roll_yards: f64,
    /// Lateral distance at rest, positive right
    pub offline_yards: f64,
    pub max_height_yards: f64,
    pub flight_time_s: f64,
    pub total_time_s: f64,
    pub bounce_count: u32,
    /// Descent angle below horizontal at first contact
    pub landing_angle_deg: f64,
    pub landing_speed_mph: f64,
    pub landing_backspin_rpm: f64,
    pub landing_sidespin_rpm: f64,
    /// kg/m³
    pub air_density: f64,
    /// Flight exceeded the time cap and was stopped in the air
    pub terminated_by_cap: bool,
    pub trajectory: Vec<TrajectoryPoint>,
}

/// Shot simulator for one launch under one set of conditions
#[derive(Debug, Clone)]
pub struct FlightSimulator {
    launch: LaunchParameters,
    atmosphere: AtmosphericConditions,
    config: SimulationConfig,
    air_density: f64,
    spin: SpinState,
}

impl FlightSimulator {
    pub fn new(launch: LaunchParameters, atmosphere: AtmosphericConditions) -> Self {
        Self::with_config(launch, atmosphere, SimulationConfig::default())
    }

    pub fn with_config(
        launch: LaunchParameters,
        atmosphere: AtmosphericConditions,
        config: SimulationConfig,
    ) -> Self {
        let launch = launch.sanitized();
        let air_density = atmosphere.air_density();
        let spin = SpinState::from_launch(launch.backspin_rpm, launch.sidespin_rpm, config.spin_decay);
        Self {
            launch,
            atmosphere,
            config,
            air_density,
            spin,
        }
    }

    pub fn set_time_step(&mut self, step: f64) {
        self.config.set_time_step(step);
    }

    pub fn set_sample_interval(&mut self, interval: f64) {
        self.config.set_sample_interval(interval);
    }

    pub fn set_max_flight_time(&mut self, seconds: f64) {
        self.config.set_max_flight_time(seconds);
    }

    pub fn launch(&self) -> &LaunchParameters {
        &self.launch
    }

    pub fn atmosphere(&self) -> &AtmosphericConditions {
        &self.atmosphere
    }

    pub fn air_density(&self) -> f64 {
        self.air_density
    }

    /// Acceleration from gravity plus aerodynamic forces at time `t`
    fn acceleration(&self, velocity: &Vector3<f64>, t: f64) -> Vector3<f64> {
        let spin = self.spin.at(t);
        let forces = compute_forces(velocity, &spin, self.air_density, &self.config.aero);
        forces.total() / BALL_MASS_KG + Vector3::new(0.0, -G_ACCEL_MPS2, 0.0)
    }

    /// One RK4 step of length `dt`
    fn rk4_step(&self, state: &BallState, dt: f64) -> BallState {
        let t = state.time;
        let position = state.position;
        let velocity = state.velocity;

        // k1
        let acc1 = self.acceleration(&velocity, t);

        // k2
        let vel2 = velocity + acc1 * (dt * 0.5);
        let acc2 = self.acceleration(&vel2, t + dt * 0.5);

        // k3
        let vel3 = velocity + acc2 * (dt * 0.5);
        let acc3 = self.acceleration(&vel3, t + dt * 0.5);

        // k4
        let vel4 = velocity + acc3 * dt;
        let acc4 = self.acceleration(&vel4, t + dt);

        BallState {
            position: position + (velocity + vel2 * 2.0 + vel3 * 2.0 + vel4) * (dt / 6.0),
            velocity: velocity + (acc1 + acc2 * 2.0 + acc3 * 2.0 + acc4) * (dt / 6.0),
            time: t + dt,
            phase: Phase::Flight,
        }
    }

    /// Land exactly on y = 0 between `before` (above) and `after` (below).
    ///
    /// A ball that sinks during the very first step never left the turf: it
    /// touches down at the end of that step with its vertical speed removed,
    /// so contact always comes after a non-zero flight.
    fn refine_ground_crossing(&self, before: &BallState, after: &BallState, dt: f64) -> BallState {
        let drop = before.position.y - after.position.y;
        if before.time <= 0.0 || before.position.y <= 0.0 || drop <= 0.0 {
            let mut landed = *after;
            landed.position.y = 0.0;
            landed.velocity.y = landed.velocity.y.max(0.0);
            landed.phase = Phase::Bounce;
            return landed;
        }

        // Linear guess, then Newton on y(fraction) = 0 with dy/dfraction = vy·dt
        let mut fraction = (before.position.y / drop).clamp(0.0, 1.0);
        let mut landed = self.rk4_step(before, fraction * dt);
        for _ in 0..CROSSING_ITERATIONS {
            let slope = landed.velocity.y * dt;
            if landed.position.y.abs() < 1e-12 || slope.abs() < 1e-12 {
                break;
            }
            fraction = (fraction - landed.position.y / slope).clamp(0.0, 1.0);
            landed = self.rk4_step(before, fraction * dt);
        }
        landed.position.y = 0.0;
        landed.phase = Phase::Bounce;
        landed
    }

    /// Run the shot from launch to rest.
    pub fn solve(&self) -> ShotResult {
        let dt = if self.config.time_step.is_finite() && self.config.time_step > 0.0 {
            self.config.time_step
        } else {
            warn!("invalid time step {}, using default", self.config.time_step);
            crate::constants::DEFAULT_TIME_STEP
        };
        let max_flight_time = self.config.max_flight_time;

        debug!(
            "simulating {:.1} mph at {:.1} deg, azimuth {:.1} deg, {:.0}/{:.0} rpm, air density {:.4}",
            self.launch.ball_speed_mph,
            self.launch.launch_angle_deg,
            self.launch.azimuth_deg,
            self.launch.backspin_rpm,
            self.launch.sidespin_rpm,
            self.air_density
        );

        let mut sampler = TrajectorySampler::new(self.config.sample_interval);
        let mut state = BallState::at_launch(&self.launch);
        let mut max_height = 0.0f64;
        sampler.push(state.point());

        let mut landing = None;
        let mut steps = 0usize;
        while state.time < max_flight_time && steps < MAX_ITERATIONS {
            steps += 1;
            let next = self.rk4_step(&state, dt);
            if next.position.y < 0.0 {
                landing = Some(self.refine_ground_crossing(&state, &next, dt));
                break;
            }
            max_height = max_height.max(next.position.y);
            sampler.offer(next.point());
            state = next;
        }

        let Some(landed) = landing else {
            return self.capped_result(state, sampler, max_height);
        };

        let contact = GroundContact {
            time: landed.time,
            position: landed.position,
            velocity: landed.velocity,
            backspin_rpm: self.spin.backspin_rpm_at(landed.time),
        };
        let outcome = resolve_ground_contact(&contact, &self.config.ground, sampler.interval());
        sampler.extend(outcome.points);

        let carry_m = landed.horizontal_distance();
        let total_m = outcome.rest_position.x.hypot(outcome.rest_position.z).max(carry_m);
        let roll_m = total_m - carry_m;
        let result = ShotResult {
            carry_yards: meters_to_yards(carry_m),
            total_yards: meters_to_yards(total_m),
            roll_yards: meters_to_yards(roll_m),
            offline_yards: meters_to_yards(outcome.rest_position.x),
            max_height_yards: meters_to_yards(max_height),
            flight_time_s: landed.time,
            total_time_s: outcome.total_time,
            bounce_count: outcome.bounce_count,
            landing_angle_deg: contact.landing_angle().to_degrees(),
            landing_speed_mph: mps_to_mph(landed.velocity.norm()),
            landing_backspin_rpm: contact.backspin_rpm,
            landing_sidespin_rpm: self.spin.sidespin_rpm_at(landed.time),
            air_density: self.air_density,
            terminated_by_cap: false,
            trajectory: sampler.into_points(),
        };

        debug!(
            "carry {:.1} yd, total {:.1} yd, offline {:.1} yd, apex {:.1} yd, {} bounce(s), landing {:.1} deg",
            result.carry_yards,
            result.total_yards,
            result.offline_yards,
            result.max_height_yards,
            result.bounce_count,
            result.landing_angle_deg
        );

        result
    }

    /// Result for a flight that never came down within the time or step cap.
    fn capped_result(&self, state: BallState, mut sampler: TrajectorySampler, max_height: f64) -> ShotResult {
        warn!(
            "flight stopped after {:.3} s without ground contact (cap {:.1} s, {} steps), height {:.2} m",
            state.time, self.config.max_flight_time, MAX_ITERATIONS, state.position.y
        );
        let stopped = BallState {
            phase: Phase::Stopped,
            ..state
        };
        sampler.push(stopped.point());

        let carry_m = state.horizontal_distance();
        let horizontal_speed = state.velocity.x.hypot(state.velocity.z);
        ShotResult {
            carry_yards: meters_to_yards(carry_m),
            total_yards: meters_to_yards(carry_m),
            roll_yards: 0.0,
            offline_yards: meters_to_yards(state.position.x),
            max_height_yards: meters_to_yards(max_height),
            flight_time_s: state.time,
            total_time_s: state.time,
            bounce_count: 0,
            landing_angle_deg: (-state.velocity.y).atan2(horizontal_speed).to_degrees(),
            landing_speed_mph: mps_to_mph(state.velocity.norm()),
            landing_backspin_rpm: self.spin.backspin_rpm_at(state.time),
            landing_sidespin_rpm: self.spin.sidespin_rpm_at(state.time),
            air_density: self.air_density,
            terminated_by_cap: true,
            trajectory: sampler.into_points(),
        }
    }
}

/// Simulate a shot with the default configuration.
pub fn simulate(launch: LaunchParameters, atmosphere: AtmosphericConditions) -> ShotResult {
    FlightSimulator::new(launch, atmosphere).solve()
}

/// Simulate a shot with a custom configuration.
pub fn simulate_with_config(
    launch: LaunchParameters,
    atmosphere: AtmosphericConditions,
    config: &SimulationConfig,
) -> ShotResult {
    FlightSimulator::with_config(launch, atmosphere, config.clone()).solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_TIME_STEP;
    use crate::trajectory::Trajectory;
    use approx::assert_relative_eq;

    fn driver() -> LaunchParameters {
        LaunchParameters::straight(171.0, 10.4, 2545.0)
    }

    #[test]
    fn test_initial_velocity_components() {
        let launch = LaunchParameters::new(100.0, 30.0, 10.0, 0.0, 0.0);
        let v = launch.initial_velocity();
        let speed = mph_to_mps(100.0);
        assert_relative_eq!(v.norm(), speed, epsilon = 1e-12);
        assert_relative_eq!(v.y, speed * 0.5, epsilon = 1e-12);
        assert!(v.x > 0.0);
        assert!(v.z > v.x);
    }

    #[test]
    fn test_sanitized_clamps_and_replaces_nan() {
        let wild = LaunchParameters::new(f64::NAN, 120.0, -90.0, 50_000.0, f64::INFINITY);
        let clean = wild.sanitized();
        assert_eq!(clean.ball_speed_mph, 0.0);
        assert_eq!(clean.launch_angle_deg, MAX_LAUNCH_ANGLE_DEG);
        assert_eq!(clean.azimuth_deg, -MAX_AZIMUTH_DEG);
        assert_eq!(clean.backspin_rpm, MAX_SPIN_RPM);
        assert_eq!(clean.sidespin_rpm, 0.0);
    }

    #[test]
    fn test_driver_shape() {
        let result = simulate(driver(), AtmosphericConditions::standard());
        assert!(result.carry_yards > 250.0 && result.carry_yards < 300.0);
        assert!(result.total_yards >= result.carry_yards);
        assert_relative_eq!(result.roll_yards, result.total_yards - result.carry_yards, epsilon = 1e-9);
        assert!(result.flight_time_s > 5.0 && result.flight_time_s < 8.0);
        assert!(result.max_height_yards > 20.0 && result.max_height_yards < 50.0);
        assert!(result.landing_speed_mph < 171.0);
        assert!(result.landing_backspin_rpm < 2545.0);
        assert!(!result.terminated_by_cap);
    }

    #[test]
    fn test_trajectory_sampling() {
        let result = simulate(driver(), AtmosphericConditions::standard());
        let points = &result.trajectory;
        assert_eq!(points[0].phase, Phase::Flight);
        assert_eq!(points[0].time, 0.0);
        assert_eq!(points.last().unwrap().phase, Phase::Stopped);

        // Exact transition point is recorded at ground level
        let landing = points.landing_point().unwrap();
        assert_eq!(landing.phase, Phase::Bounce);
        assert_eq!(landing.position.y, 0.0);
        assert_relative_eq!(landing.time, result.flight_time_s, epsilon = 1e-12);
        assert_relative_eq!(meters_to_yards(landing.position.z), result.carry_yards, epsilon = 1e-9);

        // Flight samples are 20 ms apart
        let flight: Vec<_> = points.iter().filter(|p| p.phase == Phase::Flight).collect();
        assert!(flight.windows(2).all(|w| (w[1].time - w[0].time - 0.02).abs() < 1e-6));
        assert_relative_eq!(points.duration(), result.total_time_s, epsilon = 1e-12);
    }

    #[test]
    fn test_apex_matches_max_height() {
        let result = simulate(driver(), AtmosphericConditions::standard());
        let apex = result.trajectory.apex().unwrap();
        // Sampled apex can only miss the true one by a fraction of a 20 ms step
        assert!(meters_to_yards(apex.position.y) <= result.max_height_yards + 1e-9);
        assert!(result.max_height_yards - meters_to_yards(apex.position.y) < 0.1);
    }

    #[test]
    fn test_sidespin_and_azimuth_go_right() {
        let fade = simulate(LaunchParameters::new(150.0, 12.0, 0.0, 3000.0, 800.0), AtmosphericConditions::standard());
        assert!(fade.offline_yards > 5.0);
        let draw = simulate(LaunchParameters::new(150.0, 12.0, 0.0, 3000.0, -800.0), AtmosphericConditions::standard());
        assert!(draw.offline_yards < -5.0);
        let push = simulate(LaunchParameters::new(150.0, 12.0, 4.0, 3000.0, 0.0), AtmosphericConditions::standard());
        assert!(push.offline_yards > 5.0);
        assert!(fade.landing_sidespin_rpm > 0.0 && fade.landing_sidespin_rpm < 800.0);
    }

    #[test]
    fn test_zero_speed_is_finite() {
        let result = simulate(LaunchParameters::straight(0.0, 20.0, 3000.0), AtmosphericConditions::standard());
        assert!(result.carry_yards < 1e-6);
        assert!(result.total_yards < 1e-6);
        assert_eq!(result.trajectory.last().unwrap().phase, Phase::Stopped);
        assert!(result.landing_angle_deg.is_finite());
    }

    #[test]
    fn test_flat_launch_touches_down_after_one_step() {
        for launch in [LaunchParameters::straight(100.0, 0.0, 1000.0), LaunchParameters::straight(150.0, 0.0, 0.0)] {
            let result = simulate(launch, AtmosphericConditions::standard());
            assert_relative_eq!(result.flight_time_s, DEFAULT_TIME_STEP, epsilon = 1e-12);
            assert!(result.landing_speed_mph < launch.ball_speed_mph);
            assert_eq!(result.landing_angle_deg, 0.0);
            if launch.backspin_rpm > 0.0 {
                assert!(result.landing_backspin_rpm < launch.backspin_rpm);
            }
            // Skids out along the ground instead of stopping at the tee
            assert_eq!(result.bounce_count, 0);
            assert!(result.roll_yards > 10.0);
            assert!(result.total_time_s > result.flight_time_s);
            let landing = result.trajectory.landing_point().unwrap();
            assert!(landing.time > 0.0);
        }
    }

    #[test]
    fn test_crossing_lands_on_the_ground_plane() {
        let result = simulate(LaunchParameters::straight(120.0, 16.3, 7097.0), AtmosphericConditions::standard());
        let landing = result.trajectory.landing_point().unwrap();
        let last_flight = result
            .trajectory
            .iter()
            .filter(|p| p.phase == Phase::Flight)
            .last()
            .unwrap();
        assert!(landing.time > last_flight.time);
        assert!(landing.position.z > last_flight.position.z);
        assert!(result.landing_angle_deg > 30.0);
    }

    #[test]
    fn test_carry_is_horizontal_distance() {
        let pushed = simulate(LaunchParameters::new(150.0, 12.0, 20.0, 3000.0, 0.0), AtmosphericConditions::standard());
        let straight = simulate(LaunchParameters::straight(150.0, 12.0, 3000.0), AtmosphericConditions::standard());
        let landing = pushed.trajectory.landing_point().unwrap();
        let carry = meters_to_yards(landing.position.x.hypot(landing.position.z));
        assert_relative_eq!(pushed.carry_yards, carry, epsilon = 1e-9);
        assert!(pushed.carry_yards > meters_to_yards(landing.position.z) + 10.0);
        // Aiming off line does not shorten the shot
        assert_relative_eq!(pushed.carry_yards, straight.carry_yards, max_relative = 0.01);
        assert_relative_eq!(pushed.total_yards, straight.total_yards, max_relative = 0.01);

        let rest = pushed.trajectory.last().unwrap();
        assert_relative_eq!(
            pushed.total_yards,
            meters_to_yards(rest.position.x.hypot(rest.position.z)),
            epsilon = 1e-9
        );
        assert!(pushed.total_yards >= pushed.carry_yards);
        assert_relative_eq!(pushed.offline_yards, meters_to_yards(rest.position.x), epsilon = 1e-9);
    }

    #[test]
    fn test_step_cap_bounds_unvalidated_config() {
        let mut config = SimulationConfig::default();
        config.time_step = 1e-9;
        config.max_flight_time = f64::INFINITY;
        let result = simulate_with_config(driver(), AtmosphericConditions::standard(), &config);
        assert!(result.terminated_by_cap);
        assert_relative_eq!(result.flight_time_s, MAX_ITERATIONS as f64 * 1e-9, max_relative = 1e-6);
        assert_eq!(result.trajectory.last().unwrap().phase, Phase::Stopped);
    }

    #[test]
    fn test_thin_air_flies_further() {
        let sea_level = simulate(driver(), AtmosphericConditions::new(70.0, 0.0, 50.0));
        let denver = simulate(driver(), AtmosphericConditions::new(70.0, 5280.0, 50.0));
        assert!(denver.carry_yards > sea_level.carry_yards);
        assert!(denver.air_density < sea_level.air_density);
    }

    #[test]
    fn test_flight_cap_stops_in_air() {
        let mut config = SimulationConfig::default();
        config.set_max_flight_time(1.0);
        let result = simulate_with_config(driver(), AtmosphericConditions::standard(), &config);
        assert!(result.terminated_by_cap);
        assert_eq!(result.roll_yards, 0.0);
        let last = result.trajectory.last().unwrap();
        assert_eq!(last.phase, Phase::Stopped);
        assert!(last.position.y > 0.0);
        assert!(result.trajectory.iter().all(|p| p.phase != Phase::Bounce));
    }

    #[test]
    fn test_coarser_step_agrees() {
        let fine = simulate(driver(), AtmosphericConditions::standard());
        let mut simulator = FlightSimulator::new(driver(), AtmosphericConditions::standard());
        simulator.set_time_step(0.005);
        let coarse = simulator.solve();
        assert_relative_eq!(fine.carry_yards, coarse.carry_yards, epsilon = 0.5);
    }

    #[test]
    fn test_result_serializes() {
        let result = simulate(LaunchParameters::straight(120.0, 16.3, 7097.0), AtmosphericConditions::standard());
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"carry_yards\""));
        assert!(json.contains("\"Bounce\""));
    }
}
