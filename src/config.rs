//! Simulation configuration.
//!
//! Everything the integrator and the ground model can be tuned with, grouped
//! in one serde-friendly value. Missing JSON fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::aerodynamics::AeroCoefficients;
use crate::constants::{
    DEFAULT_SAMPLE_INTERVAL, DEFAULT_TIME_STEP, MAX_FLIGHT_TIME, MAX_TIME_STEP, MIN_TIME_STEP,
};
use crate::error::{FlightError, Result};
use crate::ground::GroundCoefficients;
use crate::spin_decay::SpinDecayParameters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// RK4 step (s)
    pub time_step: f64,
    /// Spacing of recorded trajectory points (s)
    pub sample_interval: f64,
    /// Flight longer than this is aborted (s)
    pub max_flight_time: f64,
    pub aero: AeroCoefficients,
    pub spin_decay: SpinDecayParameters,
    pub ground: GroundCoefficients,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            max_flight_time: MAX_FLIGHT_TIME,
            aero: AeroCoefficients::default(),
            spin_decay: SpinDecayParameters::default(),
            ground: GroundCoefficients::default(),
        }
    }
}

fn require_positive(value: f64, name: &str) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FlightError::InvalidConfig(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

fn require_non_negative(value: f64, name: &str) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FlightError::InvalidConfig(format!(
            "{name} must be non-negative and finite, got {value}"
        )))
    }
}

fn require_fraction(value: f64, name: &str) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FlightError::InvalidConfig(format!(
            "{name} must lie in [0, 1], got {value}"
        )))
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON configuration and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn set_time_step(&mut self, step: f64) {
        self.time_step = step;
    }

    pub fn set_sample_interval(&mut self, interval: f64) {
        self.sample_interval = interval;
    }

    pub fn set_max_flight_time(&mut self, seconds: f64) {
        self.max_flight_time = seconds;
    }

    pub fn set_max_ground_time(&mut self, seconds: f64) {
        self.ground.max_ground_time_s = seconds;
    }

    /// Reject values the integrator cannot run with.
    pub fn validate(&self) -> Result<()> {
        require_positive(self.time_step, "time_step")?;
        if !(MIN_TIME_STEP..=MAX_TIME_STEP).contains(&self.time_step) {
            return Err(FlightError::InvalidConfig(format!(
                "time_step {} s outside [{MIN_TIME_STEP}, {MAX_TIME_STEP}] s",
                self.time_step
            )));
        }
        require_positive(self.sample_interval, "sample_interval")?;
        if self.sample_interval < self.time_step {
            return Err(FlightError::InvalidConfig(format!(
                "sample_interval {} s is shorter than time_step {} s",
                self.sample_interval, self.time_step
            )));
        }
        require_positive(self.max_flight_time, "max_flight_time")?;

        require_positive(self.aero.cd_base, "aero.cd_base")?;
        require_non_negative(self.aero.cd_spin, "aero.cd_spin")?;
        require_non_negative(self.aero.cl_max, "aero.cl_max")?;
        require_positive(self.aero.cl_half_ratio, "aero.cl_half_ratio")?;

        require_non_negative(self.spin_decay.decay_rate_per_s, "spin_decay.decay_rate_per_s")?;

        let g = &self.ground;
        require_fraction(g.min_restitution, "ground.min_restitution")?;
        require_fraction(g.max_restitution, "ground.max_restitution")?;
        if g.min_restitution > g.max_restitution {
            return Err(FlightError::InvalidConfig(
                "ground.min_restitution exceeds ground.max_restitution".to_string(),
            ));
        }
        require_non_negative(g.restitution_base, "ground.restitution_base")?;
        require_non_negative(g.restitution_angle_factor, "ground.restitution_angle_factor")?;
        require_fraction(g.friction_base, "ground.friction_base")?;
        require_non_negative(g.friction_spin_factor, "ground.friction_spin_factor")?;
        require_fraction(g.max_friction, "ground.max_friction")?;
        require_positive(g.spin_reference_rpm, "ground.spin_reference_rpm")?;
        require_fraction(g.spin_retention_per_bounce, "ground.spin_retention_per_bounce")?;
        require_non_negative(g.roll_threshold_mps, "ground.roll_threshold_mps")?;
        require_positive(g.rolling_friction, "ground.rolling_friction")?;
        require_non_negative(g.rolling_drag_per_s, "ground.rolling_drag_per_s")?;
        require_positive(g.stop_speed_mps, "ground.stop_speed_mps")?;
        require_positive(g.max_ground_time_s, "ground.max_ground_time_s")?;

        Ok(())
    }
}
