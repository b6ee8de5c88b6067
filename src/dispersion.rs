//! Shot dispersion batches.
//!
//! Perturbs a base launch with normally distributed errors, the way a
//! player's strike varies from swing to swing, and simulates every shot in
//! parallel. Perturbations are drawn up front from a seeded RNG so a batch
//! is reproducible regardless of thread scheduling.

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::atmosphere::AtmosphericConditions;
use crate::config::SimulationConfig;
use crate::error::{FlightError, Result};
use crate::simulator::{simulate_with_config, LaunchParameters};

/// Dispersion batch parameters (one standard deviation per launch input)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispersionParams {
    pub shot_count: usize,
    pub speed_std_mph: f64,
    pub launch_angle_std_deg: f64,
    pub azimuth_std_deg: f64,
    pub backspin_std_rpm: f64,
    pub sidespin_std_rpm: f64,
    pub seed: u64,
}

impl Default for DispersionParams {
    fn default() -> Self {
        Self {
            shot_count: 100,
            speed_std_mph: 1.5,
            launch_angle_std_deg: 0.7,
            azimuth_std_deg: 1.0,
            backspin_std_rpm: 250.0,
            sidespin_std_rpm: 200.0,
            seed: 0,
        }
    }
}

/// One shot of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersedShot {
    pub launch: LaunchParameters,
    pub carry_yards: f64,
    pub total_yards: f64,
    pub offline_yards: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersionSummary {
    pub shots: Vec<DispersedShot>,
    pub mean_carry_yards: f64,
    pub std_carry_yards: f64,
    pub mean_total_yards: f64,
    pub std_total_yards: f64,
    pub mean_offline_yards: f64,
    /// Widest left-to-right spread of the rest positions
    pub offline_spread_yards: f64,
}

fn normal(mean: f64, std_dev: f64, name: &str) -> Result<Normal<f64>> {
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(FlightError::InvalidDispersion(format!(
            "{name} standard deviation must be finite and non-negative, got {std_dev}"
        )));
    }
    Normal::new(mean, std_dev)
        .map_err(|e| FlightError::InvalidDispersion(format!("Invalid {name} distribution: {e}")))
}

/// Mean and population standard deviation
fn mean_std(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = values.clone().count();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = values.clone().sum::<f64>() / n as f64;
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    (mean, variance.sqrt())
}

/// Draw the perturbed launches for a batch.
pub fn perturbed_launches(base: &LaunchParameters, params: &DispersionParams) -> Result<Vec<LaunchParameters>> {
    if params.shot_count == 0 {
        return Err(FlightError::InvalidDispersion("shot_count must be at least 1".to_string()));
    }

    let speed_dist = normal(base.ball_speed_mph, params.speed_std_mph, "speed")?;
    let angle_dist = normal(base.launch_angle_deg, params.launch_angle_std_deg, "launch angle")?;
    let azimuth_dist = normal(base.azimuth_deg, params.azimuth_std_deg, "azimuth")?;
    let backspin_dist = normal(base.backspin_rpm, params.backspin_std_rpm, "backspin")?;
    let sidespin_dist = normal(base.sidespin_rpm, params.sidespin_std_rpm, "sidespin")?;

    let mut rng = StdRng::seed_from_u64(params.seed);
    Ok((0..params.shot_count)
        .map(|_| {
            LaunchParameters::new(
                speed_dist.sample(&mut rng).max(0.0),
                angle_dist.sample(&mut rng),
                azimuth_dist.sample(&mut rng),
                backspin_dist.sample(&mut rng),
                sidespin_dist.sample(&mut rng),
            )
        })
        .collect())
}

/// Simulate a dispersion batch around `base`.
pub fn simulate_dispersion(
    base: &LaunchParameters,
    atmosphere: &AtmosphericConditions,
    params: &DispersionParams,
    config: &SimulationConfig,
) -> Result<DispersionSummary> {
    config.validate()?;
    let launches = perturbed_launches(base, params)?;

    let shots: Vec<DispersedShot> = launches
        .par_iter()
        .map(|launch| {
            let result = simulate_with_config(*launch, *atmosphere, config);
            DispersedShot {
                launch: *launch,
                carry_yards: result.carry_yards,
                total_yards: result.total_yards,
                offline_yards: result.offline_yards,
            }
        })
        .collect();

    let (mean_carry_yards, std_carry_yards) = mean_std(shots.iter().map(|s| s.carry_yards));
    let (mean_total_yards, std_total_yards) = mean_std(shots.iter().map(|s| s.total_yards));
    let (mean_offline_yards, _) = mean_std(shots.iter().map(|s| s.offline_yards));
    let left = shots.iter().map(|s| s.offline_yards).fold(f64::INFINITY, f64::min);
    let right = shots.iter().map(|s| s.offline_yards).fold(f64::NEG_INFINITY, f64::max);

    debug!(
        "dispersion of {} shots: carry {:.1} ± {:.1} yd, total {:.1} ± {:.1} yd, spread {:.1} yd",
        shots.len(),
        mean_carry_yards,
        std_carry_yards,
        mean_total_yards,
        std_total_yards,
        right - left
    );

    Ok(DispersionSummary {
        shots,
        mean_carry_yards,
        std_carry_yards,
        mean_total_yards,
        std_total_yards,
        mean_offline_yards,
        offline_spread_yards: right - left,
    })
}
