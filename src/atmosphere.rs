//! Atmospheric calculations for ball flight.
//!
//! Air density drives every aerodynamic force on the ball, so it is computed
//! once per shot from the course conditions: station pressure from the
//! standard barometric formula, vapor pressure from the Arden Buck equation,
//! and the ideal-gas law applied separately to the dry and moist partials.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::constants::{
    G_ACCEL_MPS2, R_DRY_AIR, R_WATER_VAPOR, SEA_LEVEL_PRESSURE_PA, STANDARD_ELEVATION_FT,
    STANDARD_HUMIDITY_PCT, STANDARD_TEMPERATURE_F,
};
use crate::units::{fahrenheit_to_kelvin, feet_to_meters};

/// ISA troposphere constants for the barometric formula
const SEA_LEVEL_TEMPERATURE_K: f64 = 288.15;
const LAPSE_RATE_K_PER_M: f64 = 0.0065;
const MOLAR_MASS_DRY_AIR: f64 = 0.028_964_4; // kg/mol
const UNIVERSAL_GAS_CONSTANT: f64 = 8.314_462_618; // J/(mol·K)

/// Supported input ranges; anything outside is clamped
const MIN_TEMPERATURE_F: f64 = -40.0;
const MAX_TEMPERATURE_F: f64 = 130.0;
const MIN_ELEVATION_FT: f64 = -1500.0;
const MAX_ELEVATION_FT: f64 = 15_000.0;

/// Physical band for the returned density (kg/m³)
const MIN_AIR_DENSITY: f64 = 0.6;
const MAX_AIR_DENSITY: f64 = 1.5;

/// Course conditions for a shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphericConditions {
    pub temperature_f: f64,
    pub elevation_ft: f64,
    pub humidity_pct: f64,
}

impl AtmosphericConditions {
    pub fn new(temperature_f: f64, elevation_ft: f64, humidity_pct: f64) -> Self {
        Self {
            temperature_f,
            elevation_ft,
            humidity_pct,
        }
    }

    /// 70°F, sea level, 50% relative humidity
    pub fn standard() -> Self {
        Self::new(
            STANDARD_TEMPERATURE_F,
            STANDARD_ELEVATION_FT,
            STANDARD_HUMIDITY_PCT,
        )
    }

    /// Air density for these conditions (kg/m³)
    pub fn air_density(&self) -> f64 {
        compute_air_density(self.temperature_f, self.elevation_ft, self.humidity_pct)
    }
}

impl Default for AtmosphericConditions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Replace a non-finite input with its standard-day value and clamp the rest.
fn sanitize(value: f64, fallback: f64, min: f64, max: f64, name: &str) -> f64 {
    if !value.is_finite() {
        warn!("non-finite {name} ({value}), using standard day value {fallback}");
        return fallback;
    }
    if value < min || value > max {
        warn!("{name} {value} outside [{min}, {max}], clamping");
    }
    value.clamp(min, max)
}

/// Station pressure at the given elevation (Pa) from the ISA barometric formula.
fn station_pressure_pa(elevation_m: f64) -> f64 {
    let exponent = G_ACCEL_MPS2 * MOLAR_MASS_DRY_AIR / (UNIVERSAL_GAS_CONSTANT * LAPSE_RATE_K_PER_M);
    let ratio = 1.0 - LAPSE_RATE_K_PER_M * elevation_m / SEA_LEVEL_TEMPERATURE_K;
    SEA_LEVEL_PRESSURE_PA * ratio.powf(exponent)
}

/// Saturation vapor pressure (Pa), Arden Buck equation over water / over ice.
fn saturation_vapor_pressure_pa(temp_c: f64) -> f64 {
    let es_hpa = if temp_c >= 0.0 {
        6.1121 * ((18.678 - temp_c / 234.5) * (temp_c / (257.14 + temp_c))).exp()
    } else {
        6.1115 * ((23.036 - temp_c / 333.7) * (temp_c / (279.82 + temp_c))).exp()
    };
    es_hpa * 100.0
}

/// Air density from course conditions.
///
/// # Arguments
/// * `temperature_f` - Air temperature in °F
/// * `elevation_ft` - Course elevation above sea level in feet
/// * `humidity_pct` - Relative humidity (0-100)
///
/// # Returns
/// Air density in kg/m³, clamped to a physical band. Out-of-range and
/// non-finite inputs are clamped (or replaced by standard-day values) rather
/// than propagated.
pub fn compute_air_density(temperature_f: f64, elevation_ft: f64, humidity_pct: f64) -> f64 {
    let temperature_f = sanitize(
        temperature_f,
        STANDARD_TEMPERATURE_F,
        MIN_TEMPERATURE_F,
        MAX_TEMPERATURE_F,
        "temperature_f",
    );
    let elevation_ft = sanitize(
        elevation_ft,
        STANDARD_ELEVATION_FT,
        MIN_ELEVATION_FT,
        MAX_ELEVATION_FT,
        "elevation_ft",
    );
    let humidity_pct = sanitize(humidity_pct, STANDARD_HUMIDITY_PCT, 0.0, 100.0, "humidity_pct");

    let temp_k = fahrenheit_to_kelvin(temperature_f);
    let temp_c = temp_k - crate::constants::KELVIN_OFFSET;
    let pressure_pa = station_pressure_pa(feet_to_meters(elevation_ft));

    // Partial pressures
    let vapor_pressure_pa = humidity_pct / 100.0 * saturation_vapor_pressure_pa(temp_c);
    let dry_pressure_pa = (pressure_pa - vapor_pressure_pa).max(0.0);

    let density = dry_pressure_pa / (R_DRY_AIR * temp_k) + vapor_pressure_pa / (R_WATER_VAPOR * temp_k);

    if density.is_finite() {
        density.clamp(MIN_AIR_DENSITY, MAX_AIR_DENSITY)
    } else {
        crate::constants::STANDARD_AIR_DENSITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STANDARD_AIR_DENSITY;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_day_density() {
        let density = AtmosphericConditions::standard().air_density();
        assert_relative_eq!(density, STANDARD_AIR_DENSITY, epsilon = 0.003);
    }

    #[test]
    fn test_station_pressure() {
        assert_relative_eq!(station_pressure_pa(0.0), SEA_LEVEL_PRESSURE_PA, epsilon = 1e-6);
        // ISA at 1000 m is 89874.6 Pa
        assert_relative_eq!(station_pressure_pa(1000.0), 89_874.6, epsilon = 20.0);
    }

    #[test]
    fn test_saturation_vapor_pressure() {
        // ~2339 Pa at 20°C, ~611 Pa at the triple point
        assert_relative_eq!(saturation_vapor_pressure_pa(20.0), 2339.0, epsilon = 5.0);
        assert_relative_eq!(saturation_vapor_pressure_pa(0.0), 611.2, epsilon = 1.0);
        assert!(saturation_vapor_pressure_pa(-10.0) < saturation_vapor_pressure_pa(0.0));
    }

    #[test]
    fn test_density_decreases_with_elevation() {
        let sea_level = compute_air_density(70.0, 0.0, 50.0);
        let denver = compute_air_density(70.0, 5280.0, 50.0);
        assert!(denver < sea_level);
        assert!(denver > 0.95 && denver < 1.0);
    }

    #[test]
    fn test_density_decreases_with_temperature() {
        let cold = compute_air_density(40.0, 0.0, 50.0);
        let hot = compute_air_density(100.0, 0.0, 50.0);
        assert!(hot < cold);
    }

    #[test]
    fn test_density_decreases_with_humidity() {
        let dry = compute_air_density(70.0, 0.0, 0.0);
        let humid = compute_air_density(70.0, 0.0, 100.0);
        assert!(humid < dry);
        // Humidity is a small effect next to temperature and elevation
        assert!((dry - humid) / dry < 0.02);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let clamped = compute_air_density(-500.0, 100_000.0, 250.0);
        let at_limits = compute_air_density(MIN_TEMPERATURE_F, MAX_ELEVATION_FT, 100.0);
        assert_relative_eq!(clamped, at_limits, epsilon = 1e-12);
        assert!(clamped >= MIN_AIR_DENSITY && clamped <= MAX_AIR_DENSITY);
    }

    #[test]
    fn test_non_finite_inputs_use_standard_day() {
        let density = compute_air_density(f64::NAN, f64::INFINITY, f64::NAN);
        assert_relative_eq!(density, AtmosphericConditions::standard().air_density(), epsilon = 1e-12);
    }

    #[test]
    fn test_realistic_band() {
        for temp in [40.0, 70.0, 100.0] {
            for elevation in [0.0, 2500.0, 5000.0] {
                for humidity in [0.0, 50.0, 100.0] {
                    let d = compute_air_density(temp, elevation, humidity);
                    assert!(d > 0.9 && d < 1.3, "density {d} at {temp}F {elevation}ft {humidity}%");
                }
            }
        }
    }

    #[test]
    fn test_extremes_stay_in_physical_band() {
        for temp in [-40.0, 130.0] {
            for elevation in [-1500.0, 15_000.0] {
                for humidity in [0.0, 100.0] {
                    let d = compute_air_density(temp, elevation, humidity);
                    assert!((MIN_AIR_DENSITY..=MAX_AIR_DENSITY).contains(&d));
                }
            }
        }
    }
}
