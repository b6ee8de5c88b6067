//! Unit conversions between launch-monitor units and SI.
//!
//! Launch monitors and golfers speak mph, rpm, yards and °F; the integrator
//! works in m/s, rad/s, meters and Kelvin.

use std::f64::consts::PI;

use crate::constants::KELVIN_OFFSET;

/// Conversion factor: miles per hour to meters per second
pub const MPH_TO_MPS: f64 = 0.44704;

/// Conversion factor: yards to meters
pub const YARDS_TO_METERS: f64 = 0.9144;

/// Conversion factor: feet to meters
pub const FEET_TO_METERS: f64 = 0.3048;

/// Conversion factor: revolutions per minute to radians per second
pub const RPM_TO_RAD_S: f64 = 2.0 * PI / 60.0;

#[inline]
pub fn mph_to_mps(mph: f64) -> f64 {
    mph * MPH_TO_MPS
}

#[inline]
pub fn mps_to_mph(mps: f64) -> f64 {
    mps / MPH_TO_MPS
}

#[inline]
pub fn rpm_to_rad_s(rpm: f64) -> f64 {
    rpm * RPM_TO_RAD_S
}

#[inline]
pub fn rad_s_to_rpm(rad_s: f64) -> f64 {
    rad_s / RPM_TO_RAD_S
}

#[inline]
pub fn yards_to_meters(yards: f64) -> f64 {
    yards * YARDS_TO_METERS
}

#[inline]
pub fn meters_to_yards(meters: f64) -> f64 {
    meters / YARDS_TO_METERS
}

#[inline]
pub fn feet_to_meters(feet: f64) -> f64 {
    feet * FEET_TO_METERS
}

/// Fahrenheit to Kelvin
#[inline]
pub fn fahrenheit_to_kelvin(temp_f: f64) -> f64 {
    (temp_f - 32.0) * 5.0 / 9.0 + KELVIN_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_speed_round_trip() {
        assert_relative_eq!(mph_to_mps(100.0), 44.704, epsilon = 1e-12);
        assert_relative_eq!(mps_to_mph(mph_to_mps(167.0)), 167.0, epsilon = 1e-9);
    }

    #[test]
    fn test_spin_conversion() {
        // 60 rpm is exactly one revolution per second
        assert_relative_eq!(rpm_to_rad_s(60.0), 2.0 * PI, epsilon = 1e-12);
        assert_relative_eq!(rad_s_to_rpm(rpm_to_rad_s(2545.0)), 2545.0, epsilon = 1e-9);
    }

    #[test]
    fn test_distance_conversion() {
        assert_relative_eq!(yards_to_meters(100.0), 91.44, epsilon = 1e-12);
        assert_relative_eq!(meters_to_yards(91.44), 100.0, epsilon = 1e-12);
        assert_relative_eq!(feet_to_meters(5280.0), 1609.344, epsilon = 1e-9);
    }

    #[test]
    fn test_temperature_conversion() {
        assert_relative_eq!(fahrenheit_to_kelvin(32.0), 273.15, epsilon = 1e-12);
        assert_relative_eq!(fahrenheit_to_kelvin(212.0), 373.15, epsilon = 1e-9);
    }
}
