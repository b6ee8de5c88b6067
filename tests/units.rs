//! Unit conversions at the public boundary.

use approx::assert_relative_eq;
use golf_flight::units::*;

#[test]
fn imperial_to_si_and_back() {
    let speed_mph = 171.0;
    let speed_mps = mph_to_mps(speed_mph);
    assert_relative_eq!(speed_mps, 76.44384, epsilon = 1e-9);
    assert_relative_eq!(mps_to_mph(speed_mps), speed_mph, epsilon = 1e-9);

    let carry_yards = 275.0;
    let carry_m = yards_to_meters(carry_yards);
    assert_relative_eq!(carry_m, 251.46, epsilon = 1e-9);
    assert_relative_eq!(meters_to_yards(carry_m), carry_yards, epsilon = 1e-9);
}

#[test]
fn spin_rates() {
    assert_relative_eq!(rpm_to_rad_s(60.0), 2.0 * std::f64::consts::PI, epsilon = 1e-12);
    assert_relative_eq!(rad_s_to_rpm(rpm_to_rad_s(2545.0)), 2545.0, epsilon = 1e-9);
}

#[test]
fn temperatures_and_elevations() {
    assert_relative_eq!(fahrenheit_to_kelvin(32.0), 273.15, epsilon = 1e-9);
    assert_relative_eq!(fahrenheit_to_kelvin(70.0), 294.261_111, epsilon = 1e-5);
    assert_relative_eq!(feet_to_meters(5280.0), 1609.344, epsilon = 1e-9);
}
