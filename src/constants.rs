/// Physical constants used in golf ball flight calculations

/// Gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.80665;

/// Golf ball mass in kg
///
/// Value: 0.04593 kg (1.620 oz)
/// Source: USGA/R&A Rules of Golf, Appendix III (maximum permitted mass).
/// Tour balls sit right at the limit, so the limit is used as the nominal mass.
pub const BALL_MASS_KG: f64 = 0.04593;

/// Golf ball radius in meters
///
/// Value: 0.021335 m (1.680 in diameter / 2)
/// Source: USGA/R&A Rules of Golf, Appendix III (minimum permitted diameter).
pub const BALL_RADIUS_M: f64 = 0.021335;

/// Ball cross-sectional (reference) area in m², π·r²
pub const BALL_CROSS_SECTION_M2: f64 =
    std::f64::consts::PI * BALL_RADIUS_M * BALL_RADIUS_M;

/// Reference air density for the standard day (70°F, sea level, 50% RH), kg/m³
pub const STANDARD_AIR_DENSITY: f64 = 1.194;

/// ISA sea level pressure in Pa
pub const SEA_LEVEL_PRESSURE_PA: f64 = 101_325.0;

/// Specific gas constant for dry air (J/(kg·K))
pub const R_DRY_AIR: f64 = 287.05;

/// Specific gas constant for water vapor (J/(kg·K))
pub const R_WATER_VAPOR: f64 = 461.495;

/// Offset between Celsius and Kelvin
pub const KELVIN_OFFSET: f64 = 273.15;

// Standard day defaults used when the caller does not specify conditions

/// Standard day temperature (°F)
pub const STANDARD_TEMPERATURE_F: f64 = 70.0;

/// Standard day elevation (ft)
pub const STANDARD_ELEVATION_FT: f64 = 0.0;

/// Standard day relative humidity (%)
pub const STANDARD_HUMIDITY_PCT: f64 = 50.0;

// Numerical stability constants

/// Minimum threshold for velocity magnitude to avoid division by zero
pub const MIN_VELOCITY_THRESHOLD: f64 = 1e-6;

/// Minimum threshold for spin magnitude (rad/s) below which lift is skipped
pub const MIN_SPIN_THRESHOLD: f64 = 1e-9;

/// Minimum threshold for preventing division by zero in general calculations
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;

// Integration defaults

/// Fixed RK4 integration step (s)
///
/// Value: 1 ms
/// Carry and apex converge to well under 0.1 yd between 1 ms and 5 ms for
/// every reference shot, so 1 ms leaves the whole validation tolerance to the
/// aerodynamic fit rather than to the integrator.
pub const DEFAULT_TIME_STEP: f64 = 0.001;

/// Finest accepted integration step (s)
pub const MIN_TIME_STEP: f64 = 1e-4;

/// Coarsest accepted integration step (s)
pub const MAX_TIME_STEP: f64 = 0.005;

/// Interval between retained trajectory samples (s), 50 Hz playback
pub const DEFAULT_SAMPLE_INTERVAL: f64 = 0.02;

/// Hard cap on simulated flight time (s)
///
/// Even a 200 mph / 45° / 15000 rpm balloon lands in about 11 s.
pub const MAX_FLIGHT_TIME: f64 = 30.0;

/// Hard cap on RK4 steps per flight, whatever the configured step and time cap
///
/// Covers the full flight cap at the finest accepted step three times over.
pub const MAX_ITERATIONS: usize = 1_000_000;

/// Hard cap on simulated bounce + roll time (s)
pub const MAX_GROUND_TIME: f64 = 60.0;

// Input domains for clamping degenerate launch data

/// Maximum accepted ball speed (mph)
pub const MAX_BALL_SPEED_MPH: f64 = 250.0;

/// Maximum accepted vertical launch angle (degrees)
pub const MAX_LAUNCH_ANGLE_DEG: f64 = 89.0;

/// Maximum accepted |azimuth| (degrees)
pub const MAX_AZIMUTH_DEG: f64 = 45.0;

/// Maximum accepted |spin| per component (rpm)
pub const MAX_SPIN_RPM: f64 = 20_000.0;
