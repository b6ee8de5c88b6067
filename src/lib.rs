//! # Golf Flight
//!
//! Golf ball flight, bounce and roll simulation from launch-monitor data.
//!
//! ```no_run
//! use golf_flight::{simulate, AtmosphericConditions, LaunchParameters};
//!
//! let launch = LaunchParameters::new(171.0, 10.4, 0.0, 2545.0, 0.0);
//! let shot = simulate(launch, AtmosphericConditions::standard());
//! println!("carry {:.1} yd, total {:.1} yd", shot.carry_yards, shot.total_yards);
//! ```

// Re-export the main types and functions
pub use aerodynamics::{compute_forces, AeroCoefficients, AeroForces};
pub use atmosphere::{compute_air_density, AtmosphericConditions};
pub use config::SimulationConfig;
pub use dispersion::{simulate_dispersion, DispersedShot, DispersionParams, DispersionSummary};
pub use error::{FlightError, Result};
pub use ground::{resolve_ground_contact, GroundCoefficients, GroundContact, GroundOutcome};
pub use presets::{LaunchWindow, ShotPreset};
pub use simulator::{simulate, simulate_with_config, BallState, FlightSimulator, LaunchParameters, ShotResult};
pub use spin_decay::{decayed_spin, SpinDecayParameters, SpinState};
pub use trajectory::{Phase, Trajectory, TrajectoryPoint, TrajectorySampler};

// Module declarations
pub mod aerodynamics;
pub mod atmosphere;
pub mod config;
pub mod constants;
pub mod dispersion;
pub mod error;
pub mod ground;
pub mod presets;
pub mod simulator;
pub mod spin_decay;
pub mod trajectory;
pub mod units;
