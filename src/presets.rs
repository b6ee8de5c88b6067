//! Typical launch windows for common clubs.
//!
//! Useful for demos and for exercising the simulator without a launch
//! monitor attached: `sample` draws a plausible shot uniformly from the
//! window a tour-level player produces with that club.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::simulator::LaunchParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotPreset {
    Driver,
    SevenIron,
    Wedge,
}

/// Launch window for one club
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchWindow {
    pub ball_speed_mph: RangeInclusive<f64>,
    pub launch_angle_deg: RangeInclusive<f64>,
    pub azimuth_deg: RangeInclusive<f64>,
    pub backspin_rpm: RangeInclusive<f64>,
    pub sidespin_rpm: RangeInclusive<f64>,
}

fn midpoint(range: &RangeInclusive<f64>) -> f64 {
    0.5 * (range.start() + range.end())
}

impl ShotPreset {
    pub const ALL: [ShotPreset; 3] = [ShotPreset::Driver, ShotPreset::SevenIron, ShotPreset::Wedge];

    pub fn window(&self) -> LaunchWindow {
        match self {
            ShotPreset::Driver => LaunchWindow {
                ball_speed_mph: 155.0..=175.0,
                launch_angle_deg: 9.0..=13.0,
                azimuth_deg: -3.0..=3.0,
                backspin_rpm: 2000.0..=2800.0,
                sidespin_rpm: -500.0..=500.0,
            },
            ShotPreset::SevenIron => LaunchWindow {
                ball_speed_mph: 115.0..=130.0,
                launch_angle_deg: 15.0..=19.0,
                azimuth_deg: -2.0..=2.0,
                backspin_rpm: 5800.0..=7800.0,
                sidespin_rpm: -400.0..=400.0,
            },
            ShotPreset::Wedge => LaunchWindow {
                ball_speed_mph: 85.0..=105.0,
                launch_angle_deg: 28.0..=38.0,
                azimuth_deg: -2.0..=2.0,
                backspin_rpm: 7800.0..=10_800.0,
                sidespin_rpm: -300.0..=300.0,
            },
        }
    }

    /// Centre of the launch window, hit straight
    pub fn nominal(&self) -> LaunchParameters {
        let w = self.window();
        LaunchParameters::new(
            midpoint(&w.ball_speed_mph),
            midpoint(&w.launch_angle_deg),
            0.0,
            midpoint(&w.backspin_rpm),
            0.0,
        )
    }

    /// Uniform draw from the launch window
    pub fn sample<R: Rng>(&self, rng: &mut R) -> LaunchParameters {
        let w = self.window();
        LaunchParameters::new(
            rng.gen_range(w.ball_speed_mph),
            rng.gen_range(w.launch_angle_deg),
            rng.gen_range(w.azimuth_deg),
            rng.gen_range(w.backspin_rpm),
            rng.gen_range(w.sidespin_rpm),
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShotPreset::Driver => "driver",
            ShotPreset::SevenIron => "7-iron",
            ShotPreset::Wedge => "wedge",
        }
    }
}

impl std::fmt::Display for ShotPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
