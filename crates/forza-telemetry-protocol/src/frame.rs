//! Typed representation of one decoded telemetry packet.
//!
//! A [`TelemetryFrame`] is produced by [`crate::decode`] and carries every
//! field of the wire record grouped by meaning. Units are whatever the game
//! emits: metres, m/s, radians, Kelvin for tire temperature, seconds for lap
//! timing. Normalized byte fields in [`DriverInput`] are kept as raw 0–255
//! values; use [`normalize_u8`] when presenting them.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Convert a normalized byte field (0–255) to the 0.0–1.0 range.
pub fn normalize_u8(raw: u8) -> f32 {
    f32::from(raw) / 255.0
}

/// One value per wheel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Wheels<T> {
    pub front_left: T,
    pub front_right: T,
    pub rear_left: T,
    pub rear_right: T,
}

impl<T: Copy> Wheels<T> {
    /// Build from wire order (FL, FR, RL, RR).
    pub fn from_array([front_left, front_right, rear_left, rear_right]: [T; 4]) -> Self {
        Self {
            front_left,
            front_right,
            rear_left,
            rear_right,
        }
    }

    /// Values in wire order (FL, FR, RL, RR).
    pub fn to_array(&self) -> [T; 4] {
        [
            self.front_left,
            self.front_right,
            self.rear_left,
            self.rear_right,
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Engine {
    pub max_rpm: f32,
    pub idle_rpm: f32,
    pub current_rpm: f32,
}

/// Car-local motion. Acceleration in m/s², velocity in m/s, angular velocity
/// in rad/s, orientation in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Kinematics {
    pub acceleration: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Suspension {
    /// 0.0 = max stretch, 1.0 = max compression.
    pub normalized_travel: Wheels<f32>,
    pub travel_meters: Wheels<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Tires {
    pub slip_ratio: Wheels<f32>,
    pub slip_angle: Wheels<f32>,
    pub combined_slip: Wheels<f32>,
    /// Wheel rotation speed in rad/s.
    pub rotation_speed: Wheels<f32>,
    pub temperature: Wheels<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Surface {
    pub on_rumble_strip: Wheels<bool>,
    pub puddle_depth: Wheels<f32>,
    pub rumble: Wheels<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CarInfo {
    pub class: i32,
    pub performance_index: i32,
    pub drivetrain: i32,
    pub num_cylinders: i32,
    pub car_type: i32,
    /// Undocumented bytes between `car_type` and `ordinal`, kept verbatim.
    pub reserved: [u8; 8],
    pub ordinal: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Dynamics {
    pub position: Vec3,
    pub speed: f32,
    pub power: f32,
    pub torque: f32,
    pub boost: f32,
    pub fuel: f32,
    pub distance_traveled: f32,
    pub best_lap: f32,
    pub last_lap: f32,
    pub current_lap: f32,
    pub current_race_time: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RaceProgress {
    pub lap_number: u16,
    pub race_position: u8,
}

/// Raw driver inputs. All fields except `gear` are normalized bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DriverInput {
    pub throttle: u8,
    pub brake: u8,
    pub clutch: u8,
    pub handbrake: u8,
    pub gear: u8,
    pub steer: u8,
    pub normalized_driving_line: u8,
    pub normalized_ai_brake_difference: u8,
}

/// One decoded telemetry packet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TelemetryFrame {
    pub is_race_on: bool,
    pub timestamp_ms: u32,
    pub engine: Engine,
    pub kinematics: Kinematics,
    pub suspension: Suspension,
    pub tires: Tires,
    pub surface: Surface,
    pub car: CarInfo,
    pub dynamics: Dynamics,
    pub progress: RaceProgress,
    pub input: DriverInput,
}
