//! Wire layout of the Forza Horizon 5 "Data Out" packet.
//!
//! Every field sits at a fixed offset, in declaration order, with no padding.
//! All multi-byte values are little-endian. Wheel groups are four consecutive
//! 4-byte values ordered front-left, front-right, rear-left, rear-right.
//!
//! # Report layout (abridged)
//! | Offset  | Size | Field                             |
//! |---------|------|-----------------------------------|
//! | 0       | 4    | is_race_on (i32, nonzero = true)  |
//! | 4       | 4    | timestamp_ms (u32)                |
//! | 8–19    | 12   | engine max / idle / current rpm   |
//! | 20–67   | 48   | kinematics + orientation          |
//! | 68–211  | 144  | per-wheel suspension/tire/surface |
//! | 212–243 | 32   | car metadata + 8 reserved bytes   |
//! | 244–311 | 68   | position, dynamics, lap timing    |
//! | 312–322 | 11   | lap, position, driver inputs      |

/// Minimum length of a valid packet: the sum of every field width.
pub const FRAME_LEN: usize = 323;

/// Capacity of the receive/reply buffers used by the UDP transport.
pub const MAX_DATAGRAM_LEN: usize = 1024;

/// Distance between consecutive wheels inside a per-wheel group.
pub const WHEEL_STRIDE: usize = 4;

/// Number of reserved single-byte fields between `car_type` and `car_ordinal`.
pub const RESERVED_LEN: usize = 8;

pub const OFF_IS_RACE_ON: usize = 0;
pub const OFF_TIMESTAMP_MS: usize = 4;

pub const OFF_ENGINE_MAX_RPM: usize = 8;
pub const OFF_ENGINE_IDLE_RPM: usize = 12;
pub const OFF_CURRENT_ENGINE_RPM: usize = 16;

// Kinematics, each an x/y/z triple.
pub const OFF_ACCELERATION: usize = 20;
pub const OFF_VELOCITY: usize = 32;
pub const OFF_ANGULAR_VELOCITY: usize = 44;
pub const OFF_YAW: usize = 56;
pub const OFF_PITCH: usize = 60;
pub const OFF_ROLL: usize = 64;

// Per-wheel groups (FL, FR, RL, RR).
pub const OFF_NORMALIZED_SUSPENSION_TRAVEL: usize = 68;
pub const OFF_TIRE_SLIP_RATIO: usize = 84;
pub const OFF_WHEEL_ROTATION_SPEED: usize = 100;
pub const OFF_WHEEL_ON_RUMBLE_STRIP: usize = 116;
pub const OFF_WHEEL_IN_PUDDLE_DEPTH: usize = 132;
pub const OFF_SURFACE_RUMBLE: usize = 148;
pub const OFF_TIRE_SLIP_ANGLE: usize = 164;
pub const OFF_TIRE_COMBINED_SLIP: usize = 180;
pub const OFF_SUSPENSION_TRAVEL_METERS: usize = 196;

pub const OFF_CAR_CLASS: usize = 212;
pub const OFF_CAR_PERFORMANCE_INDEX: usize = 216;
pub const OFF_DRIVETRAIN_TYPE: usize = 220;
pub const OFF_NUM_CYLINDERS: usize = 224;
pub const OFF_CAR_TYPE: usize = 228;
pub const OFF_RESERVED: usize = 232;
pub const OFF_CAR_ORDINAL: usize = 240;

pub const OFF_POSITION: usize = 244;
pub const OFF_SPEED: usize = 256;
pub const OFF_POWER: usize = 260;
pub const OFF_TORQUE: usize = 264;
pub const OFF_TIRE_TEMP: usize = 268;
pub const OFF_BOOST: usize = 284;
pub const OFF_FUEL: usize = 288;
pub const OFF_DISTANCE_TRAVELED: usize = 292;
pub const OFF_BEST_LAP: usize = 296;
pub const OFF_LAST_LAP: usize = 300;
pub const OFF_CURRENT_LAP: usize = 304;
pub const OFF_CURRENT_RACE_TIME: usize = 308;

pub const OFF_LAP_NUMBER: usize = 312; // u16
pub const OFF_RACE_POSITION: usize = 314; // u8
pub const OFF_THROTTLE: usize = 315; // u8 (0-255 → 0.0-1.0)
pub const OFF_BRAKE: usize = 316; // u8 (0-255 → 0.0-1.0)
pub const OFF_CLUTCH: usize = 317; // u8 (0-255 → 0.0-1.0)
pub const OFF_HANDBRAKE: usize = 318; // u8 (0-255 → 0.0-1.0)
pub const OFF_GEAR: usize = 319; // u8 gear index
pub const OFF_STEER: usize = 320; // u8
pub const OFF_NORMALIZED_DRIVING_LINE: usize = 321; // u8
pub const OFF_NORMALIZED_AI_BRAKE_DIFFERENCE: usize = 322; // u8

/// Wire encoding of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldKind {
    /// 4-byte little-endian integer interpreted as nonzero = true.
    Bool32,
    U8,
    U16,
    U32,
    I32,
    F32,
}

impl FieldKind {
    /// Width of the field on the wire, in bytes.
    pub const fn width(self) -> usize {
        match self {
            FieldKind::U8 => 1,
            FieldKind::U16 => 2,
            FieldKind::Bool32 | FieldKind::U32 | FieldKind::I32 | FieldKind::F32 => 4,
        }
    }

    /// Short type name used in layout listings.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldKind::Bool32 => "bool32",
            FieldKind::U8 => "u8",
            FieldKind::U16 => "u16",
            FieldKind::U32 => "u32",
            FieldKind::I32 => "i32",
            FieldKind::F32 => "f32",
        }
    }
}

/// One row of the offset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn width(&self) -> usize {
        self.kind.width()
    }

    /// Offset one past the last byte of this field.
    pub const fn end(&self) -> usize {
        self.offset + self.kind.width()
    }
}

const fn field(name: &'static str, offset: usize, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, offset, kind }
}

/// Every field of the packet, in wire order.
pub const FIELD_TABLE: &[FieldSpec] = &[
    field("is_race_on", 0, FieldKind::Bool32),
    field("timestamp_ms", 4, FieldKind::U32),
    field("engine_max_rpm", 8, FieldKind::F32),
    field("engine_idle_rpm", 12, FieldKind::F32),
    field("current_engine_rpm", 16, FieldKind::F32),
    field("acceleration_x", 20, FieldKind::F32),
    field("acceleration_y", 24, FieldKind::F32),
    field("acceleration_z", 28, FieldKind::F32),
    field("velocity_x", 32, FieldKind::F32),
    field("velocity_y", 36, FieldKind::F32),
    field("velocity_z", 40, FieldKind::F32),
    field("angular_velocity_x", 44, FieldKind::F32),
    field("angular_velocity_y", 48, FieldKind::F32),
    field("angular_velocity_z", 52, FieldKind::F32),
    field("yaw", 56, FieldKind::F32),
    field("pitch", 60, FieldKind::F32),
    field("roll", 64, FieldKind::F32),
    field("normalized_suspension_travel_front_left", 68, FieldKind::F32),
    field("normalized_suspension_travel_front_right", 72, FieldKind::F32),
    field("normalized_suspension_travel_rear_left", 76, FieldKind::F32),
    field("normalized_suspension_travel_rear_right", 80, FieldKind::F32),
    field("tire_slip_ratio_front_left", 84, FieldKind::F32),
    field("tire_slip_ratio_front_right", 88, FieldKind::F32),
    field("tire_slip_ratio_rear_left", 92, FieldKind::F32),
    field("tire_slip_ratio_rear_right", 96, FieldKind::F32),
    field("wheel_rotation_speed_front_left", 100, FieldKind::F32),
    field("wheel_rotation_speed_front_right", 104, FieldKind::F32),
    field("wheel_rotation_speed_rear_left", 108, FieldKind::F32),
    field("wheel_rotation_speed_rear_right", 112, FieldKind::F32),
    field("wheel_on_rumble_strip_front_left", 116, FieldKind::Bool32),
    field("wheel_on_rumble_strip_front_right", 120, FieldKind::Bool32),
    field("wheel_on_rumble_strip_rear_left", 124, FieldKind::Bool32),
    field("wheel_on_rumble_strip_rear_right", 128, FieldKind::Bool32),
    field("wheel_in_puddle_depth_front_left", 132, FieldKind::F32),
    field("wheel_in_puddle_depth_front_right", 136, FieldKind::F32),
    field("wheel_in_puddle_depth_rear_left", 140, FieldKind::F32),
    field("wheel_in_puddle_depth_rear_right", 144, FieldKind::F32),
    field("surface_rumble_front_left", 148, FieldKind::F32),
    field("surface_rumble_front_right", 152, FieldKind::F32),
    field("surface_rumble_rear_left", 156, FieldKind::F32),
    field("surface_rumble_rear_right", 160, FieldKind::F32),
    field("tire_slip_angle_front_left", 164, FieldKind::F32),
    field("tire_slip_angle_front_right", 168, FieldKind::F32),
    field("tire_slip_angle_rear_left", 172, FieldKind::F32),
    field("tire_slip_angle_rear_right", 176, FieldKind::F32),
    field("tire_combined_slip_front_left", 180, FieldKind::F32),
    field("tire_combined_slip_front_right", 184, FieldKind::F32),
    field("tire_combined_slip_rear_left", 188, FieldKind::F32),
    field("tire_combined_slip_rear_right", 192, FieldKind::F32),
    field("suspension_travel_meters_front_left", 196, FieldKind::F32),
    field("suspension_travel_meters_front_right", 200, FieldKind::F32),
    field("suspension_travel_meters_rear_left", 204, FieldKind::F32),
    field("suspension_travel_meters_rear_right", 208, FieldKind::F32),
    field("car_class", 212, FieldKind::I32),
    field("car_performance_index", 216, FieldKind::I32),
    field("drivetrain_type", 220, FieldKind::I32),
    field("num_cylinders", 224, FieldKind::I32),
    field("car_type", 228, FieldKind::I32),
    field("reserved_0", 232, FieldKind::U8),
    field("reserved_1", 233, FieldKind::U8),
    field("reserved_2", 234, FieldKind::U8),
    field("reserved_3", 235, FieldKind::U8),
    field("reserved_4", 236, FieldKind::U8),
    field("reserved_5", 237, FieldKind::U8),
    field("reserved_6", 238, FieldKind::U8),
    field("reserved_7", 239, FieldKind::U8),
    field("car_ordinal", 240, FieldKind::I32),
    field("position_x", 244, FieldKind::F32),
    field("position_y", 248, FieldKind::F32),
    field("position_z", 252, FieldKind::F32),
    field("speed", 256, FieldKind::F32),
    field("power", 260, FieldKind::F32),
    field("torque", 264, FieldKind::F32),
    field("tire_temp_front_left", 268, FieldKind::F32),
    field("tire_temp_front_right", 272, FieldKind::F32),
    field("tire_temp_rear_left", 276, FieldKind::F32),
    field("tire_temp_rear_right", 280, FieldKind::F32),
    field("boost", 284, FieldKind::F32),
    field("fuel", 288, FieldKind::F32),
    field("distance_traveled", 292, FieldKind::F32),
    field("best_lap", 296, FieldKind::F32),
    field("last_lap", 300, FieldKind::F32),
    field("current_lap", 304, FieldKind::F32),
    field("current_race_time", 308, FieldKind::F32),
    field("lap_number", 312, FieldKind::U16),
    field("race_position", 314, FieldKind::U8),
    field("throttle", 315, FieldKind::U8),
    field("brake", 316, FieldKind::U8),
    field("clutch", 317, FieldKind::U8),
    field("handbrake", 318, FieldKind::U8),
    field("gear", 319, FieldKind::U8),
    field("steer", 320, FieldKind::U8),
    field("normalized_driving_line", 321, FieldKind::U8),
    field("normalized_ai_brake_difference", 322, FieldKind::U8),
];

/// Offset of the given wheel within a per-wheel group starting at `base`.
pub const fn wheel_offset(base: usize, wheel: usize) -> usize {
    base + wheel * WHEEL_STRIDE
}
