//! Packet decoder: raw datagram bytes → [`TelemetryFrame`].
//!
//! Decoding is pure and deterministic. The caller passes the receive buffer
//! together with the number of bytes actually received; only that prefix is
//! ever read. Every field read goes through [`field_bytes`], which checks the
//! range against the valid prefix instead of trusting the fixed layout.
//!
//! Packets longer than [`FRAME_LEN`] are accepted and the trailing bytes
//! ignored, so newer game builds that append fields still decode.

use thiserror::Error;

use crate::frame::{
    CarInfo, DriverInput, Dynamics, Engine, Kinematics, RaceProgress, Surface, Suspension,
    TelemetryFrame, Tires, Vec3, Wheels,
};
use crate::layout::*;

/// Errors returned by [`decode`] and the field primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer valid bytes than the fixed layout needs.
    #[error("truncated packet: need at least {required} bytes, got {actual}")]
    TruncatedPacket { required: usize, actual: usize },

    /// The declared valid length is larger than the buffer handed in.
    #[error("declared length {length} exceeds buffer capacity {capacity}")]
    LengthExceedsBuffer { length: usize, capacity: usize },

    /// A field range falls outside the valid bytes.
    #[error("field at offset {offset} (width {width}) is outside the {length} valid bytes")]
    FieldOutOfBounds {
        offset: usize,
        width: usize,
        length: usize,
    },
}

/// A scalar that can be read from its little-endian wire form.
pub trait WireField: Sized + Copy {
    /// Width on the wire in bytes.
    const WIDTH: usize;

    /// Decode from exactly [`Self::WIDTH`] bytes. Returns `None` for any other
    /// slice length.
    fn from_le_slice(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_wire_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WireField for $ty {
                const WIDTH: usize = core::mem::size_of::<$ty>();

                fn from_le_slice(bytes: &[u8]) -> Option<Self> {
                    bytes.try_into().ok().map(<$ty>::from_le_bytes)
                }
            }
        )*
    };
}

impl_wire_field!(u8, u16, u32, i32, f32);

/// Booleans travel as 4-byte little-endian integers; any nonzero value is true.
impl WireField for bool {
    const WIDTH: usize = 4;

    fn from_le_slice(bytes: &[u8]) -> Option<Self> {
        i32::from_le_slice(bytes).map(|raw| raw != 0)
    }
}

/// Borrow `width` bytes starting at `offset`, checked against `bytes.len()`.
pub fn field_bytes(bytes: &[u8], offset: usize, width: usize) -> Result<&[u8], DecodeError> {
    let out_of_bounds = DecodeError::FieldOutOfBounds {
        offset,
        width,
        length: bytes.len(),
    };
    let end = offset.checked_add(width).ok_or(out_of_bounds.clone())?;
    bytes.get(offset..end).ok_or(out_of_bounds)
}

/// Decode one scalar of type `T` at `offset`.
///
/// This is the primitive the frame decoder is built on; it is public so
/// that fields appended by later game versions can be read without touching
/// the fixed layout.
pub fn decode_field_at<T: WireField>(bytes: &[u8], offset: usize) -> Result<T, DecodeError> {
    let raw = field_bytes(bytes, offset, T::WIDTH)?;
    T::from_le_slice(raw).ok_or(DecodeError::FieldOutOfBounds {
        offset,
        width: T::WIDTH,
        length: bytes.len(),
    })
}

/// Decode the first `length` bytes of `bytes` into a [`TelemetryFrame`].
///
/// # Errors
///
/// - [`DecodeError::LengthExceedsBuffer`] if `length > bytes.len()`.
/// - [`DecodeError::TruncatedPacket`] if `length < FRAME_LEN`.
pub fn decode(bytes: &[u8], length: usize) -> Result<TelemetryFrame, DecodeError> {
    let valid = bytes
        .get(..length)
        .ok_or(DecodeError::LengthExceedsBuffer {
            length,
            capacity: bytes.len(),
        })?;

    if length < FRAME_LEN {
        return Err(DecodeError::TruncatedPacket {
            required: FRAME_LEN,
            actual: length,
        });
    }

    let r = FieldReader { data: valid };

    Ok(TelemetryFrame {
        is_race_on: r.get(OFF_IS_RACE_ON)?,
        timestamp_ms: r.get(OFF_TIMESTAMP_MS)?,
        engine: Engine {
            max_rpm: r.get(OFF_ENGINE_MAX_RPM)?,
            idle_rpm: r.get(OFF_ENGINE_IDLE_RPM)?,
            current_rpm: r.get(OFF_CURRENT_ENGINE_RPM)?,
        },
        kinematics: Kinematics {
            acceleration: r.vec3(OFF_ACCELERATION)?,
            velocity: r.vec3(OFF_VELOCITY)?,
            angular_velocity: r.vec3(OFF_ANGULAR_VELOCITY)?,
            yaw: r.get(OFF_YAW)?,
            pitch: r.get(OFF_PITCH)?,
            roll: r.get(OFF_ROLL)?,
        },
        suspension: Suspension {
            normalized_travel: r.wheels(OFF_NORMALIZED_SUSPENSION_TRAVEL)?,
            travel_meters: r.wheels(OFF_SUSPENSION_TRAVEL_METERS)?,
        },
        tires: Tires {
            slip_ratio: r.wheels(OFF_TIRE_SLIP_RATIO)?,
            slip_angle: r.wheels(OFF_TIRE_SLIP_ANGLE)?,
            combined_slip: r.wheels(OFF_TIRE_COMBINED_SLIP)?,
            rotation_speed: r.wheels(OFF_WHEEL_ROTATION_SPEED)?,
            temperature: r.wheels(OFF_TIRE_TEMP)?,
        },
        surface: Surface {
            on_rumble_strip: r.wheels(OFF_WHEEL_ON_RUMBLE_STRIP)?,
            puddle_depth: r.wheels(OFF_WHEEL_IN_PUDDLE_DEPTH)?,
            rumble: r.wheels(OFF_SURFACE_RUMBLE)?,
        },
        car: CarInfo {
            class: r.get(OFF_CAR_CLASS)?,
            performance_index: r.get(OFF_CAR_PERFORMANCE_INDEX)?,
            drivetrain: r.get(OFF_DRIVETRAIN_TYPE)?,
            num_cylinders: r.get(OFF_NUM_CYLINDERS)?,
            car_type: r.get(OFF_CAR_TYPE)?,
            reserved: r.reserved()?,
            ordinal: r.get(OFF_CAR_ORDINAL)?,
        },
        dynamics: Dynamics {
            position: r.vec3(OFF_POSITION)?,
            speed: r.get(OFF_SPEED)?,
            power: r.get(OFF_POWER)?,
            torque: r.get(OFF_TORQUE)?,
            boost: r.get(OFF_BOOST)?,
            fuel: r.get(OFF_FUEL)?,
            distance_traveled: r.get(OFF_DISTANCE_TRAVELED)?,
            best_lap: r.get(OFF_BEST_LAP)?,
            last_lap: r.get(OFF_LAST_LAP)?,
            current_lap: r.get(OFF_CURRENT_LAP)?,
            current_race_time: r.get(OFF_CURRENT_RACE_TIME)?,
        },
        progress: RaceProgress {
            lap_number: r.get(OFF_LAP_NUMBER)?,
            race_position: r.get(OFF_RACE_POSITION)?,
        },
        input: DriverInput {
            throttle: r.get(OFF_THROTTLE)?,
            brake: r.get(OFF_BRAKE)?,
            clutch: r.get(OFF_CLUTCH)?,
            handbrake: r.get(OFF_HANDBRAKE)?,
            gear: r.get(OFF_GEAR)?,
            steer: r.get(OFF_STEER)?,
            normalized_driving_line: r.get(OFF_NORMALIZED_DRIVING_LINE)?,
            normalized_ai_brake_difference: r.get(OFF_NORMALIZED_AI_BRAKE_DIFFERENCE)?,
        },
    })
}

/// Decode a whole datagram, treating every byte as valid.
pub fn decode_packet(bytes: &[u8]) -> Result<TelemetryFrame, DecodeError> {
    decode(bytes, bytes.len())
}

struct FieldReader<'a> {
    data: &'a [u8],
}

impl FieldReader<'_> {
    fn get<T: WireField>(&self, offset: usize) -> Result<T, DecodeError> {
        decode_field_at(self.data, offset)
    }

    fn vec3(&self, base: usize) -> Result<Vec3, DecodeError> {
        Ok(Vec3 {
            x: self.get(base)?,
            y: self.get(base + 4)?,
            z: self.get(base + 8)?,
        })
    }

    fn wheels<T: WireField>(&self, base: usize) -> Result<Wheels<T>, DecodeError> {
        Ok(Wheels::from_array([
            self.get(wheel_offset(base, 0))?,
            self.get(wheel_offset(base, 1))?,
            self.get(wheel_offset(base, 2))?,
            self.get(wheel_offset(base, 3))?,
        ]))
    }

    fn reserved(&self) -> Result<[u8; RESERVED_LEN], DecodeError> {
        let raw = field_bytes(self.data, OFF_RESERVED, RESERVED_LEN)?;
        raw.try_into().map_err(|_| DecodeError::FieldOutOfBounds {
            offset: OFF_RESERVED,
            width: RESERVED_LEN,
            length: self.data.len(),
        })
    }
}
