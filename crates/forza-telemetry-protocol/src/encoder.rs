//! Frame encoder: the inverse of [`crate::decode`].
//!
//! Used to produce synthetic traffic for the sender and for tests. Booleans
//! are written as `1` / `0`.

use crate::frame::{TelemetryFrame, Vec3, Wheels};
use crate::layout::*;

/// A scalar that can be written in its little-endian wire form.
pub trait WireEncode: Copy {
    /// Width on the wire in bytes.
    const WIDTH: usize;

    /// Write into a slice of exactly [`Self::WIDTH`] bytes.
    fn write_le(self, out: &mut [u8]);
}

macro_rules! impl_wire_encode {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WireEncode for $ty {
                const WIDTH: usize = core::mem::size_of::<$ty>();

                fn write_le(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_wire_encode!(u8, u16, u32, i32, f32);

impl WireEncode for bool {
    const WIDTH: usize = 4;

    fn write_le(self, out: &mut [u8]) {
        i32::from(self).write_le(out);
    }
}

struct FieldWriter {
    data: [u8; FRAME_LEN],
}

impl FieldWriter {
    fn put<T: WireEncode>(&mut self, offset: usize, value: T) {
        if let Some(slot) = offset
            .checked_add(T::WIDTH)
            .and_then(|end| self.data.get_mut(offset..end))
        {
            value.write_le(slot);
        }
    }

    fn vec3(&mut self, base: usize, v: Vec3) {
        self.put(base, v.x);
        self.put(base + 4, v.y);
        self.put(base + 8, v.z);
    }

    fn wheels<T: WireEncode>(&mut self, base: usize, wheels: Wheels<T>) {
        for (i, value) in wheels.to_array().into_iter().enumerate() {
            self.put(wheel_offset(base, i), value);
        }
    }
}

/// Encode a frame into a fresh [`FRAME_LEN`]-byte packet.
pub fn encode(frame: &TelemetryFrame) -> [u8; FRAME_LEN] {
    let mut w = FieldWriter {
        data: [0u8; FRAME_LEN],
    };

    w.put(OFF_IS_RACE_ON, frame.is_race_on);
    w.put(OFF_TIMESTAMP_MS, frame.timestamp_ms);

    w.put(OFF_ENGINE_MAX_RPM, frame.engine.max_rpm);
    w.put(OFF_ENGINE_IDLE_RPM, frame.engine.idle_rpm);
    w.put(OFF_CURRENT_ENGINE_RPM, frame.engine.current_rpm);

    let k = &frame.kinematics;
    w.vec3(OFF_ACCELERATION, k.acceleration);
    w.vec3(OFF_VELOCITY, k.velocity);
    w.vec3(OFF_ANGULAR_VELOCITY, k.angular_velocity);
    w.put(OFF_YAW, k.yaw);
    w.put(OFF_PITCH, k.pitch);
    w.put(OFF_ROLL, k.roll);

    w.wheels(OFF_NORMALIZED_SUSPENSION_TRAVEL, frame.suspension.normalized_travel);
    w.wheels(OFF_TIRE_SLIP_RATIO, frame.tires.slip_ratio);
    w.wheels(OFF_WHEEL_ROTATION_SPEED, frame.tires.rotation_speed);
    w.wheels(OFF_WHEEL_ON_RUMBLE_STRIP, frame.surface.on_rumble_strip);
    w.wheels(OFF_WHEEL_IN_PUDDLE_DEPTH, frame.surface.puddle_depth);
    w.wheels(OFF_SURFACE_RUMBLE, frame.surface.rumble);
    w.wheels(OFF_TIRE_SLIP_ANGLE, frame.tires.slip_angle);
    w.wheels(OFF_TIRE_COMBINED_SLIP, frame.tires.combined_slip);
    w.wheels(OFF_SUSPENSION_TRAVEL_METERS, frame.suspension.travel_meters);

    let car = &frame.car;
    w.put(OFF_CAR_CLASS, car.class);
    w.put(OFF_CAR_PERFORMANCE_INDEX, car.performance_index);
    w.put(OFF_DRIVETRAIN_TYPE, car.drivetrain);
    w.put(OFF_NUM_CYLINDERS, car.num_cylinders);
    w.put(OFF_CAR_TYPE, car.car_type);
    for (i, byte) in car.reserved.iter().enumerate() {
        w.put(OFF_RESERVED + i, *byte);
    }
    w.put(OFF_CAR_ORDINAL, car.ordinal);

    let d = &frame.dynamics;
    w.vec3(OFF_POSITION, d.position);
    w.put(OFF_SPEED, d.speed);
    w.put(OFF_POWER, d.power);
    w.put(OFF_TORQUE, d.torque);
    w.wheels(OFF_TIRE_TEMP, frame.tires.temperature);
    w.put(OFF_BOOST, d.boost);
    w.put(OFF_FUEL, d.fuel);
    w.put(OFF_DISTANCE_TRAVELED, d.distance_traveled);
    w.put(OFF_BEST_LAP, d.best_lap);
    w.put(OFF_LAST_LAP, d.last_lap);
    w.put(OFF_CURRENT_LAP, d.current_lap);
    w.put(OFF_CURRENT_RACE_TIME, d.current_race_time);

    w.put(OFF_LAP_NUMBER, frame.progress.lap_number);
    w.put(OFF_RACE_POSITION, frame.progress.race_position);

    let input = &frame.input;
    w.put(OFF_THROTTLE, input.throttle);
    w.put(OFF_BRAKE, input.brake);
    w.put(OFF_CLUTCH, input.clutch);
    w.put(OFF_HANDBRAKE, input.handbrake);
    w.put(OFF_GEAR, input.gear);
    w.put(OFF_STEER, input.steer);
    w.put(OFF_NORMALIZED_DRIVING_LINE, input.normalized_driving_line);
    w.put(
        OFF_NORMALIZED_AI_BRAKE_DIFFERENCE,
        input.normalized_ai_brake_difference,
    );

    w.data
}
