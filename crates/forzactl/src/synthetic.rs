//! Synthetic telemetry for exercising a listener without the game running.
//!
//! Frames simulate a car pulling away in a straight line: RPM, speed and
//! throttle ramp up, gears change as RPM crosses the shift point, and the
//! timestamp advances at 60 Hz.

use forza_telemetry_protocol::{FRAME_LEN, TelemetryFrame, Vec3, Wheels, encode};

const TICK_MS: u32 = 16;
const IDLE_RPM: f32 = 900.0;
const MAX_RPM: f32 = 8_000.0;
const SHIFT_RPM: f32 = 7_200.0;
const TOP_GEAR: u8 = 6;

/// Frame `index` of a synthetic run.
pub fn synthetic_frame(index: u32) -> TelemetryFrame {
    let t = index as f32 * TICK_MS as f32 / 1_000.0;
    let gear = (1 + (index / 90).min(u32::from(TOP_GEAR - 1))) as u8;
    let in_gear = (index % 90) as f32 / 90.0;
    let rpm = IDLE_RPM + (SHIFT_RPM - IDLE_RPM) * in_gear;
    let speed = 4.0 * t + 2.0;

    let mut frame = TelemetryFrame {
        is_race_on: true,
        timestamp_ms: index.wrapping_mul(TICK_MS),
        ..TelemetryFrame::default()
    };
    frame.engine.max_rpm = MAX_RPM;
    frame.engine.idle_rpm = IDLE_RPM;
    frame.engine.current_rpm = rpm;
    frame.kinematics.velocity = Vec3 {
        x: 0.0,
        y: 0.0,
        z: speed,
    };
    frame.kinematics.acceleration = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 4.0,
    };
    frame.tires.rotation_speed = Wheels::from_array([speed / 0.33; 4]);
    frame.tires.temperature = Wheels::from_array([80.0 + t; 4]);
    frame.suspension.normalized_travel = Wheels::from_array([0.5; 4]);
    frame.dynamics.speed = speed;
    frame.dynamics.current_lap = t;
    frame.dynamics.current_race_time = t;
    frame.dynamics.distance_traveled = 2.0 * t * t + 2.0 * t;
    frame.dynamics.fuel = 1.0;
    frame.progress.lap_number = 0;
    frame.progress.race_position = 1;
    frame.input.throttle = 255;
    frame.input.gear = gear;
    frame.input.steer = 127;
    frame
}

pub fn synthetic_frames(count: u32) -> impl Iterator<Item = TelemetryFrame> {
    (0..count).map(synthetic_frame)
}

/// `count` frames back to back in wire form.
pub fn synthetic_stream(count: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(FRAME_LEN.saturating_mul(count as usize));
    for frame in synthetic_frames(count) {
        out.extend_from_slice(&encode(&frame));
    }
    out
}
