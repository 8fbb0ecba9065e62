//! Field-by-field decoding against hand-built packets.
//!
//! Each test writes literal values at the documented byte offsets and checks
//! that exactly those values come back in the matching frame field.

use forza_telemetry_protocol::layout::*;
use forza_telemetry_protocol::{DecodeError, decode, decode_packet};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn write_f32_le(buf: &mut [u8], offset: usize, value: f32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn write_i32_le(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn make_packet() -> Vec<u8> {
    vec![0u8; FRAME_LEN]
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn race_state_literals() -> TestResult {
    let mut data = make_packet();
    write_i32_le(&mut data, 0, 1);
    data[4..8].copy_from_slice(&123_456u32.to_le_bytes());

    let frame = decode(&data, data.len())?;
    assert!(frame.is_race_on);
    assert_eq!(frame.timestamp_ms, 123_456);
    Ok(())
}

#[test]
fn engine_and_kinematics_literals() -> TestResult {
    let mut data = make_packet();
    write_f32_le(&mut data, 8, 8000.0);
    write_f32_le(&mut data, 12, 900.0);
    write_f32_le(&mut data, 16, 6543.5);
    write_f32_le(&mut data, 20, 1.5);
    write_f32_le(&mut data, 28, -9.8);
    write_f32_le(&mut data, 36, 22.25);
    write_f32_le(&mut data, 52, 0.125);
    write_f32_le(&mut data, 56, 3.0);
    write_f32_le(&mut data, 60, -0.5);
    write_f32_le(&mut data, 64, 0.25);

    let frame = decode_packet(&data)?;
    assert!(approx(frame.engine.max_rpm, 8000.0));
    assert!(approx(frame.engine.idle_rpm, 900.0));
    assert!(approx(frame.engine.current_rpm, 6543.5));
    assert!(approx(frame.kinematics.acceleration.x, 1.5));
    assert!(approx(frame.kinematics.acceleration.z, -9.8));
    assert!(approx(frame.kinematics.velocity.y, 22.25));
    assert!(approx(frame.kinematics.angular_velocity.z, 0.125));
    assert!(approx(frame.kinematics.yaw, 3.0));
    assert!(approx(frame.kinematics.pitch, -0.5));
    assert!(approx(frame.kinematics.roll, 0.25));
    Ok(())
}

#[test]
fn per_wheel_groups_follow_fl_fr_rl_rr() -> TestResult {
    let mut data = make_packet();
    for (i, value) in [0.1f32, 0.2, 0.3, 0.4].into_iter().enumerate() {
        write_f32_le(&mut data, OFF_NORMALIZED_SUSPENSION_TRAVEL + i * 4, value);
        write_f32_le(&mut data, OFF_TIRE_TEMP + i * 4, 300.0 + value);
        write_f32_le(&mut data, OFF_SUSPENSION_TRAVEL_METERS + i * 4, value / 10.0);
    }
    write_i32_le(&mut data, 116, 0);
    write_i32_le(&mut data, 120, 1);
    write_i32_le(&mut data, 124, 0);
    write_i32_le(&mut data, 128, 2);
    write_f32_le(&mut data, 100, 55.0);
    write_f32_le(&mut data, 192, 0.75);

    let frame = decode_packet(&data)?;
    let travel = frame.suspension.normalized_travel;
    assert!(approx(travel.front_left, 0.1));
    assert!(approx(travel.front_right, 0.2));
    assert!(approx(travel.rear_left, 0.3));
    assert!(approx(travel.rear_right, 0.4));
    assert!(approx(frame.tires.temperature.rear_right, 300.0 + 0.4));
    assert!(approx(frame.suspension.travel_meters.rear_left, 0.3 / 10.0));
    assert_eq!(
        frame.surface.on_rumble_strip.to_array(),
        [false, true, false, true]
    );
    assert!(approx(frame.tires.rotation_speed.front_left, 55.0));
    assert!(approx(frame.tires.combined_slip.rear_right, 0.75));
    Ok(())
}

#[test]
fn car_metadata_literals() -> TestResult {
    let mut data = make_packet();
    write_i32_le(&mut data, 212, 5);
    write_i32_le(&mut data, 216, 998);
    write_i32_le(&mut data, 220, 2);
    write_i32_le(&mut data, 224, 8);
    write_i32_le(&mut data, 228, 31);
    data[232..240].copy_from_slice(&[9, 8, 7, 6, 5, 4, 3, 2]);
    write_i32_le(&mut data, 240, 2_345);

    let car = decode_packet(&data)?.car;
    assert_eq!(car.class, 5);
    assert_eq!(car.performance_index, 998);
    assert_eq!(car.drivetrain, 2);
    assert_eq!(car.num_cylinders, 8);
    assert_eq!(car.car_type, 31);
    assert_eq!(car.reserved, [9, 8, 7, 6, 5, 4, 3, 2]);
    assert_eq!(car.ordinal, 2_345);
    Ok(())
}

#[test]
fn dynamics_and_lap_timing_literals() -> TestResult {
    let mut data = make_packet();
    write_f32_le(&mut data, 244, -120.5);
    write_f32_le(&mut data, 252, 42.0);
    write_f32_le(&mut data, 256, 61.0);
    write_f32_le(&mut data, 260, 250_000.0);
    write_f32_le(&mut data, 264, 480.0);
    write_f32_le(&mut data, 284, 1.2);
    write_f32_le(&mut data, 288, 0.65);
    write_f32_le(&mut data, 292, 12_345.0);
    write_f32_le(&mut data, 296, 83.4);
    write_f32_le(&mut data, 300, 84.1);
    write_f32_le(&mut data, 304, 12.5);
    write_f32_le(&mut data, 308, 301.0);

    let d = decode_packet(&data)?.dynamics;
    assert!(approx(d.position.x, -120.5));
    assert!(approx(d.position.z, 42.0));
    assert!(approx(d.speed, 61.0));
    assert!(approx(d.power, 250_000.0));
    assert!(approx(d.torque, 480.0));
    assert!(approx(d.boost, 1.2));
    assert!(approx(d.fuel, 0.65));
    assert!(approx(d.distance_traveled, 12_345.0));
    assert!(approx(d.best_lap, 83.4));
    assert!(approx(d.last_lap, 84.1));
    assert!(approx(d.current_lap, 12.5));
    assert!(approx(d.current_race_time, 301.0));
    Ok(())
}

#[test]
fn progress_and_driver_input_literals() -> TestResult {
    let mut data = make_packet();
    data[312..314].copy_from_slice(&7u16.to_le_bytes());
    data[314..323].copy_from_slice(&[3, 255, 128, 10, 200, 4, 127, 60, 90]);

    let frame = decode_packet(&data)?;
    assert_eq!(frame.progress.lap_number, 7);
    assert_eq!(frame.progress.race_position, 3);
    let input = frame.input;
    assert_eq!(input.throttle, 255);
    assert_eq!(input.brake, 128);
    assert_eq!(input.clutch, 10);
    assert_eq!(input.handbrake, 200);
    assert_eq!(input.gear, 4);
    assert_eq!(input.steer, 127);
    assert_eq!(input.normalized_driving_line, 60);
    assert_eq!(input.normalized_ai_brake_difference, 90);
    Ok(())
}

#[test]
fn one_byte_short_is_truncated() {
    let data = vec![0u8; FRAME_LEN - 1];
    assert_eq!(
        decode_packet(&data),
        Err(DecodeError::TruncatedPacket {
            required: FRAME_LEN,
            actual: FRAME_LEN - 1
        })
    );
}

#[test]
fn receive_buffer_prefix_only() -> TestResult {
    // Simulates a 1024-byte receive buffer holding one full packet followed by
    // stale bytes from an earlier, larger datagram.
    let mut buffer = vec![0xEEu8; MAX_DATAGRAM_LEN];
    buffer[..FRAME_LEN].fill(0);
    write_i32_le(&mut buffer, 0, 1);

    let frame = decode(&buffer, FRAME_LEN)?;
    assert!(frame.is_race_on);
    assert_eq!(frame.input.normalized_ai_brake_difference, 0);
    Ok(())
}
