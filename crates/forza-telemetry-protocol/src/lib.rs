//! Forza Horizon 5 "Data Out" telemetry packet protocol.
//!
//! The game streams one fixed-layout, little-endian datagram per physics tick
//! when Data Out is enabled in the HUD settings. This crate is I/O-free: it
//! owns the offset table ([`layout`]), the decoded record ([`TelemetryFrame`]),
//! the decoder, and an encoder used to produce synthetic traffic.
//!
//! # Example
//!
//! ```
//! use forza_telemetry_protocol::{decode, encode, TelemetryFrame, FRAME_LEN};
//!
//! let mut frame = TelemetryFrame::default();
//! frame.is_race_on = true;
//! frame.timestamp_ms = 123_456;
//!
//! let packet = encode(&frame);
//! assert_eq!(packet.len(), FRAME_LEN);
//!
//! let decoded = decode(&packet, packet.len())?;
//! assert!(decoded.is_race_on);
//! assert_eq!(decoded.timestamp_ms, 123_456);
//! # Ok::<(), forza_telemetry_protocol::DecodeError>(())
//! ```

#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod decoder;
pub mod encoder;
pub mod frame;
pub mod layout;

pub use decoder::{DecodeError, WireField, decode, decode_field_at, decode_packet, field_bytes};
pub use encoder::{WireEncode, encode};
pub use frame::{
    CarInfo, DriverInput, Dynamics, Engine, Kinematics, RaceProgress, Surface, Suspension,
    TelemetryFrame, Tires, Vec3, Wheels, normalize_u8,
};
pub use layout::{FIELD_TABLE, FRAME_LEN, FieldKind, FieldSpec, MAX_DATAGRAM_LEN};
