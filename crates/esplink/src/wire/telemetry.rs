// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Telemetry packet (UAV -> UGV)
//!
//! ## Layout (20 bytes, little-endian, packed)
//!
//! ```text
//! off  size  field
//!   0     1  type = 1
//!   1     4  sequence          u32
//!   5     4  timestamp_ms      u32
//!   9     4  velocity_x        f32
//!  13     4  velocity_y        f32
//!  17     1  marker_detected   bool
//!  18     1  emergency_stop    bool
//!  19     1  last_command_ack  u8
//! ```

use super::cursor::{WireReader, WireWriter};
use super::{CommandCode, PacketKind, TAG_TELEMETRY, TELEMETRY_SIZE};
use crate::error::DecodeError;

/// Periodic state report from the UAV
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelemetryPacket {
    /// Per-sender counter, wraps on overflow
    pub sequence: u32,

    /// Sender-local clock at send time
    pub timestamp_ms: u32,

    /// Simulated velocity, X axis
    pub velocity_x: f32,

    /// Simulated velocity, Y axis
    pub velocity_y: f32,

    /// Sensor flag
    pub marker_detected: bool,

    /// UAV's current latched emergency state
    pub emergency_stop: bool,

    /// Echo of the most recently applied command
    pub last_command_ack: CommandCode,
}

impl TelemetryPacket {
    /// Encode to the canonical 20-byte layout
    pub fn encode(&self) -> [u8; TELEMETRY_SIZE] {
        let mut buf = [0u8; TELEMETRY_SIZE];
        let mut w = WireWriter::new(&mut buf);
        w.put_u8(TAG_TELEMETRY)
            .put_u32(self.sequence)
            .put_u32(self.timestamp_ms)
            .put_f32(self.velocity_x)
            .put_f32(self.velocity_y)
            .put_bool(self.marker_detected)
            .put_bool(self.emergency_stop)
            .put_u8(self.last_command_ack.value());
        debug_assert_eq!(w.position(), TELEMETRY_SIZE);
        buf
    }

    /// Decode a datagram already known to carry the telemetry tag
    pub(crate) fn decode_tagged(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() != TELEMETRY_SIZE {
            return Err(DecodeError::SizeMismatch {
                expected: PacketKind::Telemetry.canonical_size(),
                actual: buf.len(),
            });
        }

        let mut r = WireReader::new(buf, TELEMETRY_SIZE);
        let _tag = r.u8()?;

        let packet = Self {
            sequence: r.u32()?,
            timestamp_ms: r.u32()?,
            velocity_x: r.f32()?,
            velocity_y: r.f32()?,
            marker_detected: r.bool()?,
            emergency_stop: r.bool()?,
            last_command_ack: CommandCode::new(r.u8()?),
        };
        debug_assert_eq!(r.remaining(), 0);
        Ok(packet)
    }
}
