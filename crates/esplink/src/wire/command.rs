// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Command packet (UGV -> UAV)
//!
//! ## Layout (7 bytes, little-endian, packed)
//!
//! ```text
//! off  size  field
//!   0     1  type = 2
//!   1     4  command_sequence  u32
//!   5     1  command           u8
//!   6     1  emergency_stop    bool
//! ```

use core::fmt;

use super::cursor::{WireReader, WireWriter};
use super::{PacketKind, COMMAND_SIZE, TAG_COMMAND};
use crate::error::DecodeError;

/// Command code carried in a command packet
///
/// Any byte value is carried unchanged; the codec does not judge command
/// semantics. The named constants are the codes both nodes understand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CommandCode(pub u8);

impl CommandCode {
    /// No command
    pub const NONE: Self = Self(0);
    /// Arm motors
    pub const ARM: Self = Self(1);
    /// Disarm motors
    pub const DISARM: Self = Self(2);
    /// Land
    pub const LAND: Self = Self(3);
    /// Emergency stop
    pub const EMERGENCY_STOP: Self = Self(4);

    /// Create from a raw code
    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    /// Raw code
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// True for codes 0..=4
    pub const fn is_known(&self) -> bool {
        self.0 <= Self::EMERGENCY_STOP.0
    }

    /// Human-readable name, `"unknown"` for codes outside 0..=4
    pub const fn name(&self) -> &'static str {
        match self.0 {
            0 => "none",
            1 => "arm",
            2 => "disarm",
            3 => "land",
            4 => "emergency_stop",
            _ => "unknown",
        }
    }
}

impl From<u8> for CommandCode {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

impl fmt::Debug for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandCode({}:{})", self.0, self.name())
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "unknown({})", self.0)
        }
    }
}

/// Command issued by the UGV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandPacket {
    /// Per-sender counter, wraps on overflow
    pub command_sequence: u32,

    /// Command code
    pub command: CommandCode,

    /// Requested emergency-stop latch value
    pub emergency_stop: bool,
}

impl CommandPacket {
    /// Encode to the canonical 7-byte layout
    pub fn encode(&self) -> [u8; COMMAND_SIZE] {
        let mut buf = [0u8; COMMAND_SIZE];
        let mut w = WireWriter::new(&mut buf);
        w.put_u8(TAG_COMMAND)
            .put_u32(self.command_sequence)
            .put_u8(self.command.value())
            .put_bool(self.emergency_stop);
        debug_assert_eq!(w.position(), COMMAND_SIZE);
        buf
    }

    pub(crate) fn decode_tagged(buf: &[u8]) -> Result<Self, DecodeError> {
        if buf.len() != COMMAND_SIZE {
            return Err(DecodeError::SizeMismatch {
                expected: PacketKind::Command.canonical_size(),
                actual: buf.len(),
            });
        }

        let mut r = WireReader::new(buf, COMMAND_SIZE);
        let _tag = r.u8()?;

        let packet = Self {
            command_sequence: r.u32()?,
            command: CommandCode::new(r.u8()?),
            emergency_stop: r.bool()?,
        };
        debug_assert_eq!(r.remaining(), 0);
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_code_names() {
        assert_eq!(CommandCode::ARM.name(), "arm");
        assert_eq!(CommandCode::EMERGENCY_STOP.name(), "emergency_stop");
        assert!(CommandCode::LAND.is_known());
        assert!(!CommandCode::new(200).is_known());
        assert_eq!(CommandCode::new(200).to_string(), "unknown(200)");
    }

    #[test]
    fn test_encode_layout() {
        let packet = CommandPacket {
            command_sequence: 7,
            command: CommandCode::ARM,
            emergency_stop: false,
        };
        assert_eq!(packet.encode(), [2, 7, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_unknown_code_carried_through() {
        let packet = CommandPacket {
            command_sequence: u32::MAX,
            command: CommandCode::new(0xee),
            emergency_stop: true,
        };
        let decoded = CommandPacket::decode_tagged(&packet.encode()).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            CommandPacket::decode_tagged(&[2, 0, 0, 0, 0, 0, 0, 0]),
            Err(DecodeError::SizeMismatch {
                expected: 7,
                actual: 8
            })
        );
    }
}
