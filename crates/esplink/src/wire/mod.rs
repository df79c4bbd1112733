// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire codec
//!
//! Two fixed-layout packet kinds share one datagram channel. Byte 0 is the
//! type tag and the sole discriminator; the datagram length must equal the
//! tagged kind's canonical size exactly. There is no partial decoding.
//!
//! This layout is a cross-node contract: both radios must agree on it
//! byte-for-byte, so fields are written by hand at fixed offsets instead of
//! relying on any in-memory struct layout.

use core::fmt;

use crate::error::DecodeError;
use crate::MAX_DATAGRAM_SIZE;

mod command;
mod cursor;
mod telemetry;

pub use command::{CommandCode, CommandPacket};
pub use telemetry::TelemetryPacket;

/// Tag byte for telemetry packets
pub const TAG_TELEMETRY: u8 = 1;

/// Tag byte for command packets
pub const TAG_COMMAND: u8 = 2;

/// Telemetry packet size: 1+4+4+4+4+1+1+1
pub const TELEMETRY_SIZE: usize = 20;

/// Command packet size: 1+4+1+1
pub const COMMAND_SIZE: usize = 7;

/// Largest encoded packet
pub const MAX_FRAME_SIZE: usize = TELEMETRY_SIZE;

const _: () = assert!(TELEMETRY_SIZE <= MAX_DATAGRAM_SIZE);
const _: () = assert!(COMMAND_SIZE <= MAX_DATAGRAM_SIZE);
const _: () = assert!(COMMAND_SIZE <= MAX_FRAME_SIZE);

/// Packet kind, identified by the leading tag byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    /// UAV -> UGV state report
    Telemetry,
    /// UGV -> UAV command
    Command,
}

impl PacketKind {
    /// Tag byte on the wire
    pub const fn tag(self) -> u8 {
        match self {
            PacketKind::Telemetry => TAG_TELEMETRY,
            PacketKind::Command => TAG_COMMAND,
        }
    }

    /// Kind for a tag byte, `None` if unrecognised
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            TAG_TELEMETRY => Some(PacketKind::Telemetry),
            TAG_COMMAND => Some(PacketKind::Command),
            _ => None,
        }
    }

    /// Exact encoded size of this kind
    pub const fn canonical_size(self) -> usize {
        match self {
            PacketKind::Telemetry => TELEMETRY_SIZE,
            PacketKind::Command => COMMAND_SIZE,
        }
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketKind::Telemetry => write!(f, "telemetry"),
            PacketKind::Command => write!(f, "command"),
        }
    }
}

/// A validated, decoded packet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Packet {
    /// Telemetry packet
    Telemetry(TelemetryPacket),
    /// Command packet
    Command(CommandPacket),
}

impl Packet {
    /// Kind of this packet
    pub const fn kind(&self) -> PacketKind {
        match self {
            Packet::Telemetry(_) => PacketKind::Telemetry,
            Packet::Command(_) => PacketKind::Command,
        }
    }

    /// Encode to a frame
    pub fn frame(&self) -> Frame {
        match self {
            Packet::Telemetry(t) => t.frame(),
            Packet::Command(c) => c.frame(),
        }
    }
}

impl From<TelemetryPacket> for Packet {
    fn from(packet: TelemetryPacket) -> Self {
        Packet::Telemetry(packet)
    }
}

impl From<CommandPacket> for Packet {
    fn from(packet: CommandPacket) -> Self {
        Packet::Command(packet)
    }
}

/// Encoded packet in a fixed-capacity buffer
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; MAX_FRAME_SIZE],
    len: usize,
}

impl Frame {
    fn from_slice(bytes: &[u8]) -> Self {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        buf[..bytes.len()].copy_from_slice(bytes);
        Self {
            buf,
            len: bytes.len(),
        }
    }

    /// Encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Encoded length
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false for frames built from packets
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame(")?;
        for (i, b) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

/// Packet kind a node can send or expect
///
/// Lets the transmit and receive paths be written once for both roles.
pub trait WirePacket: Sized + Copy + fmt::Debug {
    /// Kind tag of this packet
    const KIND: PacketKind;

    /// Canonical encoded size
    const SIZE: usize = Self::KIND.canonical_size();

    /// Encode into a frame
    fn frame(&self) -> Frame;

    /// Sender's sequence number
    fn sequence(&self) -> u32;

    /// Extract this kind from a decoded packet, or return the actual kind
    fn from_packet(packet: Packet) -> Result<Self, PacketKind>;
}

impl WirePacket for TelemetryPacket {
    const KIND: PacketKind = PacketKind::Telemetry;

    fn frame(&self) -> Frame {
        Frame::from_slice(&self.encode())
    }

    fn sequence(&self) -> u32 {
        self.sequence
    }

    fn from_packet(packet: Packet) -> Result<Self, PacketKind> {
        match packet {
            Packet::Telemetry(t) => Ok(t),
            other => Err(other.kind()),
        }
    }
}

impl WirePacket for CommandPacket {
    const KIND: PacketKind = PacketKind::Command;

    fn frame(&self) -> Frame {
        Frame::from_slice(&self.encode())
    }

    fn sequence(&self) -> u32 {
        self.command_sequence
    }

    fn from_packet(packet: Packet) -> Result<Self, PacketKind> {
        match packet {
            Packet::Command(c) => Ok(c),
            other => Err(other.kind()),
        }
    }
}

/// Encode a telemetry packet (always 20 bytes)
pub fn encode_telemetry(packet: &TelemetryPacket) -> [u8; TELEMETRY_SIZE] {
    packet.encode()
}

/// Encode a command packet (always 7 bytes)
pub fn encode_command(packet: &CommandPacket) -> [u8; COMMAND_SIZE] {
    packet.encode()
}

/// Read the tag byte without decoding the body
pub fn peek_kind(buf: &[u8]) -> Result<PacketKind, DecodeError> {
    let tag = *buf.first().ok_or(DecodeError::Empty)?;
    PacketKind::from_tag(tag).ok_or(DecodeError::UnknownType(tag))
}

/// Decode a datagram
///
/// # Errors
///
/// - `DecodeError::Empty` for a zero-length buffer
/// - `DecodeError::UnknownType` if byte 0 is not a known tag
/// - `DecodeError::SizeMismatch` if the length is not the tagged kind's size
pub fn decode(buf: &[u8]) -> Result<Packet, DecodeError> {
    match peek_kind(buf)? {
        PacketKind::Telemetry => TelemetryPacket::decode_tagged(buf).map(Packet::Telemetry),
        PacketKind::Command => CommandPacket::decode_tagged(buf).map(Packet::Command),
    }
}
