// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for ESPLINK
//!
//! None of these are fatal. Receive-path errors are logged, counted and the
//! datagram is discarded; a transport rejection is logged and the counter
//! still advances.

use core::fmt;

use crate::wire::PacketKind;

/// Result type for ESPLINK operations
pub type Result<T> = core::result::Result<T, Error>;

/// Codec-level decode failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Zero-length datagram
    Empty,

    /// Leading tag byte is not a known packet kind
    UnknownType(u8),

    /// Tag recognised but the datagram length is not the canonical size
    SizeMismatch {
        /// Canonical size of the tagged kind
        expected: usize,
        /// Length actually received
        actual: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "Empty datagram"),
            DecodeError::UnknownType(tag) => write!(f, "Unknown packet type {}", tag),
            DecodeError::SizeMismatch { expected, actual } => {
                write!(f, "Size mismatch: expected {} bytes, got {}", expected, actual)
            }
        }
    }
}

/// Why the transport refused a send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Payload exceeds the transport MTU
    PayloadTooLarge,

    /// Destination is not a registered peer
    NoPeer,

    /// Radio TX queue full
    Busy,

    /// Underlying I/O failure
    Io,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::PayloadTooLarge => write!(f, "payload too large"),
            RejectReason::NoPeer => write!(f, "peer not registered"),
            RejectReason::Busy => write!(f, "transport busy"),
            RejectReason::Io => write!(f, "I/O error"),
        }
    }
}

/// Error type for ESPLINK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Datagram failed codec validation
    Decode(DecodeError),

    /// Packet decoded but is not the kind this role expects from its peer
    UnexpectedKind {
        /// Kind the role consumes
        expected: PacketKind,
        /// Kind that arrived
        actual: PacketKind,
    },

    /// Packet is not newer than the snapshot (only with `FreshnessPolicy::RejectOlder`)
    Stale {
        /// Sequence held in the snapshot
        last: u32,
        /// Sequence that arrived
        received: u32,
    },

    /// Send primitive reported failure
    TransportRejected(RejectReason),
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(err) => write!(f, "Decode error: {}", err),
            Error::UnexpectedKind { expected, actual } => {
                write!(f, "Unexpected packet kind: expected {}, got {}", expected, actual)
            }
            Error::Stale { last, received } => {
                write!(f, "Stale packet: seq {} is not newer than {}", received, last)
            }
            Error::TransportRejected(reason) => write!(f, "Transport rejected send: {}", reason),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::SizeMismatch {
            expected: 20,
            actual: 7,
        };
        assert_eq!(err.to_string(), "Size mismatch: expected 20 bytes, got 7");
        assert_eq!(DecodeError::UnknownType(99).to_string(), "Unknown packet type 99");
    }

    #[test]
    fn test_error_display() {
        let stale = Error::Stale {
            last: 5,
            received: 3,
        };
        assert_eq!(
            stale.to_string(),
            "Stale packet: seq 3 is not newer than 5"
        );
        assert_eq!(
            Error::TransportRejected(RejectReason::Busy).to_string(),
            "Transport rejected send: transport busy"
        );
    }
}
