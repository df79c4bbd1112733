// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # ESPLINK - UAV/UGV radio link protocol
//!
//! A `no_std` implementation of the point-to-point link between an aerial unit
//! (UAV) and a ground unit (UGV) sharing a connectionless, unreliable datagram
//! radio such as ESP-NOW.
//!
//! ## Design Constraints
//!
//! - **Payload ceiling**: 250 bytes per datagram
//! - **No heap allocations** (fixed-size frames, bounded inbox)
//! - **Send-and-forget**: no retries, no reordering, no deduplication
//! - **`no_std` compatible**
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------+
//! |  Cadence source / delivery callback     |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  Node<Role>: transmit() / receive()     |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  LinkState (counter + peer snapshot)    |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  Wire codec (Telemetry / Command)       |
//! +-----------------------------------------+
//!           v                    ^
//! +-----------------------------------------+
//! |  Transport (ESP-NOW / UDP)              |
//! +-----------------------------------------+
//! ```
//!
//! ## Feature Flags
//!
//! - `std` -- UDP transport and `std::error::Error` impls (host testing)

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Packet formats and the validating decoder
pub mod wire;

/// Per-node link state (outgoing counter, peer snapshot)
pub mod link;

/// Transmit driver and receive handler for both roles
pub mod node;

/// Transport abstraction (radio send primitive)
pub mod transport;

/// Single-consumer delivery queue between radio callback and node loop
pub mod inbox;

/// Link counters for observability
pub mod stats;

/// Link configuration
pub mod config;

/// Error types for ESPLINK
pub mod error;

// Re-exports for convenience
pub use crate::config::{FreshnessPolicy, LinkConfig};
pub use crate::error::{DecodeError, Error, RejectReason, Result};
pub use crate::link::{LinkState, PeerSnapshot, Sequence};
pub use crate::node::{CommandPlan, Node, Role, TxReport, UavNode, UavRole, UgvNode, UgvRole};
pub use crate::stats::{DeliveryStatus, LinkStats};
pub use crate::transport::Transport;
pub use crate::wire::{
    decode, encode_command, encode_telemetry, CommandCode, CommandPacket, Packet, PacketKind,
    TelemetryPacket,
};

/// Maximum datagram payload accepted by the radio
pub const MAX_DATAGRAM_SIZE: usize = 250;

/// Version of ESPLINK
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
