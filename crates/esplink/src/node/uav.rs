// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! UAV role - telemetry out, commands in

use super::Role;
use crate::link::{PeerSnapshot, Sequence};
use crate::wire::{CommandPacket, TelemetryPacket};

/// Telemetry producer for the aerial unit
///
/// Velocity and marker values are simulated from the sequence number:
/// velocity ramps `1.0..2.9` over a 20-packet cycle and the marker flag
/// toggles every 10 packets. The emergency-stop and ack fields are read
/// from the command snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct UavRole {
    _private: (),
}

impl UavRole {
    /// Create the UAV role
    pub const fn new() -> Self {
        Self { _private: () }
    }

    fn velocity(seq: u32) -> f32 {
        1.0 + 0.1 * (seq % 20) as f32
    }

    fn marker(seq: u32) -> bool {
        (seq / 10) % 2 == 1
    }
}

impl Role for UavRole {
    type Outgoing = TelemetryPacket;
    type Incoming = CommandPacket;

    const NAME: &'static str = "UAV";

    fn build(
        &mut self,
        sequence: Sequence,
        now_ms: u32,
        peer: &PeerSnapshot<CommandPacket>,
    ) -> TelemetryPacket {
        let seq = sequence.value();
        let velocity = Self::velocity(seq);

        TelemetryPacket {
            sequence: seq,
            timestamp_ms: now_ms,
            velocity_x: velocity,
            velocity_y: velocity,
            marker_detected: Self::marker(seq),
            emergency_stop: peer.emergency_stop(),
            last_command_ack: peer.last_command(),
        }
    }
}
