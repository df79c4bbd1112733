// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-node link state
//!
//! Two disjoint pieces of memory:
//!
//! - [`OutgoingCounter`], written only by the transmit driver
//! - [`PeerSnapshot`], written only by the receive handler
//!
//! [`LinkState::split_mut`] hands out both halves at once so neither path can
//! touch the other's fields.
//!
//! ## Ordering caveat
//!
//! With [`FreshnessPolicy::LastWriterWins`] (the default) there is no staleness
//! check: a reordered or duplicated datagram overwrites newer state with older
//! values. [`FreshnessPolicy::RejectOlder`] opts into serial-number filtering.

use crate::config::FreshnessPolicy;
use crate::error::{Error, Result};
use crate::wire::{CommandCode, CommandPacket, TelemetryPacket, WirePacket};

mod sequence;

pub use sequence::Sequence;

/// Outgoing sequence counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutgoingCounter {
    next: Sequence,
}

impl OutgoingCounter {
    /// Counter starting at 0
    pub const fn new() -> Self {
        Self {
            next: Sequence::ZERO,
        }
    }

    /// Counter resuming at `next`
    #[cfg(test)]
    pub(crate) const fn starting_at(next: Sequence) -> Self {
        Self { next }
    }

    /// Sequence the next outgoing packet will carry
    pub const fn current(&self) -> Sequence {
        self.next
    }

    /// Advance after a hand-off to the transport (wrapping)
    pub fn commit(&mut self) {
        self.next.increment();
    }
}

/// Peer-derived snapshot
///
/// Holds the last accepted packet from the peer. `None` until the first
/// accept, in which case the role views report their initial values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeerSnapshot<P> {
    last: Option<P>,
    accepted: u32,
}

impl<P> Default for PeerSnapshot<P> {
    fn default() -> Self {
        Self {
            last: None,
            accepted: 0,
        }
    }
}

impl<P: WirePacket> PeerSnapshot<P> {
    /// Empty snapshot
    pub const fn new() -> Self {
        Self {
            last: None,
            accepted: 0,
        }
    }

    /// Last accepted packet
    pub const fn last(&self) -> Option<&P> {
        self.last.as_ref()
    }

    /// Sequence of the last accepted packet
    pub fn last_sequence(&self) -> Option<Sequence> {
        self.last.map(|p| Sequence::new(p.sequence()))
    }

    /// Packets accepted since startup (wrapping)
    pub const fn accepted(&self) -> u32 {
        self.accepted
    }

    /// Check a packet against the freshness policy without applying it
    pub fn check(&self, packet: &P, policy: FreshnessPolicy) -> Result<()> {
        match (policy, self.last_sequence()) {
            (FreshnessPolicy::RejectOlder, Some(last)) => {
                let received = Sequence::new(packet.sequence());
                if received.is_newer_than(last) {
                    Ok(())
                } else {
                    Err(Error::Stale {
                        last: last.value(),
                        received: received.value(),
                    })
                }
            }
            _ => Ok(()),
        }
    }

    /// Overwrite the snapshot from a validated packet
    pub fn apply(&mut self, packet: P, policy: FreshnessPolicy) -> Result<()> {
        self.check(&packet, policy)?;
        self.last = Some(packet);
        self.accepted = self.accepted.wrapping_add(1);
        Ok(())
    }
}

/// UAV view: state derived from the UGV's commands
impl PeerSnapshot<CommandPacket> {
    /// Emergency-stop latch
    ///
    /// Equals the request in the last accepted command (last writer wins, not
    /// sticky). `false` until a command arrives.
    pub fn emergency_stop(&self) -> bool {
        self.last.map(|c| c.emergency_stop).unwrap_or(false)
    }

    /// Last applied command code
    pub fn last_command(&self) -> CommandCode {
        self.last.map(|c| c.command).unwrap_or(CommandCode::NONE)
    }

    /// Sequence id of the last applied command
    pub fn last_command_sequence(&self) -> u32 {
        self.last.map(|c| c.command_sequence).unwrap_or(0)
    }
}

/// UGV view: state derived from the UAV's telemetry
impl PeerSnapshot<TelemetryPacket> {
    /// Sequence of the last telemetry packet
    pub fn last_telemetry_sequence(&self) -> u32 {
        self.last.map(|t| t.sequence).unwrap_or(0)
    }

    /// Command the UAV reports having applied
    pub fn last_command_ack(&self) -> CommandCode {
        self.last
            .map(|t| t.last_command_ack)
            .unwrap_or(CommandCode::NONE)
    }

    /// UAV's reported emergency-stop state
    pub fn peer_emergency_stop(&self) -> bool {
        self.last.map(|t| t.emergency_stop).unwrap_or(false)
    }

    /// Last telemetry packet
    pub fn last_telemetry(&self) -> Option<&TelemetryPacket> {
        self.last.as_ref()
    }
}

/// Link state owned by one node
///
/// `P` is the packet kind received from the peer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkState<P> {
    outgoing: OutgoingCounter,
    peer: PeerSnapshot<P>,
}

impl<P> Default for LinkState<P> {
    fn default() -> Self {
        Self {
            outgoing: OutgoingCounter::default(),
            peer: PeerSnapshot::default(),
        }
    }
}

impl<P: WirePacket> LinkState<P> {
    /// Fresh state: counter 0, empty snapshot
    pub const fn new() -> Self {
        Self {
            outgoing: OutgoingCounter::new(),
            peer: PeerSnapshot::new(),
        }
    }

    /// Outgoing counter
    pub const fn outgoing(&self) -> &OutgoingCounter {
        &self.outgoing
    }

    /// Peer-derived snapshot
    pub const fn peer(&self) -> &PeerSnapshot<P> {
        &self.peer
    }

    /// Borrow both halves mutably and independently
    pub fn split_mut(&mut self) -> (&mut OutgoingCounter, &mut PeerSnapshot<P>) {
        (&mut self.outgoing, &mut self.peer)
    }
}
