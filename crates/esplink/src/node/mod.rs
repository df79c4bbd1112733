// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Link node - transmit driver and receive handler
//!
//! Both endpoints run the same machinery with swapped packet kinds; the
//! [`Role`] supplies the outgoing packet and names the kind expected back.
//!
//! # Design
//!
//! - Send-and-forget: the outgoing counter advances on every transmit,
//!   whatever the transport says
//! - Receive errors are counted, logged and discarded
//! - `transmit` writes only the outgoing counter, `receive` writes only the
//!   peer snapshot
//!
//! # Example
//!
//! ```ignore
//! let mut uav = UavNode::new(UavRole::new(), transport, ugv_addr, LinkConfig::default());
//!
//! // cadence tick
//! let report = uav.transmit(now_ms);
//!
//! // delivery
//! if let Ok(command) = uav.receive(&source, data) {
//!     println!("{:?}", command);
//! }
//! ```

use core::fmt;

use log::{debug, info, warn};

use crate::config::LinkConfig;
use crate::error::{DecodeError, Error, Result};
use crate::inbox::InboxConsumer;
use crate::link::{LinkState, PeerSnapshot, Sequence};
use crate::stats::{DeliveryStatus, LinkStats};
use crate::transport::Transport;
use crate::wire::{self, TelemetryPacket, WirePacket, COMMAND_SIZE, TELEMETRY_SIZE};

mod uav;
mod ugv;

pub use uav::UavRole;
pub use ugv::{CommandPlan, UgvRole};

/// Which side of the link a node plays
pub trait Role {
    /// Packet kind this role sends
    type Outgoing: WirePacket;

    /// Packet kind this role expects from its peer
    type Incoming: WirePacket;

    /// Short name used in logs
    const NAME: &'static str;

    /// Build the next outgoing packet
    ///
    /// `sequence` is the current outgoing counter; `peer` is read-only.
    fn build(
        &mut self,
        sequence: Sequence,
        now_ms: u32,
        peer: &PeerSnapshot<Self::Incoming>,
    ) -> Self::Outgoing;
}

/// Outcome of one transmit cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TxReport<P> {
    /// Sequence carried by the packet
    pub sequence: Sequence,

    /// Packet handed to the transport
    pub packet: P,

    /// Encoded length
    pub len: usize,

    /// Transport verdict (advisory)
    pub outcome: Result<()>,
}

impl<P> TxReport<P> {
    /// True if the transport accepted the datagram
    pub const fn is_accepted(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// One endpoint of the link
pub struct Node<R: Role, T: Transport> {
    role: R,
    transport: T,
    peer: T::Addr,
    link: LinkState<R::Incoming>,
    stats: LinkStats,
    config: LinkConfig,
}

/// UAV node: sends telemetry, consumes commands
pub type UavNode<T> = Node<UavRole, T>;

/// UGV node: sends commands, consumes telemetry
pub type UgvNode<T> = Node<UgvRole, T>;

impl<R: Role, T: Transport> Node<R, T>
where
    T::Addr: fmt::Debug,
{
    /// Create a node talking to exactly one peer
    ///
    /// All counters and latches start at their initial values.
    pub fn new(role: R, transport: T, peer: T::Addr, config: LinkConfig) -> Self {
        info!(
            "[{}] link up -> {:?} (telemetry={}B, command={}B, freshness={:?})",
            R::NAME,
            peer,
            TELEMETRY_SIZE,
            COMMAND_SIZE,
            config.freshness
        );

        Self {
            role,
            transport,
            peer,
            link: LinkState::new(),
            stats: LinkStats::new(),
            config,
        }
    }

    /// Run one transmit cycle
    ///
    /// Builds the packet from the current counter, hands it to the transport
    /// and advances the counter regardless of the transport's verdict.
    pub fn transmit(&mut self, now_ms: u32) -> TxReport<R::Outgoing> {
        let (outgoing, peer) = self.link.split_mut();
        let sequence = outgoing.current();

        let packet = self.role.build(sequence, now_ms, peer);
        let frame = packet.frame();
        let outcome = self.transport.send(&self.peer, frame.as_bytes());

        outgoing.commit();
        self.stats.record_tx(&outcome);

        match &outcome {
            Ok(()) => debug!("[{}] TX seq={} -> OK", R::NAME, sequence),
            Err(err) => warn!("[{}] TX seq={} -> FAIL: {}", R::NAME, sequence, err),
        }

        TxReport {
            sequence,
            packet,
            len: frame.len(),
            outcome,
        }
    }

    /// Handle one inbound datagram
    ///
    /// # Errors
    ///
    /// - `Error::Decode` for empty, unknown-tag or wrong-length datagrams
    /// - `Error::UnexpectedKind` if the packet is not the peer role's kind
    /// - `Error::Stale` if rejected by `FreshnessPolicy::RejectOlder`
    ///
    /// None of these change link state.
    pub fn receive(&mut self, source: &T::Addr, data: &[u8]) -> Result<R::Incoming> {
        let result = self.accept(data);

        match &result {
            Ok(packet) => {
                self.stats.record_rx_accepted();
                debug!("[{}] RX from {:?}: {:?}", R::NAME, source, packet);
            }
            Err(err) => {
                self.stats.record_rx_error(err);
                warn!(
                    "[{}] RX rejected from {:?}: {} (len={}, tag={:?})",
                    R::NAME,
                    source,
                    err,
                    data.len(),
                    data.first()
                );
            }
        }

        result
    }

    fn accept(&mut self, data: &[u8]) -> Result<R::Incoming> {
        if data.is_empty() {
            return Err(DecodeError::Empty.into());
        }

        let packet = wire::decode(data)?;
        let incoming =
            R::Incoming::from_packet(packet).map_err(|actual| Error::UnexpectedKind {
                expected: R::Incoming::KIND,
                actual,
            })?;

        let (_, peer) = self.link.split_mut();
        peer.apply(incoming, self.config.freshness)?;
        Ok(incoming)
    }

    /// Process every queued datagram in arrival order
    ///
    /// Returns the number accepted.
    pub fn drain<const N: usize>(&mut self, inbox: &mut InboxConsumer<'_, T::Addr, N>) -> usize {
        let mut accepted = 0;
        while let Some(datagram) = inbox.pop() {
            if self.receive(&datagram.source, &datagram.data).is_ok() {
                accepted += 1;
            }
        }
        accepted
    }

    /// Record the radio's asynchronous delivery report for the last send
    pub fn on_delivery_report(&mut self, status: DeliveryStatus) {
        self.stats.record_delivery(status);
        match status {
            DeliveryStatus::Delivered => debug!("[{}] delivery -> OK", R::NAME),
            DeliveryStatus::Failed => debug!("[{}] delivery -> FAIL", R::NAME),
        }
    }

    /// Link state
    pub const fn link(&self) -> &LinkState<R::Incoming> {
        &self.link
    }

    /// Link counters
    pub const fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// Configuration
    pub const fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Role policy
    pub const fn role(&self) -> &R {
        &self.role
    }

    /// Role policy (mutable)
    pub fn role_mut(&mut self) -> &mut R {
        &mut self.role
    }

    /// Peer address
    pub const fn peer(&self) -> &T::Addr {
        &self.peer
    }

    /// Transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Transport (mutable)
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T: Transport> Node<UavRole, T>
where
    T::Addr: fmt::Debug,
{
    /// Current emergency-stop latch
    pub fn emergency_stop(&self) -> bool {
        self.link.peer().emergency_stop()
    }
}

impl<T: Transport> Node<UgvRole, T>
where
    T::Addr: fmt::Debug,
{
    /// Last telemetry received from the UAV
    pub fn last_telemetry(&self) -> Option<&TelemetryPacket> {
        self.link.peer().last_telemetry()
    }
}
