// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Link statistics
//!
//! Plain counters: the node owns its stats and mutates them from its one
//! logical thread, so no atomics are needed. All counters wrap.

use core::fmt;

use crate::error::{DecodeError, Error};

/// Asynchronous delivery report from the radio (ESP-NOW send callback)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Peer acknowledged at the MAC layer
    Delivered,
    /// No MAC-layer acknowledgment
    Failed,
}

/// Per-node link counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkStats {
    /// Send attempts
    pub tx_attempts: u32,
    /// Sends accepted by the transport
    pub tx_accepted: u32,
    /// Sends rejected by the transport
    pub tx_rejected: u32,
    /// Delivery reports: delivered
    pub delivered: u32,
    /// Delivery reports: failed
    pub delivery_failed: u32,
    /// Datagrams accepted into the peer snapshot
    pub rx_accepted: u32,
    /// Zero-length datagrams
    pub rx_empty: u32,
    /// Unknown tag byte
    pub rx_unknown_type: u32,
    /// Length does not match the tagged kind
    pub rx_size_mismatch: u32,
    /// Valid packet of the wrong kind for this role
    pub rx_unexpected_kind: u32,
    /// Dropped by the freshness policy
    pub rx_stale: u32,
}

fn bump(counter: &mut u32) {
    *counter = counter.wrapping_add(1);
}

impl LinkStats {
    /// All counters at zero
    pub const fn new() -> Self {
        Self {
            tx_attempts: 0,
            tx_accepted: 0,
            tx_rejected: 0,
            delivered: 0,
            delivery_failed: 0,
            rx_accepted: 0,
            rx_empty: 0,
            rx_unknown_type: 0,
            rx_size_mismatch: 0,
            rx_unexpected_kind: 0,
            rx_stale: 0,
        }
    }

    /// Record a send attempt and the transport's verdict
    pub fn record_tx<T>(&mut self, outcome: &Result<T, Error>) {
        bump(&mut self.tx_attempts);
        match outcome {
            Ok(_) => bump(&mut self.tx_accepted),
            Err(_) => bump(&mut self.tx_rejected),
        }
    }

    /// Record a delivery report
    pub fn record_delivery(&mut self, status: DeliveryStatus) {
        match status {
            DeliveryStatus::Delivered => bump(&mut self.delivered),
            DeliveryStatus::Failed => bump(&mut self.delivery_failed),
        }
    }

    /// Record an accepted datagram
    pub fn record_rx_accepted(&mut self) {
        bump(&mut self.rx_accepted);
    }

    /// Record a rejected datagram by reason
    pub fn record_rx_error(&mut self, err: &Error) {
        let counter = match err {
            Error::Decode(DecodeError::Empty) => &mut self.rx_empty,
            Error::Decode(DecodeError::UnknownType(_)) => &mut self.rx_unknown_type,
            Error::Decode(DecodeError::SizeMismatch { .. }) => &mut self.rx_size_mismatch,
            Error::UnexpectedKind { .. } => &mut self.rx_unexpected_kind,
            Error::Stale { .. } => &mut self.rx_stale,
            Error::TransportRejected(_) => return,
        };
        bump(counter);
    }

    /// Total rejected datagrams
    pub const fn rx_rejected(&self) -> u32 {
        self.rx_empty
            .wrapping_add(self.rx_unknown_type)
            .wrapping_add(self.rx_size_mismatch)
            .wrapping_add(self.rx_unexpected_kind)
            .wrapping_add(self.rx_stale)
    }
}

impl fmt::Display for LinkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TX {} (ok={}, rejected={}, delivered={}, failed={}) | \
             RX ok={} rejected={} (empty={}, unknown={}, size={}, kind={}, stale={})",
            self.tx_attempts,
            self.tx_accepted,
            self.tx_rejected,
            self.delivered,
            self.delivery_failed,
            self.rx_accepted,
            self.rx_rejected(),
            self.rx_empty,
            self.rx_unknown_type,
            self.rx_size_mismatch,
            self.rx_unexpected_kind,
            self.rx_stale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RejectReason;
    use crate::wire::PacketKind;

    #[test]
    fn test_record_tx() {
        let mut stats = LinkStats::new();
        stats.record_tx::<()>(&Ok(()));
        stats.record_tx::<()>(&Err(Error::TransportRejected(RejectReason::Busy)));

        assert_eq!(stats.tx_attempts, 2);
        assert_eq!(stats.tx_accepted, 1);
        assert_eq!(stats.tx_rejected, 1);
    }

    #[test]
    fn test_record_rx_errors() {
        let mut stats = LinkStats::new();
        stats.record_rx_error(&DecodeError::Empty.into());
        stats.record_rx_error(&DecodeError::UnknownType(9).into());
        stats.record_rx_error(
            &DecodeError::SizeMismatch {
                expected: 7,
                actual: 3,
            }
            .into(),
        );
        stats.record_rx_error(&Error::UnexpectedKind {
            expected: PacketKind::Command,
            actual: PacketKind::Telemetry,
        });
        stats.record_rx_error(&Error::Stale {
            last: 2,
            received: 1,
        });

        assert_eq!(stats.rx_empty, 1);
        assert_eq!(stats.rx_unknown_type, 1);
        assert_eq!(stats.rx_size_mismatch, 1);
        assert_eq!(stats.rx_unexpected_kind, 1);
        assert_eq!(stats.rx_stale, 1);
        assert_eq!(stats.rx_rejected(), 5);
        assert_eq!(stats.rx_accepted, 0);
    }

    #[test]
    fn test_delivery_reports() {
        let mut stats = LinkStats::new();
        stats.record_delivery(DeliveryStatus::Delivered);
        stats.record_delivery(DeliveryStatus::Failed);
        stats.record_delivery(DeliveryStatus::Failed);
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.delivery_failed, 2);
        assert_eq!(stats.tx_attempts, 0);
    }

    #[test]
    fn test_summary_format() {
        let mut stats = LinkStats::new();
        stats.record_rx_accepted();
        let summary = stats.to_string();
        assert!(summary.starts_with("TX 0"));
        assert!(summary.contains("RX ok=1 rejected=0"));
    }
}
