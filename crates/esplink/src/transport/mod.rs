// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transport abstraction for ESPLINK
//!
//! The link core only needs one primitive from the radio: send a datagram to
//! the configured peer. Delivery in the other direction is pushed into the
//! node by the platform (a callback feeding [`crate::inbox`], or a reader
//! thread), so it is not part of this trait.
//!
//! ## Design Principles
//!
//! - **Advisory result** - a rejected send is reported, never retried
//! - **Non-blocking** - `send` must not wait for the peer
//! - **Zero-copy** - borrow slices instead of copying

use core::marker::PhantomData;

use crate::error::{Error, RejectReason, Result};
use crate::MAX_DATAGRAM_SIZE;

#[cfg(any(feature = "std", test))]
pub mod udp;

/// Transport trait for sending link datagrams
pub trait Transport {
    /// Peer address type (MAC address for ESP-NOW, socket address for UDP)
    type Addr;

    /// Send one datagram to `dest`
    ///
    /// # Errors
    ///
    /// `Error::TransportRejected` if the radio refused the datagram.
    fn send(&mut self, dest: &Self::Addr, data: &[u8]) -> Result<()>;

    /// Largest datagram the transport accepts
    fn mtu(&self) -> usize {
        MAX_DATAGRAM_SIZE
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Addr = T::Addr;

    fn send(&mut self, dest: &Self::Addr, data: &[u8]) -> Result<()> {
        (**self).send(dest, data)
    }

    fn mtu(&self) -> usize {
        (**self).mtu()
    }
}

/// Null transport (for testing)
///
/// Accepts and discards every datagram that fits the MTU.
pub struct NullTransport<A> {
    sent: u32,
    _addr: PhantomData<A>,
}

impl<A> NullTransport<A> {
    /// Create a new null transport
    pub const fn new() -> Self {
        Self {
            sent: 0,
            _addr: PhantomData,
        }
    }

    /// Datagrams accepted so far
    pub const fn sent(&self) -> u32 {
        self.sent
    }
}

impl<A> Default for NullTransport<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Transport for NullTransport<A> {
    type Addr = A;

    fn send(&mut self, _dest: &A, data: &[u8]) -> Result<()> {
        if data.len() > self.mtu() {
            return Err(Error::TransportRejected(RejectReason::PayloadTooLarge));
        }
        self.sent = self.sent.wrapping_add(1);
        Ok(())
    }
}
