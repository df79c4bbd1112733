// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Single-consumer delivery queue
//!
//! The radio's receive callback runs in its own context (an interrupt or the
//! Wi-Fi task on ESP32). It must not touch link state. Instead it copies the
//! datagram into an [`InboxProducer`], and the node loop drains the matching
//! [`InboxConsumer`] via [`crate::Node::drain`].
//!
//! ```ignore
//! let mut inbox: Inbox<[u8; 6], 8> = Inbox::new();
//! let (mut producer, mut consumer) = inbox.split();
//!
//! // radio callback
//! producer.deliver(mac, data);
//!
//! // main loop
//! node.drain(&mut consumer);
//! ```

use heapless::spsc::{Consumer, Producer, Queue};
use heapless::Vec;

use crate::MAX_DATAGRAM_SIZE;

/// One received datagram with its source address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram<A> {
    /// Sender address
    pub source: A,
    /// Complete datagram bytes
    pub data: Vec<u8, MAX_DATAGRAM_SIZE>,
}

impl<A> Datagram<A> {
    /// Copy a delivery, `None` if it exceeds the radio payload ceiling
    pub fn new(source: A, bytes: &[u8]) -> Option<Self> {
        let data = Vec::from_slice(bytes).ok()?;
        Some(Self { source, data })
    }
}

/// Bounded spsc queue of datagrams
///
/// Holds at most `N - 1` datagrams.
pub struct Inbox<A, const N: usize> {
    queue: Queue<Datagram<A>, N>,
}

impl<A, const N: usize> Inbox<A, N> {
    /// Create an empty inbox
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
        }
    }

    /// Split into the delivery side and the node side
    pub fn split(&mut self) -> (InboxProducer<'_, A, N>, InboxConsumer<'_, A, N>) {
        let (producer, consumer) = self.queue.split();
        (
            InboxProducer {
                producer,
                dropped: 0,
            },
            InboxConsumer { consumer },
        )
    }
}

impl<A, const N: usize> Default for Inbox<A, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Delivery side, owned by the radio callback
pub struct InboxProducer<'a, A, const N: usize> {
    producer: Producer<'a, Datagram<A>, N>,
    dropped: u32,
}

impl<A, const N: usize> InboxProducer<'_, A, N> {
    /// Queue one datagram
    ///
    /// Returns false (and counts a drop) if the queue is full or the datagram
    /// is larger than the radio payload ceiling. Never blocks.
    pub fn deliver(&mut self, source: A, bytes: &[u8]) -> bool {
        let queued = Datagram::new(source, bytes)
            .map(|datagram| self.producer.enqueue(datagram).is_ok())
            .unwrap_or(false);
        if !queued {
            self.dropped = self.dropped.wrapping_add(1);
        }
        queued
    }

    /// Datagrams dropped at delivery
    pub const fn dropped(&self) -> u32 {
        self.dropped
    }
}

/// Node side, drained on the node's thread
pub struct InboxConsumer<'a, A, const N: usize> {
    consumer: Consumer<'a, Datagram<A>, N>,
}

impl<A, const N: usize> InboxConsumer<'_, A, N> {
    /// Next datagram in arrival order
    pub fn pop(&mut self) -> Option<Datagram<A>> {
        self.consumer.dequeue()
    }

    /// Number of queued datagrams
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    /// True if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
