// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! UDP stand-in for the radio: receive thread and lossy send path

use crossbeam::channel::Sender;
use esplink::transport::udp::UdpTransport;
use esplink::{DeliveryStatus, Transport, MAX_DATAGRAM_SIZE};
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Read timeout so the thread notices shutdown
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One datagram as heard by the receive thread
#[derive(Debug)]
pub struct Inbound {
    pub source: SocketAddr,
    pub data: Vec<u8>,
}

/// Spawn the blocking receive thread for `transport`
///
/// Every datagram is forwarded unmodified, including empty and oversized
/// ones; validation is the node's job. The thread exits when `running` is
/// cleared or the channel's receiver is dropped.
pub fn spawn_reader(
    name: &str,
    transport: &UdpTransport,
    running: Arc<AtomicBool>,
    tx: Sender<Inbound>,
) -> io::Result<JoinHandle<()>> {
    let socket = transport.try_clone()?;
    socket.set_read_timeout(Some(POLL_INTERVAL))?;

    std::thread::Builder::new()
        .name(format!("esplink-rx-{}", name.to_lowercase()))
        .spawn(move || {
            // Oversized datagrams must arrive intact so the size check sees them
            let mut buf = vec![0u8; MAX_DATAGRAM_SIZE * 2];
            log::debug!("[RX-THREAD] started on {:?}", socket.local_addr());

            while running.load(Ordering::Relaxed) {
                match socket.recv(&mut buf) {
                    Ok((len, source)) => {
                        let inbound = Inbound {
                            source,
                            data: buf[..len].to_vec(),
                        };
                        if tx.send(inbound).is_err() {
                            break;
                        }
                    }
                    Err(e)
                        if e.kind() == io::ErrorKind::WouldBlock
                            || e.kind() == io::ErrorKind::TimedOut
                            || e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => log::warn!("[RX-THREAD] recv error: {}", e),
                }
            }

            log::debug!("[RX-THREAD] stopped");
        })
}

/// Transport wrapper that loses a fraction of datagrams "on the air"
///
/// A lost datagram is still reported as accepted by the send primitive,
/// like a radio that queued the frame but never got it across. The loss
/// shows up in the next delivery report instead.
pub struct LossyTransport<T> {
    inner: T,
    rng: fastrand::Rng,
    drop_rate: f64,
    dropped: u64,
    last_delivery: Option<DeliveryStatus>,
}

impl<T: Transport> LossyTransport<T> {
    /// Wrap `inner`; `drop_rate` is clamped to `0.0..=1.0`
    pub fn new(inner: T, drop_rate: f64, seed: u64) -> Self {
        Self {
            inner,
            rng: fastrand::Rng::with_seed(seed),
            drop_rate: drop_rate.clamp(0.0, 1.0),
            dropped: 0,
            last_delivery: None,
        }
    }

    /// Lossless pass-through
    pub fn reliable(inner: T) -> Self {
        Self::new(inner, 0.0, 0)
    }

    /// Datagrams discarded so far
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Delivery outcome of the last accepted send, if not yet consumed
    pub fn take_delivery(&mut self) -> Option<DeliveryStatus> {
        self.last_delivery.take()
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for LossyTransport<T> {
    type Addr = T::Addr;

    fn send(&mut self, dest: &Self::Addr, data: &[u8]) -> esplink::Result<()> {
        if self.drop_rate > 0.0 && self.rng.f64() < self.drop_rate {
            self.dropped += 1;
            self.last_delivery = Some(DeliveryStatus::Failed);
            log::trace!("[LOSSY] dropped {} bytes", data.len());
            return Ok(());
        }

        self.inner.send(dest, data)?;
        self.last_delivery = Some(DeliveryStatus::Delivered);
        Ok(())
    }

    fn mtu(&self) -> usize {
        self.inner.mtu()
    }
}
