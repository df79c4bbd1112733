// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! UDP transport for host testing
//!
//! Stands in for the ESP-NOW radio on a workstation: one socket per node,
//! one datagram per packet, MTU clamped to the radio payload ceiling.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use crate::error::{Error, RejectReason, Result};
use crate::transport::Transport;
use crate::MAX_DATAGRAM_SIZE;

/// UDP datagram transport
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    mtu: usize,
}

impl UdpTransport {
    /// Bind a socket to `addr` (port 0 = OS assigns)
    pub fn bind<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        Ok(Self {
            socket,
            mtu: MAX_DATAGRAM_SIZE,
        })
    }

    /// Override the MTU (defaults to the radio ceiling)
    pub fn with_mtu(mut self, mtu: usize) -> Self {
        self.mtu = mtu;
        self
    }

    /// Local socket address
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Second handle on the same socket, for a dedicated reader thread
    pub fn try_clone(&self) -> io::Result<Self> {
        Ok(Self {
            socket: self.socket.try_clone()?,
            mtu: self.mtu,
        })
    }

    /// Bound how long `recv` blocks (`None` = forever)
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.socket.set_read_timeout(timeout)
    }

    /// Receive one datagram (blocking)
    ///
    /// # Returns
    ///
    /// (bytes_received, source_address)
    pub fn recv(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.socket.recv_from(buf)
    }
}

impl Transport for UdpTransport {
    type Addr = SocketAddr;

    fn send(&mut self, dest: &SocketAddr, data: &[u8]) -> Result<()> {
        if data.len() > self.mtu {
            return Err(Error::TransportRejected(RejectReason::PayloadTooLarge));
        }

        match self.socket.send_to(data, dest) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::debug!("udp send_to {} failed: {}", dest, e);
                let reason = match e.kind() {
                    io::ErrorKind::WouldBlock => RejectReason::Busy,
                    io::ErrorKind::AddrNotAvailable | io::ErrorKind::ConnectionRefused => {
                        RejectReason::NoPeer
                    }
                    _ => RejectReason::Io,
                };
                Err(Error::TransportRejected(reason))
            }
        }
    }

    fn mtu(&self) -> usize {
        self.mtu
    }
}
