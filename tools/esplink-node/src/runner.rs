// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Node event loop: transmit cadence, inbound datagrams, periodic stats

use crate::radio::{self, Inbound, LossyTransport};
use anyhow::{Context, Result};
use colored::*;
use crossbeam::channel::{self, Receiver};
use esplink::transport::udp::UdpTransport;
use esplink::{CommandPacket, LinkConfig, LinkStats, Node, Role, TelemetryPacket};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// How often the loop re-checks the shutdown flag when idle
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// One-line rendering of a packet for the console
pub trait Describe {
    fn describe(&self) -> String;
}

impl Describe for TelemetryPacket {
    fn describe(&self) -> String {
        format!(
            "telemetry seq={} ts={} vx={:.2} vy={:.2} marker={} estop={} ack={}",
            self.sequence,
            self.timestamp_ms,
            self.velocity_x,
            self.velocity_y,
            u8::from(self.marker_detected),
            u8::from(self.emergency_stop),
            self.last_command_ack
        )
    }
}

impl Describe for CommandPacket {
    fn describe(&self) -> String {
        format!(
            "command seq={} cmd={} estop={}",
            self.command_sequence,
            self.command,
            u8::from(self.emergency_stop)
        )
    }
}

/// Loop settings shared by all modes
#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    pub interval: Duration,
    pub stats_interval: Option<Duration>,
    pub quiet: bool,
}

/// Node plus its receive thread
pub struct NodeLoop<R: Role> {
    node: Node<R, LossyTransport<UdpTransport>>,
    inbound: Receiver<Inbound>,
    reader: Option<JoinHandle<()>>,
    reader_running: Arc<AtomicBool>,
    options: LoopOptions,
    started: Instant,
}

impl<R> NodeLoop<R>
where
    R: Role,
    R::Outgoing: Describe,
    R::Incoming: Describe,
{
    /// Wire `role` to a UDP socket and start its receive thread
    pub fn new(
        role: R,
        transport: LossyTransport<UdpTransport>,
        peer: SocketAddr,
        config: LinkConfig,
        options: LoopOptions,
    ) -> Result<Self> {
        let (tx, inbound) = channel::unbounded();
        let reader_running = Arc::new(AtomicBool::new(true));
        let reader = radio::spawn_reader(R::NAME, transport.inner(), reader_running.clone(), tx)
            .with_context(|| format!("spawning {} receive thread", R::NAME))?;

        let node = Node::new(role, transport, peer, config);

        Ok(Self {
            node,
            inbound,
            reader: Some(reader),
            reader_running,
            options,
            started: Instant::now(),
        })
    }

    pub fn node(&self) -> &Node<R, LossyTransport<UdpTransport>> {
        &self.node
    }

    /// Milliseconds since the loop was created, wrapping like the firmware clock
    fn now_ms(&self) -> u32 {
        self.started.elapsed().as_millis() as u32
    }

    /// Run until `running` clears or `deadline` passes
    ///
    /// All link state is touched from this thread only.
    pub fn run(&mut self, running: &AtomicBool, deadline: Option<Instant>) -> LinkStats {
        let cadence = channel::tick(self.options.interval);
        let inbound = self.inbound.clone();
        let stats_tick = match self.options.stats_interval {
            Some(every) => channel::tick(every),
            None => channel::never(),
        };

        if !self.options.quiet {
            eprintln!(
                "{} {} node -> {} every {:?} (freshness {:?})",
                ">>>".green().bold(),
                R::NAME,
                self.node.peer(),
                self.options.interval,
                self.node.config().freshness
            );
        }

        // First packet goes out immediately, then on the cadence
        self.transmit();

        while running.load(Ordering::SeqCst) {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }

            crossbeam::select! {
                recv(cadence) -> _ => self.transmit(),
                recv(inbound) -> msg => match msg {
                    Ok(inbound) => self.receive(inbound),
                    Err(_) => {
                        log::warn!("[{}] receive thread gone", R::NAME);
                        break;
                    }
                },
                recv(stats_tick) -> _ => self.print_stats(),
                default(SHUTDOWN_POLL) => {}
            }
        }

        self.shutdown();
        *self.node.stats()
    }

    fn transmit(&mut self) {
        let now = self.now_ms();
        let report = self.node.transmit(now);

        if let Some(status) = self.node.transport_mut().take_delivery() {
            self.node.on_delivery_report(status);
        }

        if self.options.quiet {
            return;
        }
        match &report.outcome {
            Ok(()) => println!(
                "[{}] {} {} ({}B)",
                R::NAME,
                "TX".cyan(),
                report.packet.describe(),
                report.len
            ),
            Err(e) => println!(
                "[{}] {} seq={} {}",
                R::NAME,
                "TX FAIL".red().bold(),
                report.sequence,
                e
            ),
        }
    }

    fn receive(&mut self, inbound: Inbound) {
        let result = self.node.receive(&inbound.source, &inbound.data);

        if self.options.quiet {
            return;
        }
        match result {
            Ok(packet) => println!("[{}] {} {}", R::NAME, "RX".green(), packet.describe()),
            Err(e) => println!(
                "[{}] {} from {} ({} bytes): {}",
                R::NAME,
                "RX DROP".yellow(),
                inbound.source,
                inbound.data.len(),
                e
            ),
        }
    }

    fn print_stats(&self) {
        println!("[{}] {} {}", R::NAME, "STATS".magenta(), self.node.stats());
    }

    fn shutdown(&mut self) {
        self.reader_running.store(false, Ordering::SeqCst);
        if let Some(reader) = self.reader.take() {
            if reader.join().is_err() {
                log::error!("[{}] receive thread panicked", R::NAME);
            }
        }
    }
}

/// Final report printed on exit
pub fn print_summary(name: &str, stats: &LinkStats, next_sequence: u32, dropped: u64) {
    println!();
    println!("{} {} {}", "===".bold(), name.bold(), "link summary".bold());
    println!(
        "  {} {} (accepted {}, rejected {})",
        "Sent:".cyan(),
        stats.tx_attempts,
        stats.tx_accepted,
        stats.tx_rejected
    );
    println!(
        "  {} delivered {}, failed {}",
        "Delivery:".cyan(),
        stats.delivered,
        stats.delivery_failed
    );
    if dropped > 0 {
        println!("  {} {}", "Lost on air:".cyan(), dropped);
    }
    println!(
        "  {} accepted {}, rejected {}",
        "Received:".cyan(),
        stats.rx_accepted,
        stats.rx_rejected()
    );
    if stats.rx_rejected() > 0 {
        println!(
            "    {} empty={} unknown={} size={} kind={} stale={}",
            "by reason:".yellow(),
            stats.rx_empty,
            stats.rx_unknown_type,
            stats.rx_size_mismatch,
            stats.rx_unexpected_kind,
            stats.rx_stale
        );
    }
    println!("  {} {}", "Next sequence:".cyan(), next_sequence);
}

/// Summary for a finished loop
pub fn summarize<R>(node_loop: &NodeLoop<R>, stats: &LinkStats)
where
    R: Role,
    R::Outgoing: Describe,
    R::Incoming: Describe,
{
    let node = node_loop.node();
    print_summary(
        R::NAME,
        stats,
        node.link().outgoing().current().value(),
        node.transport().dropped(),
    );
}
