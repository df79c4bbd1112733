// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! esplink-node - UAV/UGV link endpoint over UDP
//!
//! Runs one side of the radio link on a workstation, with UDP datagrams
//! standing in for ESP-NOW frames. `sim` runs both sides in-process over
//! loopback with optional packet loss.

mod radio;
mod runner;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use esplink::transport::udp::UdpTransport;
use esplink::{CommandCode, CommandPlan, FreshnessPolicy, LinkConfig, UavRole, UgvRole};
use radio::LossyTransport;
use runner::{LoopOptions, NodeLoop};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// UAV/UGV radio link endpoint
#[derive(Parser, Debug)]
#[command(name = "esplink-node")]
#[command(version)]
#[command(about = "Run a UAV or UGV link endpoint over UDP")]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Only print the final summary
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print link counters every N seconds (0 = never)
    #[arg(long, default_value = "0", global = true)]
    stats_interval_s: u64,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Aerial unit: send telemetry, obey commands
    Uav {
        /// Local address to bind
        #[arg(short, long, default_value = "0.0.0.0:7401")]
        bind: SocketAddr,

        /// UGV address
        #[arg(short, long)]
        peer: SocketAddr,

        /// Telemetry interval in milliseconds
        #[arg(short, long, default_value = "1000")]
        interval_ms: u64,

        /// Drop commands older than the last one accepted
        #[arg(long)]
        reject_stale: bool,
    },

    /// Ground unit: send commands, track telemetry
    Ugv {
        /// Local address to bind
        #[arg(short, long, default_value = "0.0.0.0:7402")]
        bind: SocketAddr,

        /// UAV address
        #[arg(short, long)]
        peer: SocketAddr,

        /// Command interval in milliseconds
        #[arg(short, long, default_value = "2000")]
        interval_ms: u64,

        /// Send this command every time instead of the demo cycle
        /// (none, arm, disarm, land, emergency-stop, or a raw code 0-255)
        #[arg(short, long, value_parser = parse_command)]
        command: Option<CommandCode>,

        /// Request emergency stop (implies a fixed command, default none)
        #[arg(long)]
        estop: bool,

        /// Drop telemetry older than the last one accepted
        #[arg(long)]
        reject_stale: bool,
    },

    /// Both units in one process over loopback
    Sim {
        /// Run time in seconds
        #[arg(short, long, default_value = "10")]
        duration_s: u64,

        /// Fraction of datagrams lost on the air (0.0 - 1.0)
        #[arg(long, default_value = "0.0")]
        drop_rate: f64,

        /// Seed for the loss pattern
        #[arg(long)]
        seed: Option<u64>,

        /// Telemetry interval in milliseconds
        #[arg(long, default_value = "200")]
        uav_interval_ms: u64,

        /// Command interval in milliseconds
        #[arg(long, default_value = "400")]
        ugv_interval_ms: u64,

        /// Apply the stale filter on both units
        #[arg(long)]
        reject_stale: bool,
    },
}

/// Accept a command name or a raw byte
fn parse_command(s: &str) -> Result<CommandCode, String> {
    let code = match s.to_ascii_lowercase().replace('_', "-").as_str() {
        "none" => CommandCode::NONE,
        "arm" => CommandCode::ARM,
        "disarm" => CommandCode::DISARM,
        "land" => CommandCode::LAND,
        "emergency-stop" | "estop" => CommandCode::EMERGENCY_STOP,
        other => other
            .parse::<u8>()
            .map(CommandCode::new)
            .map_err(|_| format!("unknown command '{}'", s))?,
    };
    Ok(code)
}

fn link_config(reject_stale: bool) -> LinkConfig {
    let freshness = if reject_stale {
        FreshnessPolicy::RejectOlder
    } else {
        FreshnessPolicy::LastWriterWins
    };
    LinkConfig::new().with_freshness(freshness)
}

fn command_plan(command: Option<CommandCode>, estop: bool) -> CommandPlan {
    match (command, estop) {
        (None, false) => CommandPlan::Cycle,
        (command, emergency_stop) => CommandPlan::Fixed {
            command: command.unwrap_or(CommandCode::NONE),
            emergency_stop,
        },
    }
}

fn interval(ms: u64) -> Result<Duration> {
    if ms == 0 {
        bail!("interval must be at least 1 ms");
    }
    Ok(Duration::from_millis(ms))
}

fn bind(addr: SocketAddr) -> Result<UdpTransport> {
    UdpTransport::bind(addr).with_context(|| format!("binding UDP socket on {}", addr))
}

fn main() {
    // RUST_LOG controls the link's own log output
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("installing Ctrl+C handler")?;

    let stats_interval =
        (args.stats_interval_s > 0).then(|| Duration::from_secs(args.stats_interval_s));

    match &args.mode {
        Mode::Uav {
            bind: addr,
            peer,
            interval_ms,
            reject_stale,
        } => {
            let options = LoopOptions {
                interval: interval(*interval_ms)?,
                stats_interval,
                quiet: args.quiet,
            };
            let transport = LossyTransport::reliable(bind(*addr)?);
            let mut node_loop = NodeLoop::new(
                UavRole::new(),
                transport,
                *peer,
                link_config(*reject_stale),
                options,
            )?;
            let stats = node_loop.run(&running, None);
            runner::summarize(&node_loop, &stats);
        }

        Mode::Ugv {
            bind: addr,
            peer,
            interval_ms,
            command,
            estop,
            reject_stale,
        } => {
            let options = LoopOptions {
                interval: interval(*interval_ms)?,
                stats_interval,
                quiet: args.quiet,
            };
            let transport = LossyTransport::reliable(bind(*addr)?);
            let mut node_loop = NodeLoop::new(
                UgvRole::with_plan(command_plan(*command, *estop)),
                transport,
                *peer,
                link_config(*reject_stale),
                options,
            )?;
            let stats = node_loop.run(&running, None);
            runner::summarize(&node_loop, &stats);
            println!("  {} {:?}", "Plan:".cyan(), node_loop.node().role().plan());
        }

        Mode::Sim {
            duration_s,
            drop_rate,
            seed,
            uav_interval_ms,
            ugv_interval_ms,
            reject_stale,
        } => run_sim(
            args,
            &running,
            stats_interval,
            SimParams {
                duration: Duration::from_secs(*duration_s),
                drop_rate: *drop_rate,
                seed: seed.unwrap_or_else(|| fastrand::u64(..)),
                uav_interval: interval(*uav_interval_ms)?,
                ugv_interval: interval(*ugv_interval_ms)?,
                config: link_config(*reject_stale),
            },
        )?,
    }

    Ok(())
}

struct SimParams {
    duration: Duration,
    drop_rate: f64,
    seed: u64,
    uav_interval: Duration,
    ugv_interval: Duration,
    config: LinkConfig,
}

fn run_sim(
    args: &Args,
    running: &AtomicBool,
    stats_interval: Option<Duration>,
    params: SimParams,
) -> Result<()> {
    if !(0.0..=1.0).contains(&params.drop_rate) {
        bail!("drop rate must be between 0.0 and 1.0");
    }

    let uav_socket = bind(SocketAddr::from(([127, 0, 0, 1], 0)))?;
    let ugv_socket = bind(SocketAddr::from(([127, 0, 0, 1], 0)))?;
    let uav_addr = uav_socket.local_addr()?;
    let ugv_addr = ugv_socket.local_addr()?;

    if !args.quiet {
        eprintln!(
            "{} Simulating {:?} (UAV {} <-> UGV {}, drop rate {:.2}, seed {})",
            ">>>".green().bold(),
            params.duration,
            uav_addr,
            ugv_addr,
            params.drop_rate,
            params.seed
        );
    }

    let mut uav = NodeLoop::new(
        UavRole::new(),
        LossyTransport::new(uav_socket, params.drop_rate, params.seed),
        ugv_addr,
        params.config,
        LoopOptions {
            interval: params.uav_interval,
            stats_interval,
            quiet: args.quiet,
        },
    )?;
    let mut ugv = NodeLoop::new(
        UgvRole::new(),
        LossyTransport::new(ugv_socket, params.drop_rate, params.seed.wrapping_add(1)),
        uav_addr,
        params.config,
        LoopOptions {
            interval: params.ugv_interval,
            stats_interval,
            quiet: args.quiet,
        },
    )?;

    let deadline = Some(Instant::now() + params.duration);
    let (uav_stats, ugv_stats) = std::thread::scope(|s| {
        let uav_run = s.spawn(|| uav.run(running, deadline));
        let ugv_run = s.spawn(|| ugv.run(running, deadline));
        (uav_run.join(), ugv_run.join())
    });
    let (Ok(uav_stats), Ok(ugv_stats)) = (uav_stats, ugv_stats) else {
        bail!("node thread panicked");
    };

    runner::summarize(&uav, &uav_stats);
    runner::summarize(&ugv, &ugv_stats);
    Ok(())
}
