// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! UGV role - commands out, telemetry in

use super::Role;
use crate::link::{PeerSnapshot, Sequence};
use crate::wire::{CommandCode, CommandPacket, TelemetryPacket};

/// What the UGV asks for on each transmit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandPlan {
    /// Demo cycle: command = seq % 4, emergency stop on odd sequences
    #[default]
    Cycle,

    /// Same command and emergency-stop request every time
    Fixed {
        /// Command code
        command: CommandCode,
        /// Requested latch value
        emergency_stop: bool,
    },
}

/// Command producer for the ground unit
#[derive(Debug, Clone, Copy, Default)]
pub struct UgvRole {
    plan: CommandPlan,
}

impl UgvRole {
    /// Create with the demo cycle plan
    pub const fn new() -> Self {
        Self {
            plan: CommandPlan::Cycle,
        }
    }

    /// Create with a given plan
    pub const fn with_plan(plan: CommandPlan) -> Self {
        Self { plan }
    }

    /// Current plan
    pub const fn plan(&self) -> CommandPlan {
        self.plan
    }

    /// Replace the plan; takes effect on the next transmit
    pub fn set_plan(&mut self, plan: CommandPlan) {
        self.plan = plan;
    }
}

impl Role for UgvRole {
    type Outgoing = CommandPacket;
    type Incoming = TelemetryPacket;

    const NAME: &'static str = "UGV";

    fn build(
        &mut self,
        sequence: Sequence,
        _now_ms: u32,
        _peer: &PeerSnapshot<TelemetryPacket>,
    ) -> CommandPacket {
        let seq = sequence.value();

        let (command, emergency_stop) = match self.plan {
            CommandPlan::Cycle => (CommandCode::new((seq % 4) as u8), seq % 2 == 1),
            CommandPlan::Fixed {
                command,
                emergency_stop,
            } => (command, emergency_stop),
        };

        CommandPacket {
            command_sequence: seq,
            command,
            emergency_stop,
        }
    }
}
