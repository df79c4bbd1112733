// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Link configuration

/// How the receive handler treats packets older than the peer snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FreshnessPolicy {
    /// Every validated packet overwrites the snapshot, even if reordered
    #[default]
    LastWriterWins,

    /// Drop packets whose sequence is not newer than the snapshot's
    RejectOlder,
}

/// Link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkConfig {
    /// Peer snapshot update policy
    pub freshness: FreshnessPolicy,
}

impl LinkConfig {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the freshness policy
    pub fn with_freshness(mut self, freshness: FreshnessPolicy) -> Self {
        self.freshness = freshness;
        self
    }
}
