// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wrapping sequence numbers

use core::fmt;

/// Per-sender 32-bit sequence number
///
/// Wraps silently at `u32::MAX`; wraparound is policy, not an error.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sequence(pub u32);

impl Sequence {
    /// Initial value of every outgoing counter
    pub const ZERO: Self = Self(0);

    /// Create a new sequence number
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the value
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Increment by 1, wrapping to 0 after `u32::MAX`
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    /// Get next sequence number
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Serial-number comparison (RFC 1982 style)
    ///
    /// `self` is newer than `other` if it lies in the half-range window after
    /// `other`, so `0` is newer than `u32::MAX`. Equal values are not newer.
    pub const fn is_newer_than(&self, other: Sequence) -> bool {
        let diff = self.0.wrapping_sub(other.0);
        diff != 0 && diff < (1 << 31)
    }
}

impl From<u32> for Sequence {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sequence({})", self.0)
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment() {
        let mut seq = Sequence::ZERO;
        seq.increment();
        assert_eq!(seq.value(), 1);
        assert_eq!(seq.next(), Sequence::new(2));
    }

    #[test]
    fn test_wraparound() {
        let mut seq = Sequence::new(u32::MAX);
        seq.increment();
        assert_eq!(seq, Sequence::ZERO);
    }

    #[test]
    fn test_newer_than() {
        assert!(Sequence::new(5).is_newer_than(Sequence::new(3)));
        assert!(!Sequence::new(3).is_newer_than(Sequence::new(5)));
        assert!(!Sequence::new(5).is_newer_than(Sequence::new(5)));

        // Across the wrap
        assert!(Sequence::new(0).is_newer_than(Sequence::new(u32::MAX)));
        assert!(Sequence::new(10).is_newer_than(Sequence::new(u32::MAX - 10)));
        assert!(!Sequence::new(u32::MAX).is_newer_than(Sequence::new(0)));
    }
}
