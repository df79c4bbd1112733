// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Packed little-endian field cursors
//!
//! Unlike CDR there is no alignment: every field follows the previous one
//! byte-for-byte, matching a `packed` struct on both radios.

use crate::error::DecodeError;

/// Field writer over a fixed output buffer
///
/// Writers are only constructed over buffers sized by the packet layout, so
/// writes never run past the end.
pub(crate) struct WireWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WireWriter<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far
    pub(crate) const fn position(&self) -> usize {
        self.pos
    }

    fn put_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
        self
    }

    pub(crate) fn put_u8(&mut self, value: u8) -> &mut Self {
        self.put_bytes(&[value])
    }

    /// Always writes 0 or 1
    pub(crate) fn put_bool(&mut self, value: bool) -> &mut Self {
        self.put_u8(u8::from(value))
    }

    pub(crate) fn put_u32(&mut self, value: u32) -> &mut Self {
        self.put_bytes(&value.to_le_bytes())
    }

    pub(crate) fn put_f32(&mut self, value: f32) -> &mut Self {
        self.put_bytes(&value.to_bits().to_le_bytes())
    }
}

/// Field reader over a received datagram
pub(crate) struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
    expected: usize,
}

impl<'a> WireReader<'a> {
    /// `expected` is the canonical size reported if the buffer runs short
    pub(crate) const fn new(buf: &'a [u8], expected: usize) -> Self {
        Self {
            buf,
            pos: 0,
            expected,
        }
    }

    pub(crate) const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let end = self.pos + N;
        let bytes = self
            .buf
            .get(self.pos..end)
            .ok_or(DecodeError::SizeMismatch {
                expected: self.expected,
                actual: self.buf.len(),
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.pos = end;
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take::<1>()?[0])
    }

    /// Any nonzero byte is true
    pub(crate) fn bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.u8()? != 0)
    }

    pub(crate) fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    pub(crate) fn f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_bits(u32::from_le_bytes(self.take()?)))
    }
}
