use crate::error::{Error, Result};

/// Packs bits into bytes, most significant bit first.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    /// Bits already used in the last byte (0 means the next bit starts a new byte)
    used: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_bits(bits: u64) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8) as usize),
            used: 0,
        }
    }

    pub fn push(&mut self, bit: bool) {
        if self.used == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << (7 - self.used);
            }
        }
        self.used = (self.used + 1) % 8;
    }

    pub fn extend_from_slice(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.push(bit);
        }
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> u64 {
        match self.used {
            0 => self.bytes.len() as u64 * 8,
            used => (self.bytes.len() as u64 - 1) * 8 + used as u64,
        }
    }

    /// Returns the packed bytes; the final byte is zero-padded.
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Reads bits MSB-first from a byte slice.
///
/// The reader has no notion of padding: callers stop once they have consumed
/// the bits they expect, and asking for more than the slice holds is a format
/// error.
#[derive(Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: u64,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        let byte_idx = (self.position / 8) as usize;
        let byte = self
            .bytes
            .get(byte_idx)
            .ok_or_else(|| Error::format("code stream ended before all symbols were decoded"))?;
        let bit = byte & (1 << (7 - (self.position % 8))) != 0;
        self.position += 1;
        Ok(bit)
    }

    /// Bits consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whole bytes touched so far, counting a partially read byte.
    pub fn bytes_consumed(&self) -> usize {
        self.position.div_ceil(8) as usize
    }
}
