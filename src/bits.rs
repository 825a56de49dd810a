//! Bit processing utilities
use crate::error::{Error, Result};
use core::fmt;

/// Longest code a [`PrefixCode`] can hold
///
/// A Huffman tree whose total weight fits in a `u64` is less than 93 levels
/// deep, so every code built from a valid frequency table fits.
pub const MAX_CODE_LEN: u8 = 128;

/// A variable-length code of up to [`MAX_CODE_LEN`] bits, most significant bit first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrefixCode {
    size: u8,
    value: u128,
}

impl PrefixCode {
    pub const EMPTY: Self = Self { size: 0, value: 0 };

    #[inline]
    pub const fn new(size: u8, value: u128) -> Option<Self> {
        if size > MAX_CODE_LEN {
            return None;
        }
        let value = if size == MAX_CODE_LEN {
            value
        } else {
            value & ((1u128 << size) - 1)
        };
        Some(Self { size, value })
    }

    #[inline]
    pub fn size(&self) -> u8 {
        self.size
    }

    #[inline]
    pub fn value(&self) -> u128 {
        self.value
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// This code with one more bit appended at the end
    #[inline]
    pub fn pushed(self, bit: bool) -> Self {
        debug_assert!(self.size < MAX_CODE_LEN, "prefix code overflow");
        Self {
            size: self.size + 1,
            value: (self.value << 1) | bit as u128,
        }
    }

    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.size > other.size {
            return false;
        }
        if self.size == 0 {
            return true;
        }
        other.value >> (other.size - self.size) == self.value
    }

    #[inline]
    pub fn bits(&self) -> impl Iterator<Item = bool> + use<> {
        let Self { size, value } = *self;
        (0..size).rev().map(move |i| (value >> i) & 1 != 0)
    }
}

impl fmt::Display for PrefixCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(width) = f.width() {
            for _ in self.size as usize..width {
                write!(f, " ")?;
            }
        }
        for bit in self.bits() {
            write!(f, "{}", bit as u8)?;
        }
        Ok(())
    }
}

/// Appends bits MSB-first into bytes
pub struct BitWriter {
    buf: Vec<u8>,
    acc: u8,
    bit_position: u8,
}

impl BitWriter {
    #[inline]
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            acc: 0,
            bit_position: 0,
        }
    }

    #[inline]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buf: Vec::with_capacity(bytes),
            acc: 0,
            bit_position: 0,
        }
    }

    #[inline]
    pub fn bit_count(&self) -> usize {
        self.buf.len() * 8 + self.bit_position as usize
    }

    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.bit_position == 0
    }

    pub fn push_bool(&mut self, value: bool) {
        self.acc |= (value as u8) << (7 - self.bit_position);
        self.bit_position += 1;
        if self.bit_position == 8 {
            self.buf.push(self.acc);
            self.acc = 0;
            self.bit_position = 0;
        }
    }

    pub fn push_byte(&mut self, value: u8) {
        if self.is_aligned() {
            self.buf.push(value);
        } else {
            for i in (0..8).rev() {
                self.push_bool((value >> i) & 1 != 0);
            }
        }
    }

    #[inline]
    pub fn push(&mut self, code: &PrefixCode) {
        for bit in code.bits() {
            self.push_bool(bit);
        }
    }

    /// Groups the written bits into bytes
    ///
    /// Fails unless the bit count is a multiple of 8.
    pub fn into_aligned_bytes(self) -> Result<Vec<u8>> {
        if !self.is_aligned() {
            return Err(Error::Misaligned {
                bits: self.bit_count(),
            });
        }
        Ok(self.buf)
    }
}

impl Default for BitWriter {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first, stopping after a fixed number of bits
pub struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
    len: usize,
}

impl<'a> BitReader<'a> {
    #[inline]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_len(bytes, bytes.len() * 8)
    }

    /// Reads only the first `len` bits of `bytes`
    #[inline]
    pub fn with_len(bytes: &'a [u8], len: usize) -> Self {
        Self {
            bytes,
            position: 0,
            len: len.min(bytes.len() * 8),
        }
    }
}

impl BitReader<'_> {
    /// Total readable bits
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bits consumed so far
    #[inline]
    pub fn bit_position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.len - self.position
    }

    #[inline]
    pub fn read_bool(&mut self) -> Option<bool> {
        if self.position >= self.len {
            return None;
        }
        let byte = self.bytes[self.position / 8];
        let bit = (byte >> (7 - self.position % 8)) & 1 != 0;
        self.position += 1;
        Some(bit)
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.read_bool()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

/// Pads `writer` to a byte boundary and appends it to `output`, preceded by
/// one byte holding the number of padding bits
pub fn pack_into(mut writer: BitWriter, output: &mut Vec<u8>) -> Result<()> {
    let padding = ((8 - writer.bit_count() % 8) % 8) as u8;
    for _ in 0..padding {
        writer.push_bool(false);
    }
    let packed = writer.into_aligned_bytes()?;
    output.reserve(1 + packed.len());
    output.push(padding);
    output.extend_from_slice(&packed);
    Ok(())
}

/// Splits a packed payload into its code bits, dropping the padding
pub fn unpack(payload: &[u8]) -> Result<BitReader<'_>> {
    let (&padding, bytes) = payload.split_first().ok_or(Error::MissingPadding)?;
    let payload_bits = bytes.len() * 8;
    if padding > 7 || padding as usize > payload_bits {
        return Err(Error::InvalidPadding {
            padding,
            payload_bits,
        });
    }
    Ok(BitReader::with_len(bytes, payload_bits - padding as usize))
}
