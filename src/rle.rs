//! Run-length codec
//!
//! A compressed buffer is a flat sequence of `(count, value)` byte pairs with
//! `count` in `1..=255`. Longer runs are split into several pairs.
use crate::error::{Error, Result};

/// Longest run a single pair can describe
pub const MAX_RUN: usize = u8::MAX as usize;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RunLengthCoder;

impl RunLengthCoder {
    pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        for run in input.chunk_by(|a, b| a == b) {
            for chunk in run.chunks(MAX_RUN) {
                output.push(chunk.len() as u8);
                output.push(chunk[0]);
            }
        }
        Ok(output)
    }

    pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
        if input.len() % 2 != 0 {
            return Err(Error::OddLength { len: input.len() });
        }
        let mut output = Vec::new();
        for (index, pair) in input.chunks_exact(2).enumerate() {
            let (count, value) = (pair[0] as usize, pair[1]);
            if count == 0 {
                return Err(Error::ZeroRun { offset: index * 2 });
            }
            output.resize(output.len() + count, value);
        }
        Ok(output)
    }
}
