//! Algorithm selection
use crate::error::{Error, Result};
use crate::huffman::HuffmanCoder;
use crate::rle::RunLengthCoder;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// A lossless byte codec
///
/// Both operations are pure: one input buffer in, one output buffer out.
pub trait Codec {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;
}

impl Codec for HuffmanCoder {
    #[inline]
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        HuffmanCoder::compress(input)
    }

    #[inline]
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        HuffmanCoder::decompress(input)
    }
}

impl Codec for RunLengthCoder {
    #[inline]
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        RunLengthCoder::compress(input)
    }

    #[inline]
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        RunLengthCoder::decompress(input)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Rle,
    Huffman,
}

impl Algorithm {
    pub const ALL: [Self; 2] = [Self::Rle, Self::Huffman];

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rle => "rle",
            Self::Huffman => "huffman",
        }
    }

    #[inline]
    pub fn codec(&self) -> &'static dyn Codec {
        match self {
            Self::Rle => &RunLengthCoder,
            Self::Huffman => &HuffmanCoder,
        }
    }

    #[inline]
    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.codec().compress(input)
    }

    #[inline]
    pub fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.codec().decompress(input)
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_owned()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
