//! Codec errors
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Part of the pipeline an error originated from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Algorithm selection, before any codec runs
    Dispatch,
    /// Huffman container header (length field and frequency table)
    Header,
    /// Packed payload or RLE records
    Payload,
    /// Byte grouping of a bit sequence
    Framing,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported algorithm {0:?}")]
    UnknownAlgorithm(String),

    #[error("header length {declared} exceeds the {available} bytes available")]
    TruncatedHeader { declared: usize, available: usize },

    #[error("invalid frequency table: {0}")]
    InvalidHeader(#[from] serde_json::Error),

    #[error("frequency table is empty")]
    EmptyFrequencyTable,

    #[error("frequency counts overflow")]
    FrequencyOverflow,

    #[error("payload is missing its padding byte")]
    MissingPadding,

    #[error("padding of {padding} bits is invalid for a {payload_bits}-bit payload")]
    InvalidPadding { padding: u8, payload_bits: usize },

    #[error("payload holds {actual} bits but the frequency table requires {expected}")]
    BitCountMismatch { expected: u64, actual: u64 },

    #[error("symbol {0:#04x} has no prefix code")]
    UnknownSymbol(u8),

    #[error("symbol {symbol:#04x} decoded more than the {expected} times the frequency table allows")]
    SymbolCountMismatch { symbol: u8, expected: u64 },

    #[error("no prefix code matches at bit {position}")]
    InvalidCode { position: usize },

    #[error("{bits} bits cannot be grouped into bytes")]
    Misaligned { bits: usize },

    #[error("run-length data has odd length {len}")]
    OddLength { len: usize },

    #[error("zero-length run at offset {offset}")]
    ZeroRun { offset: usize },
}

impl Error {
    pub fn stage(&self) -> Stage {
        match self {
            Self::UnknownAlgorithm(_) => Stage::Dispatch,
            Self::TruncatedHeader { .. }
            | Self::InvalidHeader(_)
            | Self::EmptyFrequencyTable
            | Self::FrequencyOverflow => Stage::Header,
            Self::MissingPadding
            | Self::InvalidPadding { .. }
            | Self::BitCountMismatch { .. }
            | Self::UnknownSymbol(_)
            | Self::SymbolCountMismatch { .. }
            | Self::InvalidCode { .. }
            | Self::OddLength { .. }
            | Self::ZeroRun { .. } => Stage::Payload,
            Self::Misaligned { .. } => Stage::Framing,
        }
    }
}
