//! Huffman prefix coder
use crate::bits::{BitReader, PrefixCode};
use crate::error::{Error, Result};
use crate::stats::FrequencyTable;
use alloc::collections::{BTreeMap, BinaryHeap};
use core::cmp;

/// A node of a Huffman tree
///
/// Each node exclusively owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanTreeNode {
    Leaf {
        symbol: u8,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<HuffmanTreeNode>,
        right: Box<HuffmanTreeNode>,
    },
}

impl HuffmanTreeNode {
    #[inline]
    pub fn make_leaf(symbol: u8, freq: u64) -> Self {
        Self::Leaf { symbol, freq }
    }

    #[inline]
    pub fn make_pair(left: Self, right: Self) -> Self {
        Self::Internal {
            freq: left.freq() + right.freq(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Builds a tree by repeatedly merging the two least frequent nodes
    ///
    /// Leaves are queued in ascending byte order. Nodes of equal frequency
    /// leave the queue in the order they entered it; the first one popped
    /// becomes the left child. Returns `None` for an empty table.
    pub fn build(freq_table: &FrequencyTable) -> Option<Self> {
        let mut seq = 0;
        let mut queue = BinaryHeap::new();
        for (symbol, freq) in freq_table.iter() {
            queue.push(QueueEntry::new(seq, Self::make_leaf(symbol, freq)));
            seq += 1;
        }
        while queue.len() > 1 {
            let left = queue.pop()?.node;
            let right = queue.pop()?.node;
            queue.push(QueueEntry::new(seq, Self::make_pair(left, right)));
            seq += 1;
        }
        queue.pop().map(|v| v.node)
    }

    #[inline]
    pub fn freq(&self) -> u64 {
        match self {
            Self::Leaf { freq, .. } | Self::Internal { freq, .. } => *freq,
        }
    }

    #[inline]
    pub fn symbol(&self) -> Option<u8> {
        match self {
            Self::Leaf { symbol, .. } => Some(*symbol),
            Self::Internal { .. } => None,
        }
    }

    #[inline]
    pub fn left(&self) -> Option<&Self> {
        match self {
            Self::Leaf { .. } => None,
            Self::Internal { left, .. } => Some(left),
        }
    }

    #[inline]
    pub fn right(&self) -> Option<&Self> {
        match self {
            Self::Leaf { .. } => None,
            Self::Internal { right, .. } => Some(right),
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    fn assign_codes(&self, table: &mut PrefixTable, code: PrefixCode) {
        match self {
            Self::Leaf { symbol, .. } => table.codes[*symbol as usize] = Some(code),
            Self::Internal { left, right, .. } => {
                left.assign_codes(table, code.pushed(false));
                right.assign_codes(table, code.pushed(true));
            }
        }
    }
}

/// Min-queue entry ordered by frequency, then by insertion sequence
struct QueueEntry {
    freq: u64,
    seq: usize,
    node: HuffmanTreeNode,
}

impl QueueEntry {
    #[inline]
    fn new(seq: usize, node: HuffmanTreeNode) -> Self {
        Self {
            freq: node.freq(),
            seq,
            node,
        }
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.seq == other.seq
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // reversed: BinaryHeap is a max-heap
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        (other.freq, other.seq).cmp(&(self.freq, self.seq))
    }
}

/// Prefix code of every symbol in a Huffman tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixTable {
    codes: [Option<PrefixCode>; 256],
}

impl PrefixTable {
    /// A tree that is a single leaf gets the one-bit code `0`
    pub fn from_tree(root: &HuffmanTreeNode) -> Self {
        let mut table = Self { codes: [None; 256] };
        match root.symbol() {
            Some(symbol) => {
                table.codes[symbol as usize] = Some(PrefixCode::EMPTY.pushed(false));
            }
            None => root.assign_codes(&mut table, PrefixCode::EMPTY),
        }
        table
    }

    pub fn generate(freq_table: &FrequencyTable) -> Option<Self> {
        HuffmanTreeNode::build(freq_table).map(|tree| Self::from_tree(&tree))
    }

    #[inline]
    pub fn get(&self, symbol: u8) -> Option<PrefixCode> {
        self.codes[symbol as usize]
    }

    /// Symbols and their codes, in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u8, PrefixCode)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(index, code)| code.map(|code| (index as u8, code)))
    }

    /// Number of bits needed to encode every occurrence counted in `freq_table`
    pub fn encoded_bits(&self, freq_table: &FrequencyTable) -> Result<u64> {
        freq_table.iter().try_fold(0u64, |acc, (symbol, freq)| -> Result<u64> {
            let size = self.get(symbol).ok_or(Error::UnknownSymbol(symbol))?.size();
            freq.checked_mul(size as u64)
                .and_then(|bits| acc.checked_add(bits))
                .ok_or(Error::FrequencyOverflow)
        })
    }

    pub fn decoder(&self) -> PrefixDecoder {
        PrefixDecoder::new(self)
    }
}

/// Decodes symbols by matching a growing bit prefix against the code table
pub struct PrefixDecoder {
    prefix_map: BTreeMap<PrefixCode, u8>,
    max_size: u8,
    min_size: u8,
}

impl PrefixDecoder {
    pub fn new(table: &PrefixTable) -> Self {
        let prefix_map = table
            .iter()
            .map(|(symbol, code)| (code, symbol))
            .collect::<BTreeMap<_, _>>();
        let max_size = prefix_map.keys().fold(0, |a, v| a.max(v.size()));
        let min_size = prefix_map.keys().fold(u8::MAX, |a, v| a.min(v.size()));
        Self {
            prefix_map,
            max_size,
            min_size,
        }
    }

    pub fn decode(&self, reader: &mut BitReader) -> Result<u8> {
        let position = reader.bit_position();
        let mut code = PrefixCode::EMPTY;
        while code.size() < self.max_size {
            let bit = reader.read_bool().ok_or(Error::InvalidCode { position })?;
            code = code.pushed(bit);
            if code.size() >= self.min_size {
                if let Some(&symbol) = self.prefix_map.get(&code) {
                    return Ok(symbol);
                }
            }
        }
        Err(Error::InvalidCode { position })
    }
}
