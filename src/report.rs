//! Compression statistics
use crate::algorithm::Algorithm;
use crate::error::Result;
use crate::bits::PrefixCode;
use crate::prefix::{HuffmanTreeNode, PrefixTable};
use crate::stats::FrequencyTable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionReport {
    pub algorithm: Algorithm,
    pub original_size: usize,
    pub compressed_size: usize,
    /// Space saved in percent, rounded to two decimals; 0 for empty input
    pub compression_ratio: f64,
    /// Shannon entropy of the input in bits per byte
    pub input_entropy: f64,
    pub prefix_table: Vec<PrefixTableEntry>,
    pub huffman_tree: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefixTableEntry {
    pub symbol: usize,
    pub symbol_char: String,
    pub freq: u64,
    pub freq_rate: f64,
    pub len: u8,
    pub code: String,
}

/// Compresses `input` and describes the result
pub fn analyze(input: &[u8], algorithm: Algorithm) -> Result<(Vec<u8>, CompressionReport)> {
    let compressed = algorithm.compress(input).inspect_err(|err| {
        tracing::warn!(%algorithm, original_size = input.len(), %err, "compression failed");
    })?;

    let freq_table = FrequencyTable::from_bytes(input);
    let (prefix_table, huffman_tree) = match algorithm {
        Algorithm::Huffman => huffman_details(&freq_table),
        Algorithm::Rle => (Vec::new(), String::new()),
    };

    let report = CompressionReport {
        algorithm,
        original_size: input.len(),
        compressed_size: compressed.len(),
        compression_ratio: compression_ratio(input.len(), compressed.len()),
        input_entropy: freq_table.entropy(),
        prefix_table,
        huffman_tree,
    };
    tracing::debug!(
        %algorithm,
        original_size = report.original_size,
        compressed_size = report.compressed_size,
        compression_ratio = report.compression_ratio,
        "compressed payload"
    );

    Ok((compressed, report))
}

fn compression_ratio(original_size: usize, compressed_size: usize) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    let saved = (1.0 - compressed_size as f64 / original_size as f64) * 100.0;
    (saved * 100.0).round() / 100.0
}

fn huffman_details(freq_table: &FrequencyTable) -> (Vec<PrefixTableEntry>, String) {
    let Some(tree) = HuffmanTreeNode::build(freq_table) else {
        return (Vec::new(), String::new());
    };
    let prefix_table = PrefixTable::from_tree(&tree);

    let total = freq_table.total() as f64;
    let entries = freq_table
        .iter()
        .filter_map(|(symbol, freq)| {
            let code = prefix_table.get(symbol)?;
            Some(PrefixTableEntry {
                symbol: symbol as usize,
                symbol_char: display_byte(symbol),
                freq,
                freq_rate: freq as f64 / total,
                len: code.size(),
                code: code.to_string(),
            })
        })
        .collect();

    (entries, describe_tree(&tree))
}

/// Quoted byte with Rust-style escapes, e.g. `"a"`, `"\n"`, `"\x80"`
fn display_byte(symbol: u8) -> String {
    format!("\"{}\"", symbol.escape_ascii())
}

/// One line per node in pre-order, labelled with the code that reaches it
///
/// A lone leaf is labelled `0`, the code it is assigned.
fn describe_tree(tree: &HuffmanTreeNode) -> String {
    let root_code = if tree.is_leaf() {
        PrefixCode::EMPTY.pushed(false)
    } else {
        PrefixCode::EMPTY
    };
    let mut lines = Vec::new();
    let mut stack = vec![(tree, root_code, 0usize)];
    while let Some((node, code, depth)) = stack.pop() {
        let indent = depth * 2;
        let label = if code.is_empty() {
            "*".to_owned()
        } else {
            code.to_string()
        };
        match node.symbol() {
            Some(symbol) => lines.push(format!(
                "{:indent$}{label}: {} {}",
                "",
                node.freq(),
                display_byte(symbol)
            )),
            None => lines.push(format!("{:indent$}{label}: {}", "", node.freq())),
        }
        if let (Some(left), Some(right)) = (node.left(), node.right()) {
            stack.push((right, code.pushed(true), depth + 1));
            stack.push((left, code.pushed(false), depth + 1));
        }
    }
    lines.join("\n")
}
