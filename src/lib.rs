//! Lossless byte codecs: static Huffman coding and run-length encoding
//!
//! ```
//! let input = b"abracadabra";
//! let compressed = minipress::compress(input, "huffman").unwrap();
//! assert_eq!(minipress::decompress(&compressed, "huffman").unwrap(), input);
//! ```

extern crate alloc;

use wasm_bindgen::prelude::*;

pub mod algorithm;
pub mod bits;
pub mod container;
pub mod error;
pub mod huffman;
pub mod prefix;
pub mod report;
pub mod rle;
pub mod stats;

pub use algorithm::{Algorithm, Codec};
pub use error::{Error, Result, Stage};
pub use huffman::HuffmanCoder;
pub use report::{CompressionReport, PrefixTableEntry};
pub use rle::RunLengthCoder;

/// Compresses `input` with the algorithm named by `algorithm` (`"rle"` or `"huffman"`)
pub fn compress(input: &[u8], algorithm: &str) -> Result<Vec<u8>> {
    algorithm.parse::<Algorithm>()?.compress(input)
}

/// Restores data produced by [`compress`] with the same algorithm
pub fn decompress(input: &[u8], algorithm: &str) -> Result<Vec<u8>> {
    algorithm.parse::<Algorithm>()?.decompress(input)
}

/// Compresses `input` and returns the compressed bytes with their statistics
pub fn analyze(input: &[u8], algorithm: &str) -> Result<(Vec<u8>, CompressionReport)> {
    report::analyze(input, algorithm.parse()?)
}

/// [`compress`] for JS callers; errors become their display message
#[wasm_bindgen(js_name = compress)]
pub fn compress_js(input: &[u8], algorithm: &str) -> core::result::Result<Vec<u8>, String> {
    compress(input, algorithm).map_err(|e| format!("{}", e))
}

/// [`decompress`] for JS callers; errors become their display message
#[wasm_bindgen(js_name = decompress)]
pub fn decompress_js(input: &[u8], algorithm: &str) -> core::result::Result<Vec<u8>, String> {
    decompress(input, algorithm).map_err(|e| format!("{}", e))
}

/// Returns the [`CompressionReport`] of `input` as JSON
#[wasm_bindgen(js_name = analyze)]
pub fn analyze_js(input: &[u8], algorithm: &str) -> core::result::Result<String, String> {
    let (_, report) = analyze(input, algorithm).map_err(|e| format!("{}", e))?;
    serde_json::to_string(&report).map_err(|e| format!("{}", e))
}
