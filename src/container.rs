//! Huffman container framing
//!
//! ```text
//! +----------------+----------------------+-------------+-------------+
//! | N: u32 BE      | N bytes: JSON table  | padding: u8 | packed bits |
//! +----------------+----------------------+-------------+-------------+
//! ```
use crate::error::{Error, Result};
use crate::stats::FrequencyTable;

/// Size of the header length field
pub const HEADER_LEN_SIZE: usize = 4;

/// A parsed container: the frequency table and the still-packed payload
#[derive(Debug)]
pub struct Container<'a> {
    pub freq_table: FrequencyTable,
    pub payload: &'a [u8],
}

impl<'a> Container<'a> {
    pub fn parse(input: &'a [u8]) -> Result<Self> {
        let (len_field, rest) =
            input
                .split_first_chunk::<HEADER_LEN_SIZE>()
                .ok_or(Error::TruncatedHeader {
                    declared: HEADER_LEN_SIZE,
                    available: input.len(),
                })?;
        let header_len = u32::from_be_bytes(*len_field) as usize;
        if header_len > rest.len() {
            return Err(Error::TruncatedHeader {
                declared: header_len,
                available: rest.len(),
            });
        }
        let (header, payload) = rest.split_at(header_len);

        let freq_table: FrequencyTable = serde_json::from_slice(header)?;
        if freq_table.is_empty() {
            return Err(Error::EmptyFrequencyTable);
        }

        Ok(Self {
            freq_table,
            payload,
        })
    }
}

/// Writes the length field and JSON frequency table to `output`
pub fn write_header(output: &mut Vec<u8>, freq_table: &FrequencyTable) -> Result<()> {
    let header = serde_json::to_vec(freq_table)?;
    // at most 256 entries, far below u32::MAX
    let header_len = header.len() as u32;
    output.reserve(HEADER_LEN_SIZE + header.len());
    output.extend_from_slice(&header_len.to_be_bytes());
    output.extend_from_slice(&header);
    Ok(())
}
