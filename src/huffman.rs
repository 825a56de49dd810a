//! Static Huffman codec
use crate::bits::{self, BitWriter};
use crate::container::{self, Container};
use crate::error::{Error, Result};
use crate::prefix::PrefixTable;
use crate::stats::FrequencyTable;

/// Huffman codec producing self-describing containers
///
/// The container stores the frequency table rather than the tree; the
/// decoder rebuilds the identical tree from it.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct HuffmanCoder;

impl HuffmanCoder {
    pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let freq_table = FrequencyTable::from_bytes(input);
        let prefix_table = PrefixTable::generate(&freq_table).ok_or(Error::EmptyFrequencyTable)?;

        let mut writer = BitWriter::with_capacity(input.len());
        for &byte in input {
            let code = prefix_table.get(byte).ok_or(Error::UnknownSymbol(byte))?;
            writer.push(&code);
        }

        let mut output = Vec::new();
        container::write_header(&mut output, &freq_table)?;
        bits::pack_into(writer, &mut output)?;
        Ok(output)
    }

    /// Fails without producing output unless the payload holds exactly the
    /// bits the frequency table calls for
    pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let Container {
            freq_table,
            payload,
        } = Container::parse(input)?;
        let mut reader = bits::unpack(payload)?;
        let actual = reader.len() as u64;

        // a single symbol is coded as one `0` bit per occurrence
        if let Some((symbol, count)) = freq_table.single() {
            if actual != count {
                return Err(Error::BitCountMismatch {
                    expected: count,
                    actual,
                });
            }
            return Ok(vec![symbol; reader.len()]);
        }

        let prefix_table =
            PrefixTable::generate(&freq_table).ok_or(Error::EmptyFrequencyTable)?;
        let expected = prefix_table.encoded_bits(&freq_table)?;
        if actual != expected {
            return Err(Error::BitCountMismatch { expected, actual });
        }

        // with the bit total fixed, no symbol exceeding its count means every
        // symbol matches its count exactly
        let decoder = prefix_table.decoder();
        let mut decoded = FrequencyTable::new();
        let mut output = Vec::with_capacity(freq_table.total() as usize);
        while reader.remaining() > 0 {
            let symbol = decoder.decode(&mut reader)?;
            decoded.count_freq(symbol);
            let expected = freq_table.freq(symbol);
            if decoded.freq(symbol) > expected {
                return Err(Error::SymbolCountMismatch { symbol, expected });
            }
            output.push(symbol);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roundtrip(input: &[u8]) -> Vec<u8> {
        let compressed = HuffmanCoder::compress(input).unwrap();
        let decompressed = HuffmanCoder::decompress(&compressed).unwrap();
        assert_eq!(decompressed, input);
        compressed
    }

    fn payload_of(compressed: &[u8]) -> &[u8] {
        Container::parse(compressed).unwrap().payload
    }

    #[test]
    fn empty() {
        assert!(HuffmanCoder::compress(&[]).unwrap().is_empty());
        assert!(HuffmanCoder::decompress(&[]).unwrap().is_empty());
    }

    #[test]
    fn abracadabra() {
        let compressed = roundtrip(b"abracadabra");
        let header = br#"{"97":5,"98":2,"99":1,"100":1,"114":2}"#;
        assert_eq!(&compressed[..4], &(header.len() as u32).to_be_bytes());
        assert_eq!(&compressed[4..4 + header.len()], header);
        // a b r a c a d a b r a
        // 0 110 111 0 100 0 101 0 110 111 0 -> 23 bits, 1 bit of padding
        assert_eq!(
            payload_of(&compressed),
            [1, 0b0110_1110, 0b1000_1010, 0b1101_1100]
        );
    }

    #[test]
    fn single_byte() {
        let compressed = roundtrip(&[0x80]);
        assert_eq!(payload_of(&compressed), [7, 0]);
    }

    #[test]
    fn degenerate_input() {
        let input = vec![0xAB; 1000];
        let compressed = roundtrip(&input);
        let container = Container::parse(&compressed).unwrap();
        assert_eq!(container.freq_table.single(), Some((0xAB, 1000)));
        assert_eq!(container.payload.len(), 1 + 125);
        assert_eq!(container.payload[0], 0);
    }

    #[test]
    fn all_byte_values() {
        let mut input = (0..=255u8).collect::<Vec<_>>();
        input.extend((0..=255u8).rev().step_by(3));
        roundtrip(&input);
    }

    #[test]
    fn non_utf8() {
        roundtrip(&[0xFF, 0xFE, 0x00, 0xC3, 0x28, 0xFF, 0xFF, 0x00]);
    }

    #[test]
    fn deterministic() {
        let input = b"the quick brown fox jumps over the lazy dog";
        assert_eq!(
            HuffmanCoder::compress(input).unwrap(),
            HuffmanCoder::compress(input).unwrap()
        );
    }

    #[test]
    fn padding_matches_code_lengths() {
        let input = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit";
        let compressed = roundtrip(input);
        let freq_table = FrequencyTable::from_bytes(input);
        let prefix_table = PrefixTable::generate(&freq_table).unwrap();
        let payload = payload_of(&compressed);
        let padding = payload[0] as u64;
        assert!(padding <= 7);
        let bits = (payload.len() as u64 - 1) * 8 - padding;
        let expected = freq_table
            .iter()
            .map(|(symbol, freq)| freq * prefix_table.get(symbol).unwrap().size() as u64)
            .sum::<u64>();
        assert_eq!(bits, expected);
    }

    #[test]
    fn reads_spaced_json_headers() {
        // header written with `": "` and `", "` separators
        let header = br#"{"97": 5, "98": 2, "99": 1, "100": 1, "114": 2}"#;
        let mut input = (header.len() as u32).to_be_bytes().to_vec();
        input.extend_from_slice(header);
        input.extend_from_slice(&[1, 0b0110_1110, 0b1000_1010, 0b1101_1100]);
        assert_eq!(HuffmanCoder::decompress(&input).unwrap(), b"abracadabra");
    }

    #[test]
    fn rejects_out_of_range_header_length() {
        let mut compressed = HuffmanCoder::compress(b"hello world").unwrap();
        compressed[..4].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            HuffmanCoder::decompress(&compressed),
            Err(Error::TruncatedHeader { .. })
        ));
        assert!(matches!(
            HuffmanCoder::decompress(&compressed[..3]),
            Err(Error::TruncatedHeader { .. })
        ));
    }

    #[test]
    fn rejects_truncated_payload() {
        let compressed = HuffmanCoder::compress(b"hello world").unwrap();
        assert!(matches!(
            HuffmanCoder::decompress(&compressed[..compressed.len() - 1]),
            Err(Error::BitCountMismatch { .. })
        ));

        let payload_start = compressed.len() - payload_of(&compressed).len();
        assert!(matches!(
            HuffmanCoder::decompress(&compressed[..payload_start]),
            Err(Error::MissingPadding)
        ));
    }

    #[test]
    fn rejects_extended_payload() {
        let mut compressed = HuffmanCoder::compress(b"hello world").unwrap();
        compressed.push(0);
        assert!(matches!(
            HuffmanCoder::decompress(&compressed),
            Err(Error::BitCountMismatch { .. })
        ));
    }

    fn container_with(header: &[u8], payload: &[u8]) -> Vec<u8> {
        let mut input = (header.len() as u32).to_be_bytes().to_vec();
        input.extend_from_slice(header);
        input.extend_from_slice(payload);
        input
    }

    #[test]
    fn rejects_over_represented_symbol() {
        // a=0 b=10 c=11 needs 6 bits; six `a` codes fill them too
        let input = container_with(br#"{"97":2,"98":1,"99":1}"#, &[2, 0b0000_0000]);
        assert!(matches!(
            HuffmanCoder::decompress(&input),
            Err(Error::SymbolCountMismatch {
                symbol: b'a',
                expected: 2
            })
        ));

        // "abac" decodes; "aacb" has the same bits and histogram
        let input = container_with(br#"{"97":2,"98":1,"99":1}"#, &[2, 0b0100_1100]);
        assert_eq!(HuffmanCoder::decompress(&input).unwrap(), b"abac");
        let input = container_with(br#"{"97":2,"98":1,"99":1}"#, &[2, 0b0011_1000]);
        assert_eq!(HuffmanCoder::decompress(&input).unwrap(), b"aacb");
    }

    #[test]
    fn rejects_swapped_symbols() {
        // b=10 twice in place of a and c: same 6 bits, b over its count
        let input = container_with(br#"{"97":2,"98":1,"99":1}"#, &[2, 0b0101_0000]);
        assert!(matches!(
            HuffmanCoder::decompress(&input),
            Err(Error::SymbolCountMismatch {
                symbol: b'b',
                expected: 1
            })
        ));
    }

    #[test]
    fn rejects_impossible_counts() {
        // a huge count must not allocate, whichever path decodes it
        for header in [
            &br#"{"120":18446744073709551615}"#[..],
            &br#"{"120":9223372036854775807,"121":1}"#[..],
        ] {
            let mut input = (header.len() as u32).to_be_bytes().to_vec();
            input.extend_from_slice(header);
            input.extend_from_slice(&[0, 0]);
            let err = HuffmanCoder::decompress(&input).unwrap_err();
            assert!(
                matches!(err, Error::BitCountMismatch { .. }),
                "unexpected {err:?}"
            );
        }

        let header = br#"{"120":18446744073709551615,"121":1}"#;
        let mut input = (header.len() as u32).to_be_bytes().to_vec();
        input.extend_from_slice(header);
        input.extend_from_slice(&[0, 0]);
        assert!(matches!(
            HuffmanCoder::decompress(&input),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn rejects_invalid_header() {
        let mut input = 3u32.to_be_bytes().to_vec();
        input.extend_from_slice(b"abc\x00");
        assert!(matches!(
            HuffmanCoder::decompress(&input),
            Err(Error::InvalidHeader(_))
        ));
    }

    proptest! {
        #[test]
        fn proptest_roundtrip(data: Vec<u8>) {
            let compressed = HuffmanCoder::compress(&data).unwrap();
            prop_assert_eq!(HuffmanCoder::decompress(&compressed).unwrap(), data);
        }

        #[test]
        fn proptest_deterministic(data: Vec<u8>) {
            prop_assert_eq!(
                HuffmanCoder::compress(&data).unwrap(),
                HuffmanCoder::compress(&data).unwrap()
            );
        }

        #[test]
        fn proptest_prefix_free(data in proptest::collection::vec(any::<u8>(), 2..512)) {
            let freq_table = FrequencyTable::from_bytes(&data);
            prop_assume!(freq_table.symbol_count() >= 2);
            let codes = PrefixTable::generate(&freq_table)
                .unwrap()
                .iter()
                .map(|v| v.1)
                .collect::<Vec<_>>();
            for (i, a) in codes.iter().enumerate() {
                for (j, b) in codes.iter().enumerate() {
                    if i != j {
                        prop_assert!(!a.is_prefix_of(b), "{} prefixes {}", a, b);
                    }
                }
            }
        }

        #[test]
        fn proptest_degenerate(byte in any::<u8>(), len in 1usize..4096) {
            let data = vec![byte; len];
            let compressed = HuffmanCoder::compress(&data).unwrap();
            let container = Container::parse(&compressed).unwrap();
            prop_assert_eq!(container.freq_table.single(), Some((byte, len as u64)));
            prop_assert_eq!(HuffmanCoder::decompress(&compressed).unwrap(), data);
        }
    }
}
