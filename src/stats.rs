//! Byte frequency statistics
use core::fmt;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Occurrence count of every byte value in a buffer
///
/// Serializes as a JSON object keyed by the decimal byte value, e.g.
/// `{"97":5,"98":2}`, in ascending byte order. Only bytes that occur are
/// written. Deserializing rejects keys outside `0..=255`, duplicate keys,
/// zero counts and totals that do not fit in a `u64`.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    freqs: [u64; 256],
}

impl FrequencyTable {
    #[inline]
    pub const fn new() -> Self {
        Self { freqs: [0; 256] }
    }

    pub fn from_bytes(input: &[u8]) -> Self {
        let mut result = Self::new();
        for &byte in input {
            result.count_freq(byte);
        }
        result
    }

    #[inline]
    pub fn count_freq(&mut self, byte: u8) {
        self.freqs[byte as usize] += 1;
    }

    #[inline]
    pub fn freq(&self, byte: u8) -> u64 {
        self.freqs[byte as usize]
    }

    /// Occurring bytes and their counts, in ascending byte order
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u8, u64)> + '_ {
        self.freqs
            .iter()
            .enumerate()
            .filter(|(_, freq)| **freq > 0)
            .map(|(index, &freq)| (index as u8, freq))
    }

    #[inline]
    pub fn symbol_count(&self) -> usize {
        self.freqs.iter().filter(|v| **v > 0).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.freqs.iter().all(|v| *v == 0)
    }

    /// The only occurring byte and its count, if exactly one byte occurs
    pub fn single(&self) -> Option<(u8, u64)> {
        let mut iter = self.iter();
        let first = iter.next()?;
        iter.next().is_none().then_some(first)
    }

    /// Sum of all counts; equals the length of the counted input
    #[inline]
    pub fn total(&self) -> u64 {
        self.freqs.iter().sum()
    }

    /// Shannon entropy in bits per symbol
    pub fn entropy(&self) -> f64 {
        let total_size = self.total() as f64;
        let mut entropy = 0.0;
        for (_, count) in self.iter() {
            let p = count as f64 / total_size;
            entropy -= p * p.log2();
        }
        entropy
    }
}

impl Default for FrequencyTable {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.symbol_count()))?;
        for (byte, count) in self.iter() {
            map.serialize_entry(&byte.to_string(), &count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FrequencyTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FrequencyTableVisitor)
    }
}

struct FrequencyTableVisitor;

impl<'de> Visitor<'de> for FrequencyTableVisitor {
    type Value = FrequencyTable;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map from decimal byte values to occurrence counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut result = FrequencyTable::new();
        let mut total = 0u64;
        while let Some((key, count)) = access.next_entry::<String, u64>()? {
            let byte = parse_byte(&key)
                .ok_or_else(|| de::Error::custom(format_args!("invalid byte value {key:?}")))?;
            if count == 0 {
                return Err(de::Error::custom(format_args!("zero count for byte {byte}")));
            }
            if result.freq(byte) > 0 {
                return Err(de::Error::custom(format_args!("duplicate byte {byte}")));
            }
            total = total
                .checked_add(count)
                .ok_or_else(|| de::Error::custom("total count overflows"))?;
            result.freqs[byte as usize] = count;
        }
        Ok(result)
    }
}

fn parse_byte(key: &str) -> Option<u8> {
    if key.is_empty() || !key.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}
