//! The `.fabin` container: a frequency table followed by Huffman-coded records.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! u16 n
//! n x { u8 symbol; u64 frequency }
//! u32 record_count
//! record_count x {
//!     u16 name_len; name_len bytes of name
//!     u64 symbol_count
//!     u16 line_width
//!     ceil(encoded_bits / 8) bytes of codes, MSB-first, zero-padded
//! }
//! ```
//!
//! Frequency entries are written in first-seen order across the corpus; the
//! decoder rebuilds the tree from them in the order read.

use crate::bits::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::record::SequenceRecord;
use crate::store::SequenceStore;
use crate::tree::HuffmanTree;
use std::path::Path;

/// Statistics about one encode call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerStats {
    /// Number of records written
    pub records: usize,
    /// Total symbols across all records
    pub symbols: u64,
    /// Distinct symbols in the frequency table
    pub distinct_symbols: usize,
    /// Size of the container in bytes
    pub encoded_bytes: usize,
}

impl ContainerStats {
    /// Container size relative to one byte per symbol, as a percentage.
    pub fn compression_ratio(&self) -> f64 {
        if self.symbols == 0 {
            0.0
        } else {
            (self.encoded_bytes as f64 / self.symbols as f64) * 100.0
        }
    }
}

/// Encodes and decodes record collections to and from the container format.
#[derive(Debug, Clone, Default)]
pub struct ContainerCodec {
    config: Configuration,
}

impl ContainerCodec {
    /// Creates a codec, rejecting an invalid configuration up front.
    pub fn new(config: Configuration) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Encodes `records` into container bytes.
    pub fn encode(&self, records: &[SequenceRecord]) -> Result<Vec<u8>> {
        self.encode_with_stats(records).map(|(bytes, _)| bytes)
    }

    /// Encodes `records` and reports what was written.
    ///
    /// Fails with a validation error when the records hold no symbols at all,
    /// or when a field does not fit its container integer width.
    pub fn encode_with_stats(
        &self,
        records: &[SequenceRecord],
    ) -> Result<(Vec<u8>, ContainerStats)> {
        let record_count = u32::try_from(records.len())
            .map_err(|_| Error::validation("too many records for a container"))?;

        let mut frequencies = FrequencyTable::new();
        for record in records {
            frequencies.count(record.symbols());
        }
        if frequencies.is_empty() {
            return Err(Error::validation("no symbols to encode"));
        }

        let tree = HuffmanTree::build(&frequencies)?;
        let codes = CodeTable::from_tree(&tree);

        let mut out = Vec::new();
        // At most 256 distinct byte values, always fits
        out.extend_from_slice(&(frequencies.len() as u16).to_le_bytes());
        for entry in frequencies.entries() {
            out.push(entry.symbol);
            out.extend_from_slice(&entry.count.to_le_bytes());
        }

        out.extend_from_slice(&record_count.to_le_bytes());
        for record in records {
            write_record(&mut out, record, &codes)?;
        }

        let stats = ContainerStats {
            records: records.len(),
            symbols: frequencies.total(),
            distinct_symbols: frequencies.len(),
            encoded_bytes: out.len(),
        };
        tracing::debug!(
            records = stats.records,
            symbols = stats.symbols,
            distinct = stats.distinct_symbols,
            bytes = stats.encoded_bytes,
            "encoded container"
        );

        Ok((out, stats))
    }

    /// Decodes container bytes into records.
    ///
    /// Any truncated field or inconsistency aborts the whole decode. Record
    /// names are held as `String`, so a name that is not valid UTF-8 is a
    /// format error.
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<SequenceRecord>> {
        let mut cursor = ByteCursor::new(bytes);

        let frequencies = read_frequency_table(&mut cursor)?;
        let total = frequencies
            .entries()
            .iter()
            .try_fold(0u64, |acc, e| acc.checked_add(e.count))
            .ok_or_else(|| Error::format("symbol frequencies overflow a 64-bit total"))?;
        let tree = HuffmanTree::build(&frequencies)?;

        let record_count = cursor.read_u32("record count")?;
        let mut records = Vec::with_capacity((record_count as usize).min(cursor.remaining()));
        let mut decoded_symbols = 0u64;

        for index in 0..record_count {
            let record = read_record(&mut cursor, &tree, total - decoded_symbols)
                .map_err(|e| match e {
                    Error::Format(msg) => Error::format(format!("record {}: {}", index, msg)),
                    other => other,
                })?;
            decoded_symbols += record.len() as u64;
            records.push(record);
        }

        if self.config.reject_trailing_bytes && cursor.remaining() > 0 {
            return Err(Error::format(format!(
                "{} unexpected bytes after the last record",
                cursor.remaining()
            )));
        }

        if self.config.verify_frequencies {
            verify_frequencies(&frequencies, &records)?;
        }

        tracing::debug!(
            records = records.len(),
            symbols = decoded_symbols,
            distinct = frequencies.len(),
            bytes = bytes.len(),
            "decoded container"
        );

        Ok(records)
    }

    /// Encodes every record currently in `store`.
    pub fn encode_store<S: SequenceStore + ?Sized>(&self, store: &S) -> Result<Vec<u8>> {
        self.encode(store.list())
    }

    /// Decodes `bytes` and, only if that succeeds, replaces the store's contents.
    ///
    /// Returns the number of records loaded.
    pub fn decode_into<S: SequenceStore + ?Sized>(
        &self,
        store: &mut S,
        bytes: &[u8],
    ) -> Result<usize> {
        let records = self.decode(bytes)?;
        let count = records.len();
        store.replace_all(records);
        Ok(count)
    }

    /// Encodes the store and writes the container to `path`.
    pub fn save_to_path<S: SequenceStore + ?Sized>(
        &self,
        store: &S,
        path: impl AsRef<Path>,
    ) -> Result<ContainerStats> {
        let (bytes, stats) = self.encode_with_stats(store.list())?;
        std::fs::write(path.as_ref(), &bytes)?;
        tracing::info!(path = %path.as_ref().display(), records = stats.records, "saved container");
        Ok(stats)
    }

    /// Reads a container from `path` into the store.
    ///
    /// The store is left untouched if reading or decoding fails.
    pub fn load_from_path<S: SequenceStore + ?Sized>(
        &self,
        store: &mut S,
        path: impl AsRef<Path>,
    ) -> Result<usize> {
        let bytes = std::fs::read(path.as_ref())?;
        let count = self.decode_into(store, &bytes)?;
        tracing::info!(path = %path.as_ref().display(), records = count, "loaded container");
        Ok(count)
    }
}

/// Encodes with the default configuration.
pub fn encode(records: &[SequenceRecord]) -> Result<Vec<u8>> {
    ContainerCodec::default().encode(records)
}

/// Decodes with the default configuration.
pub fn decode(bytes: &[u8]) -> Result<Vec<SequenceRecord>> {
    ContainerCodec::default().decode(bytes)
}

fn write_record(out: &mut Vec<u8>, record: &SequenceRecord, codes: &CodeTable) -> Result<()> {
    let name = record.name().as_bytes();
    let name_len = u16::try_from(name.len()).map_err(|_| {
        Error::validation(format!("record name is longer than {} bytes", u16::MAX))
    })?;
    let line_width = u16::try_from(record.line_width()).map_err(|_| {
        Error::validation(format!(
            "line width {} of record {} exceeds {}",
            record.line_width(),
            record.name(),
            u16::MAX
        ))
    })?;

    out.extend_from_slice(&name_len.to_le_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(&(record.len() as u64).to_le_bytes());
    out.extend_from_slice(&line_width.to_le_bytes());

    let bits = codes
        .encoded_bits(record.symbols())
        .ok_or_else(|| Error::validation("record contains a symbol missing from the code table"))?;
    let mut writer = BitWriter::with_capacity_bits(bits);
    for &symbol in record.symbols() {
        // Every symbol was counted, so every symbol has a code
        if let Some(code) = codes.code(symbol) {
            writer.extend_from_slice(code);
        }
    }
    out.extend_from_slice(&writer.finish());
    Ok(())
}

fn read_frequency_table(cursor: &mut ByteCursor<'_>) -> Result<FrequencyTable> {
    let n = cursor.read_u16("alphabet size")?;
    if n == 0 {
        return Err(Error::format("container declares an empty alphabet"));
    }

    let mut table = FrequencyTable::new();
    for _ in 0..n {
        let symbol = cursor.read_u8("frequency symbol")?;
        let count = cursor.read_u64("frequency count")?;
        if table.contains(symbol) {
            return Err(Error::format(format!(
                "symbol {:#04x} appears twice in the frequency table",
                symbol
            )));
        }
        if count == 0 {
            return Err(Error::format(format!("symbol {:#04x} has zero frequency", symbol)));
        }
        table.add(symbol, count);
    }
    Ok(table)
}

fn read_record(
    cursor: &mut ByteCursor<'_>,
    tree: &HuffmanTree,
    symbols_left: u64,
) -> Result<SequenceRecord> {
    let name_len = cursor.read_u16("name length")?;
    let name = cursor.read_bytes(name_len as usize, "name")?;
    let name = String::from_utf8(name.to_vec())
        .map_err(|_| Error::format("record name is not valid UTF-8"))?;

    let symbol_count = cursor.read_u64("symbol count")?;
    if symbol_count > symbols_left {
        return Err(Error::format(format!(
            "declares {} symbols but the frequency table leaves only {}",
            symbol_count, symbols_left
        )));
    }
    let line_width = cursor.read_u16("line width")?;
    if line_width == 0 {
        return Err(Error::format("line width is zero"));
    }

    let stream = cursor.rest();
    let mut reader = BitReader::new(stream);
    // Every symbol costs at least one bit
    let capacity = (symbol_count as usize).min(stream.len().saturating_mul(8));
    let mut symbols = Vec::with_capacity(capacity);

    for _ in 0..symbol_count {
        let mut node = tree.root;
        let symbol = loop {
            let bit = reader.read_bit()?;
            node = tree
                .step(node, bit)
                .ok_or_else(|| Error::format("code stream follows a branch the tree does not have"))?;
            if let Some(symbol) = tree.leaf_symbol(node) {
                break symbol;
            }
        };
        symbols.push(symbol);
    }
    cursor.advance(reader.bytes_consumed());

    tracing::trace!(name = %name, symbols = symbols.len(), "decoded record");

    SequenceRecord::new(name, symbols, line_width as usize)
}

fn verify_frequencies(expected: &FrequencyTable, records: &[SequenceRecord]) -> Result<()> {
    let mut actual = FrequencyTable::new();
    for record in records {
        actual.count(record.symbols());
    }
    for entry in expected.entries() {
        let seen = actual.get(entry.symbol);
        if seen != entry.count {
            return Err(Error::format(format!(
                "symbol {:#04x}: frequency table says {}, records hold {}",
                entry.symbol, entry.count, seen
            )));
        }
    }
    Ok(())
}

/// Little-endian reader over a byte slice that reports truncation as a format error.
struct ByteCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }

    fn advance(&mut self, n: usize) {
        self.position = (self.position + n).min(self.bytes.len());
    }

    fn read_bytes(&mut self, n: usize, field: &str) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::format(format!(
                "truncated {}: needed {} bytes, {} left",
                field,
                n,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self, field: &str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N, field)?);
        Ok(buf)
    }

    fn read_u8(&mut self, field: &str) -> Result<u8> {
        Ok(self.read_array::<1>(field)?[0])
    }

    fn read_u16(&mut self, field: &str) -> Result<u16> {
        self.read_array(field).map(u16::from_le_bytes)
    }

    fn read_u32(&mut self, field: &str) -> Result<u32> {
        self.read_array(field).map(u32::from_le_bytes)
    }

    fn read_u64(&mut self, field: &str) -> Result<u64> {
        self.read_array(field).map(u64::from_le_bytes)
    }
}
