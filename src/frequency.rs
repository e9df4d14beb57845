/// Occurrence count of one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub symbol: u8,
    pub count: u64,
}

/// Symbol counts over a corpus, kept in first-seen order.
///
/// The order is part of the container format: the tree builder breaks weight
/// ties by entry position, so a table read back from disk must list entries in
/// the order they were written.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>,
    /// Position of each symbol in `entries`
    slots: [Option<u16>; 256],
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: [None; 256],
        }
    }

    /// Builds a table from a single symbol string.
    pub fn from_symbols(symbols: &[u8]) -> Self {
        let mut table = Self::new();
        table.count(symbols);
        table
    }

    /// Adds one occurrence of every symbol in `symbols`.
    pub fn count(&mut self, symbols: &[u8]) {
        for &symbol in symbols {
            self.add(symbol, 1);
        }
    }

    /// Adds `count` occurrences of `symbol`, appending a new entry on first sight.
    pub fn add(&mut self, symbol: u8, count: u64) {
        match self.slots[symbol as usize] {
            Some(slot) => self.entries[slot as usize].count += count,
            None => {
                self.slots[symbol as usize] = Some(self.entries.len() as u16);
                self.entries.push(FrequencyEntry { symbol, count });
            }
        }
    }

    /// Returns the count for `symbol`, or 0 if it was never seen.
    pub fn get(&self, symbol: u8) -> u64 {
        self.slots[symbol as usize]
            .map(|slot| self.entries[slot as usize].count)
            .unwrap_or(0)
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.slots[symbol as usize].is_some()
    }

    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for FrequencyTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for FrequencyTable {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let table = FrequencyTable::from_symbols(b"GATTACA");
        let symbols: Vec<u8> = table.entries().iter().map(|e| e.symbol).collect();
        assert_eq!(symbols, b"GATC".to_vec());
        assert_eq!(table.get(b'A'), 3);
        assert_eq!(table.get(b'T'), 2);
        assert_eq!(table.get(b'G'), 1);
        assert_eq!(table.get(b'C'), 1);
        assert_eq!(table.get(b'N'), 0);
        assert_eq!(table.total(), 7);
    }

    #[test]
    fn test_aggregates_across_calls() {
        let mut table = FrequencyTable::new();
        table.count(b"AAB");
        table.count(b"BC");
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(b'A'), 2);
        assert_eq!(table.get(b'B'), 2);
        assert_eq!(table.get(b'C'), 1);
    }

    #[test]
    fn test_empty() {
        let table = FrequencyTable::from_symbols(b"");
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert!(!table.contains(b'A'));
    }

    #[test]
    fn test_all_byte_values() {
        let all: Vec<u8> = (0..=255).collect();
        let table = FrequencyTable::from_symbols(&all);
        assert_eq!(table.len(), 256);
        assert!(table.entries().iter().all(|e| e.count == 1));
    }
}
