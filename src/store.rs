use crate::record::SequenceRecord;
use ahash::AHashMap as HashMap;

/// The collection of loaded records that codec and query operations read from
/// and decode into.
///
/// Implementations are passed explicitly to every operation; nothing in the
/// crate holds a store of its own.
pub trait SequenceStore {
    /// Returns every record in load order.
    fn list(&self) -> &[SequenceRecord];

    /// Returns the first record with the given name.
    fn find(&self, name: &str) -> Option<&SequenceRecord>;

    /// Replaces the whole contents of the store.
    fn replace_all(&mut self, records: Vec<SequenceRecord>);
}

/// In-memory store backed by an ordered vector and a name index.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: Vec<SequenceRecord>,

    /// Maps each name to the position of its first occurrence
    by_name: HashMap<String, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<SequenceRecord>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn rebuild_index(&mut self) {
        self.by_name.clear();
        for (idx, record) in self.records.iter().enumerate() {
            self.by_name.entry(record.name().to_owned()).or_insert(idx);
        }
    }
}

impl SequenceStore for MemoryStore {
    fn list(&self) -> &[SequenceRecord] {
        &self.records
    }

    fn find(&self, name: &str) -> Option<&SequenceRecord> {
        self.by_name.get(name).map(|&idx| &self.records[idx])
    }

    fn replace_all(&mut self, records: Vec<SequenceRecord>) {
        self.records = records;
        self.rebuild_index();
    }
}
