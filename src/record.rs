use crate::error::{Error, Result};

/// A named symbol string together with the line width it was laid out at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    name: String,
    symbols: Vec<u8>,
    line_width: usize,
}

impl SequenceRecord {
    /// Creates a record, rejecting a zero line width.
    pub fn new(
        name: impl Into<String>,
        symbols: impl Into<Vec<u8>>,
        line_width: usize,
    ) -> Result<Self> {
        if line_width == 0 {
            return Err(Error::validation("line width must be positive"));
        }
        Ok(Self {
            name: name.into(),
            symbols: symbols.into(),
            line_width,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }

    /// Number of symbols in the record.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
