//! Store-facing queries: look a record up by name, build its grid, answer.
//!
//! Grids are built per call and dropped on return.

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::grid::{GridGraph, Position};
use crate::paths::{self, PathResult};
use crate::record::SequenceRecord;
use crate::store::SequenceStore;

/// The farthest other occurrence of a symbol and the route to it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSymbol {
    pub origin: Position,
    pub position: Position,
    pub symbol: u8,
    pub route: PathResult,
}

/// Runs grid queries against records held in a store.
#[derive(Debug, Clone, Default)]
pub struct GridQueries {
    config: Configuration,
}

impl GridQueries {
    /// Creates a query runner, rejecting an invalid configuration up front.
    pub fn new(config: Configuration) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Cheapest route between two cells of the named record.
    pub fn shortest_path<S: SequenceStore + ?Sized>(
        &self,
        store: &S,
        name: &str,
        source: Position,
        target: Position,
    ) -> Result<PathResult> {
        tracing::debug!(name, %source, %target, "shortest path query");
        let graph = self.graph_for(store, name)?;
        paths::shortest_path(&graph, source, target)
    }

    /// Farthest other occurrence of the symbol at `origin`, with the route to it.
    ///
    /// `Ok(None)` means the symbol occurs nowhere else in the record.
    pub fn remote_symbol<S: SequenceStore + ?Sized>(
        &self,
        store: &S,
        name: &str,
        origin: Position,
    ) -> Result<Option<RemoteSymbol>> {
        tracing::debug!(name, %origin, "remote symbol query");
        let graph = self.graph_for(store, name)?;
        let Some(position) = paths::remote_symbol(&graph, origin)? else {
            return Ok(None);
        };
        let route = paths::shortest_path(&graph, origin, position)?;
        let symbol = graph.symbol_at(origin).unwrap_or_default();

        Ok(Some(RemoteSymbol {
            origin,
            position,
            symbol,
            route,
        }))
    }

    fn graph_for<S: SequenceStore + ?Sized>(&self, store: &S, name: &str) -> Result<GridGraph> {
        let record = find(store, name)?;
        let rows = record.len().div_ceil(record.line_width());
        let cells = rows.saturating_mul(record.line_width());
        if cells > self.config.max_grid_cells {
            return Err(Error::validation(format!(
                "record {} spans {} grid cells, limit is {}",
                name, cells, self.config.max_grid_cells
            )));
        }
        GridGraph::build(record.symbols(), record.line_width())
    }
}

/// Symbol counts of one record, in first-seen order.
pub fn histogram<S: SequenceStore + ?Sized>(store: &S, name: &str) -> Result<FrequencyTable> {
    let record = find(store, name)?;
    Ok(FrequencyTable::from_symbols(record.symbols()))
}

fn find<'s, S: SequenceStore + ?Sized>(store: &'s S, name: &str) -> Result<&'s SequenceRecord> {
    store.find(name).ok_or_else(|| Error::record_not_found(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store() -> MemoryStore {
        MemoryStore::from_records(vec![
            SequenceRecord::new("acgt", "ACGT", 2).unwrap(),
            SequenceRecord::new("repeat", "ACCACCCA", 4).unwrap(),
        ])
    }

    #[test]
    fn test_shortest_path_by_name() {
        let queries = GridQueries::default();
        let result = queries
            .shortest_path(&store(), "acgt", Position::new(0, 0), Position::new(1, 1))
            .unwrap();
        assert!(result.found);
        assert_eq!(result.symbols, b"AGT".to_vec());
    }

    #[test]
    fn test_unknown_record() {
        let queries = GridQueries::default();
        let err = queries
            .shortest_path(&store(), "missing", Position::new(0, 0), Position::new(0, 0))
            .unwrap_err();
        assert!(matches!(err, Error::RecordNotFound(name) if name == "missing"));
        assert!(histogram(&store(), "missing").is_err());
    }

    #[test]
    fn test_remote_symbol_with_route() {
        let queries = GridQueries::default();
        let remote = queries
            .remote_symbol(&store(), "repeat", Position::new(0, 0))
            .unwrap()
            .expect("A occurs more than once");
        assert_eq!(remote.symbol, b'A');
        assert_eq!(remote.position, Position::new(1, 3));
        assert!(remote.route.found);
        assert_eq!(remote.route.path.first(), Some(&Position::new(0, 0)));
        assert_eq!(remote.route.path.last(), Some(&Position::new(1, 3)));
    }

    #[test]
    fn test_remote_symbol_unique() {
        let queries = GridQueries::default();
        let remote = queries
            .remote_symbol(&store(), "acgt", Position::new(1, 1))
            .unwrap();
        assert!(remote.is_none());
    }

    #[test]
    fn test_grid_limit() {
        let queries = GridQueries::new(Configuration {
            max_grid_cells: 3,
            ..Configuration::default()
        })
        .unwrap();
        let err = queries
            .shortest_path(&store(), "acgt", Position::new(0, 0), Position::new(0, 1))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_zero_cell_limit_rejected_on_construction() {
        let err = GridQueries::new(Configuration {
            max_grid_cells: 0,
            ..Configuration::default()
        })
        .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("max_grid_cells"));
    }

    #[test]
    fn test_histogram() {
        let table = histogram(&store(), "repeat").unwrap();
        assert_eq!(table.get(b'A'), 3);
        assert_eq!(table.get(b'C'), 5);
        assert_eq!(table.len(), 2);
    }
}
