use crate::error::{Error, Result};
use std::fmt;

/// A zero-based cell coordinate in a grid graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

/// A directed edge to an orthogonal neighbor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: Position,
    /// In `(0, 1]`; see [`edge_weight`]
    pub weight: f64,
}

/// Similarity weight between two adjacent symbols: `1 / (1 + |a - b|)`.
///
/// Identical symbols weigh 1.0; the weight shrinks as their byte values drift
/// apart.
pub fn edge_weight(a: u8, b: u8) -> f64 {
    1.0 / (1.0 + a.abs_diff(b) as f64)
}

/// A symbol string laid out row-major at a fixed line width, with each cell
/// linked to its existing up, down, left and right neighbors.
///
/// The final row may be ragged: cells past the end of the string do not exist
/// and have no edges.
#[derive(Debug, Clone)]
pub struct GridGraph {
    symbols: Vec<u8>,
    rows: usize,
    cols: usize,
    /// Outgoing edges per cell, indexed by linear position
    adjacency: Vec<Vec<Edge>>,
}

impl GridGraph {
    /// Lays `symbols` out `line_width` cells per row and builds the adjacency.
    pub fn build(symbols: &[u8], line_width: usize) -> Result<Self> {
        if line_width == 0 {
            return Err(Error::validation("line width must be positive"));
        }

        let len = symbols.len();
        let rows = len.div_ceil(line_width);
        let cols = line_width;
        let mut adjacency = Vec::with_capacity(len);

        for idx in 0..len {
            let (row, col) = (idx / cols, idx % cols);
            let mut edges = Vec::with_capacity(4);
            let mut link = |r: usize, c: usize| {
                let n = r * cols + c;
                if n < len {
                    edges.push(Edge {
                        to: Position::new(r, c),
                        weight: edge_weight(symbols[idx], symbols[n]),
                    });
                }
            };

            if row > 0 {
                link(row - 1, col);
            }
            if row + 1 < rows {
                link(row + 1, col);
            }
            if col > 0 {
                link(row, col - 1);
            }
            if col + 1 < cols {
                link(row, col + 1);
            }
            adjacency.push(edges);
        }

        tracing::trace!(rows, cols, cells = len, "built grid graph");

        Ok(Self {
            symbols: symbols.to_vec(),
            rows,
            cols,
            adjacency,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells that hold a symbol.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Linear index of `pos`, or `None` if the cell does not exist.
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if pos.row >= self.rows || pos.col >= self.cols {
            return None;
        }
        let idx = pos.row * self.cols + pos.col;
        (idx < self.symbols.len()).then_some(idx)
    }

    pub(crate) fn position_of(&self, idx: usize) -> Position {
        Position::new(idx / self.cols, idx % self.cols)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index_of(pos).is_some()
    }

    /// Symbol stored at `pos`.
    pub fn symbol_at(&self, pos: Position) -> Option<u8> {
        self.index_of(pos).map(|idx| self.symbols[idx])
    }

    /// Outgoing edges of `pos`, in up, down, left, right order.
    pub fn edges(&self, pos: Position) -> &[Edge] {
        match self.index_of(pos) {
            Some(idx) => &self.adjacency[idx],
            None => &[],
        }
    }

    pub(crate) fn edges_at(&self, idx: usize) -> &[Edge] {
        &self.adjacency[idx]
    }

    pub(crate) fn symbol_at_index(&self, idx: usize) -> u8 {
        self.symbols[idx]
    }

    /// Validates that `pos` names an existing cell.
    pub(crate) fn require(&self, pos: Position) -> Result<usize> {
        self.index_of(pos).ok_or_else(|| {
            Error::validation(format!(
                "position {} is outside the {}x{} grid or past the last symbol",
                pos, self.rows, self.cols
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_properties() {
        assert_eq!(edge_weight(b'A', b'A'), 1.0);
        assert_eq!(edge_weight(b'A', b'C'), 1.0 / 3.0);
        assert_eq!(edge_weight(b'A', b'C'), edge_weight(b'C', b'A'));
        assert!(edge_weight(b'A', b'C') > edge_weight(b'A', b'G'));
        assert!(edge_weight(0, 255) > 0.0);
    }

    #[test]
    fn test_acgt_layout() {
        let graph = GridGraph::build(b"ACGT", 2).unwrap();
        assert_eq!((graph.rows(), graph.cols()), (2, 2));
        assert_eq!(graph.symbol_at(Position::new(0, 0)), Some(b'A'));
        assert_eq!(graph.symbol_at(Position::new(0, 1)), Some(b'C'));
        assert_eq!(graph.symbol_at(Position::new(1, 0)), Some(b'G'));
        assert_eq!(graph.symbol_at(Position::new(1, 1)), Some(b'T'));

        let edges = graph.edges(Position::new(0, 0));
        assert_eq!(
            edges,
            &[
                Edge {
                    to: Position::new(1, 0),
                    weight: edge_weight(b'A', b'G'),
                },
                Edge {
                    to: Position::new(0, 1),
                    weight: 1.0 / 3.0,
                },
            ]
        );
    }

    #[test]
    fn test_neighbor_order() {
        let graph = GridGraph::build(b"ABCDEFGHI", 3).unwrap();
        let targets: Vec<Position> = graph
            .edges(Position::new(1, 1))
            .iter()
            .map(|e| e.to)
            .collect();
        assert_eq!(
            targets,
            vec![
                Position::new(0, 1),
                Position::new(2, 1),
                Position::new(1, 0),
                Position::new(1, 2),
            ]
        );
    }

    #[test]
    fn test_ragged_last_row() {
        let graph = GridGraph::build(b"ACGTA", 3).unwrap();
        assert_eq!((graph.rows(), graph.cols()), (2, 3));
        assert!(graph.contains(Position::new(1, 1)));
        assert!(!graph.contains(Position::new(1, 2)));
        assert!(!graph.contains(Position::new(2, 0)));
        assert!(graph.edges(Position::new(1, 2)).is_empty());

        // (0,2) has no cell below it
        let below: Vec<_> = graph
            .edges(Position::new(0, 2))
            .iter()
            .filter(|e| e.to.row == 1)
            .collect();
        assert!(below.is_empty());
    }

    #[test]
    fn test_edges_are_symmetric() {
        let graph = GridGraph::build(b"GATTACACATTAG", 4).unwrap();
        for idx in 0..graph.len() {
            let from = graph.position_of(idx);
            for edge in graph.edges(from) {
                let back = graph
                    .edges(edge.to)
                    .iter()
                    .find(|e| e.to == from)
                    .expect("reverse edge should exist");
                assert_eq!(back.weight, edge.weight);
            }
        }
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(GridGraph::build(b"ACGT", 0).unwrap_err().is_validation());
    }

    #[test]
    fn test_empty_symbols() {
        let graph = GridGraph::build(b"", 5).unwrap();
        assert_eq!(graph.rows(), 0);
        assert!(graph.is_empty());
        assert!(!graph.contains(Position::new(0, 0)));
    }
}
