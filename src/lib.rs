//! # fabin - Huffman containers and grid queries for symbol sequences
//!
//! Two engines over a collection of named symbol strings:
//!
//! 1. **Container codec**: compresses every record into a `.fabin` container
//!    with a Huffman code built from symbol frequencies over the whole corpus,
//!    and decodes it back losslessly.
//! 2. **Grid queries**: lays one record out at its line width, weights each
//!    orthogonal neighbor pair by symbol similarity, and answers shortest-path
//!    and farthest-identical-symbol queries with Dijkstra.
//!
//! ## Example
//!
//! ```
//! use fabin_rs::{ContainerCodec, GridQueries, MemoryStore, Position, SequenceRecord, SequenceStore};
//!
//! let mut store = MemoryStore::from_records(vec![
//!     SequenceRecord::new("toy", "ACGT", 2).unwrap(),
//! ]);
//!
//! let codec = ContainerCodec::default();
//! let bytes = codec.encode_store(&store).unwrap();
//! codec.decode_into(&mut store, &bytes).unwrap();
//! assert_eq!(store.find("toy").unwrap().symbols(), b"ACGT");
//!
//! let route = GridQueries::default()
//!     .shortest_path(&store, "toy", Position::new(0, 0), Position::new(1, 1))
//!     .unwrap();
//! assert!(route.found);
//! assert_eq!(route.symbols, b"AGT".to_vec());
//! ```
//!
//! ## Determinism
//!
//! - Huffman ties are broken by frequency-table order, which the container
//!   stores, so decode always rebuilds the encoder's tree.
//! - Dijkstra selects by linear row-major scan; equal distances resolve to the
//!   earliest cell.

mod bits;
mod code_table;
mod config;
mod container;
mod error;
mod frequency;
mod grid;
mod paths;
mod query;
mod record;
mod store;
mod tree;


pub use bits::{BitReader, BitWriter};
pub use code_table::{CodeTable, CodeTableEntry};
pub use config::{Configuration, DEFAULT_MAX_GRID_CELLS};
pub use container::{decode, encode, ContainerCodec, ContainerStats};
pub use error::{Error, Result};
pub use frequency::{FrequencyEntry, FrequencyTable};
pub use grid::{edge_weight, Edge, GridGraph, Position};
pub use paths::{remote_symbol, shortest_path, PathResult};
pub use query::{histogram, GridQueries, RemoteSymbol};
pub use record::SequenceRecord;
pub use store::{MemoryStore, SequenceStore};
pub use tree::HuffmanTree;
