use crate::error::Result;
use crate::grid::{GridGraph, Position};

/// Outcome of a shortest-path query.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub found: bool,
    /// Cells from source to target, both inclusive
    pub path: Vec<Position>,
    /// Symbol at each cell of `path`
    pub symbols: Vec<u8>,
    pub total_cost: f64,
}

impl PathResult {
    pub fn not_found() -> Self {
        Self {
            found: false,
            path: Vec::new(),
            symbols: Vec::new(),
            total_cost: 0.0,
        }
    }

    /// Number of edges walked.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Dijkstra state for one query.
///
/// Selection is a full linear scan in row-major order with a strict `<`, so
/// among equal tentative distances the first cell in row-major order is
/// finalized first. Both queries depend on that order for their tie-breaks.
struct Relaxation<'g> {
    graph: &'g GridGraph,
    distance: Vec<f64>,
    finalized: Vec<bool>,
    predecessor: Vec<Option<usize>>,
}

impl<'g> Relaxation<'g> {
    fn new(graph: &'g GridGraph, source: usize) -> Self {
        let mut distance = vec![f64::INFINITY; graph.len()];
        distance[source] = 0.0;
        Self {
            graph,
            distance,
            finalized: vec![false; graph.len()],
            predecessor: vec![None; graph.len()],
        }
    }

    /// Picks the closest unfinalized cell, finalizes it and returns it.
    ///
    /// Returns `None` once no reachable unfinalized cell is left.
    fn select(&mut self) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut best_distance = f64::INFINITY;
        for idx in 0..self.distance.len() {
            if !self.finalized[idx] && self.distance[idx] < best_distance {
                best_distance = self.distance[idx];
                best = Some(idx);
            }
        }
        let idx = best?;
        self.finalized[idx] = true;
        Some(idx)
    }

    /// Relaxes the outgoing edges of a finalized cell.
    fn relax(&mut self, idx: usize) {
        let from = self.distance[idx];
        for edge in self.graph.edges_at(idx) {
            let Some(to) = self.graph.index_of(edge.to) else {
                continue;
            };
            if self.finalized[to] {
                continue;
            }
            let candidate = from + edge.weight;
            if candidate < self.distance[to] {
                self.distance[to] = candidate;
                self.predecessor[to] = Some(idx);
            }
        }
    }

    /// Walks predecessors back from `target`.
    ///
    /// A break in the chain yields `None` rather than a partial path.
    fn reconstruct(&self, source: usize, target: usize) -> Option<Vec<usize>> {
        let mut reversed = vec![target];
        let mut current = target;
        while current != source {
            current = self.predecessor[current]?;
            reversed.push(current);
            if reversed.len() > self.distance.len() {
                return None;
            }
        }
        reversed.reverse();
        Some(reversed)
    }
}

/// Finds the cheapest route between two cells.
///
/// Both positions must name existing cells. An unreachable target gives a
/// result with `found == false`.
pub fn shortest_path(graph: &GridGraph, source: Position, target: Position) -> Result<PathResult> {
    let source_idx = graph.require(source)?;
    let target_idx = graph.require(target)?;

    let mut state = Relaxation::new(graph, source_idx);
    while let Some(idx) = state.select() {
        if idx == target_idx {
            break;
        }
        state.relax(idx);
    }

    let total_cost = state.distance[target_idx];
    if total_cost.is_infinite() {
        return Ok(PathResult::not_found());
    }
    let Some(route) = state.reconstruct(source_idx, target_idx) else {
        tracing::warn!(%source, %target, "predecessor chain broken; reporting no path");
        return Ok(PathResult::not_found());
    };

    Ok(PathResult {
        found: true,
        path: route.iter().map(|&idx| graph.position_of(idx)).collect(),
        symbols: route.iter().map(|&idx| graph.symbol_at_index(idx)).collect(),
        total_cost,
    })
}

/// Finds the occurrence of `origin`'s symbol that is farthest from it by
/// shortest-path distance.
///
/// Relaxes the whole graph. Only a strictly greater distance replaces the
/// current candidate, so ties go to the cell finalized first. Returns `None`
/// when no other reachable cell holds the same symbol.
pub fn remote_symbol(graph: &GridGraph, origin: Position) -> Result<Option<Position>> {
    let origin_idx = graph.require(origin)?;
    let wanted = graph.symbol_at_index(origin_idx);

    let mut state = Relaxation::new(graph, origin_idx);
    let mut best: Option<(usize, f64)> = None;
    while let Some(idx) = state.select() {
        if idx != origin_idx && graph.symbol_at_index(idx) == wanted {
            let distance = state.distance[idx];
            if best.map_or(true, |(_, d)| distance > d) {
                best = Some((idx, distance));
            }
        }
        state.relax(idx);
    }

    Ok(best.map(|(idx, _)| graph.position_of(idx)))
}
