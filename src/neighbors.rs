/*
 * Neighbor Discovery Module
 *
 * Builds, for every agent, the list of other agents within its perception
 * radius. Works purely on a snapshot taken before anyone moves, which lets
 * the search run in parallel.
 */

use rayon::prelude::*;

use crate::agent::{Neighbor, WorldBounds};
use crate::spatial_grid::SpatialGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborSearch {
    /// Full O(n^2) scan; the reference.
    Pairwise,
    /// Uniform grid with cells as large as the biggest perception radius.
    Grid,
}

// Other agents within `radius` of agent `index`, the agent itself excluded
fn scan(
    index: usize,
    radius: f32,
    snapshot: &[Neighbor],
    candidates: impl Iterator<Item = usize>,
) -> Vec<Neighbor> {
    let origin = snapshot[index].position;
    let radius_sq = radius * radius;

    candidates
        .filter(|&other| other != index)
        .map(|other| snapshot[other])
        .filter(|other| other.position.distance_squared(origin) <= radius_sq)
        .collect()
}

/// Neighbor sets for every agent. `radii[i]` is the perception radius of
/// the agent whose state is `snapshot[i]`.
pub fn find_neighbors(
    snapshot: &[Neighbor],
    radii: &[f32],
    bounds: WorldBounds,
    search: NeighborSearch,
    parallel: bool,
) -> Vec<Vec<Neighbor>> {
    debug_assert_eq!(snapshot.len(), radii.len());
    let count = snapshot.len().min(radii.len());

    match search {
        NeighborSearch::Pairwise => {
            let query = |index: usize| scan(index, radii[index], snapshot, 0..count);
            if parallel {
                (0..count).into_par_iter().map(query).collect()
            } else {
                (0..count).map(query).collect()
            }
        }
        NeighborSearch::Grid => {
            let cell_size = radii.iter().copied().fold(0.0, f32::max);
            let mut grid = SpatialGrid::new(cell_size, bounds);
            grid.rebuild(snapshot[..count].iter().map(|agent| agent.position));

            let query = |index: usize| {
                let candidates = grid.nearby_indices(snapshot[index].position);
                scan(index, radii[index], snapshot, candidates.into_iter())
            };
            if parallel {
                (0..count).into_par_iter().map(query).collect()
            } else {
                (0..count).map(query).collect()
            }
        }
    }
}
