//! Tier-1 clique discovery: spec.md §4.5. Grounded on
//! `original_source/inference.cpp`'s `computeClique`.

use std::collections::BTreeSet;

use crate::ranker::{compute_as_ranks, compute_transit_degrees};
use crate::types::{Data, AS};

/// Used when the caller supplies no clique seed. Builds a throwaway `Data`
/// (no preloaded relationships, no seed clique), ranks it, then brute-forces
/// the largest fully-adjacent subset of the top-ranked ASes before
/// extending greedily. The C++ original indexes the top 10 ranked ASes
/// unconditionally; this clamps the window to the corpus size (DESIGN.md,
/// Open Question 3).
pub fn compute_clique(paths: &[Vec<AS>], ixp: &BTreeSet<AS>) -> BTreeSet<AS> {
    let mut data = Data::new();
    let empty_clique = BTreeSet::new();
    for raw in paths {
        data.ingest_path(raw, ixp, &empty_clique);
    }
    compute_transit_degrees(&mut data);
    compute_as_ranks(&mut data);

    let as_by_rank = data.as_by_rank.clone();
    let window = as_by_rank.len().min(10);

    let mut best: BTreeSet<AS> = BTreeSet::new();

    for mask in 0u32..(1u32 << window) {
        let candidate: BTreeSet<AS> = (0..window)
            .filter(|e| (mask >> e) & 1 == 1)
            .map(|e| as_by_rank[e])
            .collect();

        if candidate.len() <= best.len() {
            continue;
        }

        let all_adjacent = candidate.iter().all(|&u| {
            candidate
                .iter()
                .all(|&v| u == v || data.link(u, v).is_some())
        });

        if all_adjacent {
            best = candidate;
        }
    }

    for &candidate_as in &as_by_rank[window..] {
        let adjacent_to_all = best.iter().all(|&member| data.link(candidate_as, member).is_some());
        if adjacent_to_all {
            best.insert(candidate_as);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_chain_clique_is_the_largest_adjacent_pair() {
        // A bare 3-AS chain has no triangle (1-3 were never adjacent), so
        // the largest verified clique is one of the two adjacent pairs;
        // ascending-bitmask tie-break picks {1, 2} here. See DESIGN.md,
        // Open Question 6.
        let paths = vec![vec![1, 2, 3]];
        let clique = compute_clique(&paths, &BTreeSet::new());
        assert_eq!(clique, [1, 2].into_iter().collect());
    }

    #[test]
    fn fully_meshed_triangle_is_a_clique() {
        let paths = vec![vec![1, 2], vec![2, 3], vec![1, 3]];
        let clique = compute_clique(&paths, &BTreeSet::new());
        assert_eq!(clique, [1, 2, 3].into_iter().collect());
    }
}
