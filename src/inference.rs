//! The seven inference phases plus the shared `topDown` helper: spec.md
//! §4.6. Grounded line-for-line on `original_source/inference.cpp`; the
//! magic thresholds (2, 2, 10) and the quirk in Phase 3 where a redundant
//! edge is re-enqueued into `topDown` are preserved as found, not "fixed".

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Data, Rel, TripletData, AS};

/// A candidate `(z, y, x)` triple awaiting a priority-ordered P2C attempt
/// in [`add_links_to_smaller_providers`].
#[derive(Debug, Clone, Copy)]
struct Triplet {
    z: AS,
    y: AS,
    x: AS,
}

/// Propagates P2C assignments downward. `candidates` holds `(x, y)` edges to
/// try as P2C; a successful assignment may surface further candidates among
/// `x`'s upstream triplets, which are folded back in. Drained in ascending
/// `(x, y)` order; the order doesn't affect the outcome since every
/// assignment is permanent and rejected edges are simply dropped.
fn top_down(data: &mut Data, candidates: &mut BTreeSet<(AS, AS)>) {
    while let Some(&(x, y)) = candidates.iter().next() {
        candidates.remove(&(x, y));

        if !data.set_relationship(x, y, Rel::P2C) {
            continue;
        }

        let rank_y = data.rank_of(y);
        let thirds: Vec<AS> = data
            .link(x, y)
            .map(|l| l.triplets.keys().copied().collect())
            .unwrap_or_default();

        for z in thirds {
            let upstream = data
                .link(z, y)
                .and_then(|l| l.triplets.get(&x))
                .map(|t| t.upstream)
                .unwrap_or(false);
            if rank_y < data.rank_of(z) && upstream {
                candidates.insert((y, z));
            }
        }
    }
}

/// Phase 1: infers `x>y?z`, `x-y?z` and `x?y-z` (the last only when the
/// triplet was seen more than twice).
pub fn add_upstream_provider_links(data: &mut Data) {
    for z in data.as_by_rank.clone() {
        if data.ases[&z].in_clique {
            continue;
        }
        let rank_z = data.rank_of(z);
        let neighbors: Vec<AS> = data.ases[&z].links.keys().copied().collect();

        for y in neighbors {
            if data.rank_of(y) > rank_z {
                continue;
            }
            if data.link(z, y).unwrap().relationship != Rel::Unknown {
                continue;
            }

            let thirds: Vec<(AS, TripletData)> = data
                .link(z, y)
                .unwrap()
                .triplets
                .iter()
                .map(|(&x, &t)| (x, t))
                .collect();

            for (x, triplet) in thirds {
                let t = data.link(x, y).map(|l| l.relationship).unwrap_or(Rel::Unknown);
                let fire = (t == Rel::P2C && triplet.upstream)
                    || (t == Rel::P2P && (triplet.upstream || triplet.count > 2));
                if fire {
                    data.set_relationship(y, z, Rel::P2C);
                    break;
                }
            }
        }
    }
}

/// Phase 2: a vantage point with under 2% visibility sees only stubs two
/// hops out; any such stub with zero transit degree is a P2C customer.
pub fn find_client_stubs_seen_from_partial_vp(data: &mut Data) {
    let total = data.len() as u64;
    let vps: Vec<AS> = data.ases.keys().copied().collect();

    for v in vps {
        let visibility = data.ases[&v].visibility_as_vp.len() as u64;
        if visibility * 50 >= total {
            continue;
        }

        let ys: Vec<AS> = data.ases[&v].links.keys().copied().collect();
        for y in ys {
            let zs: Vec<(AS, bool)> = data.ases[&v].links[&y]
                .triplets
                .iter()
                .map(|(&z, t)| (z, t.two_edge_path))
                .collect();

            for (z, two_edge_path) in zs {
                let stub = data.ases.get(&z).map(|d| d.transit_degree).unwrap_or(0) == 0;
                if two_edge_path && stub {
                    data.set_relationship(y, z, Rel::P2C);
                }
            }
        }
    }
}

/// Phase 3: finds providers with a smaller transit degree that announce at
/// least one prefix, assigning the strongest-evidenced triples first.
pub fn add_links_to_smaller_providers(data: &mut Data) {
    let mut candidates: BTreeMap<u16, Vec<Triplet>> = BTreeMap::new();

    let zs: Vec<AS> = data.ases.keys().copied().collect();
    for z in zs {
        let rank_z = data.rank_of(z);
        let ys: Vec<AS> = data.ases[&z].links.keys().copied().collect();

        for y in ys {
            if rank_z > data.rank_of(y) {
                continue;
            }
            if data.link(z, y).unwrap().relationship != Rel::Unknown {
                continue;
            }

            let xs: Vec<(AS, TripletData)> = data
                .link(z, y)
                .unwrap()
                .triplets
                .iter()
                .map(|(&x, &t)| (x, t))
                .collect();

            for (x, triplet) in xs {
                if !triplet.end_of_path {
                    continue;
                }
                if data.link(y, x).map(|l| l.relationship) != Some(Rel::C2P) {
                    continue;
                }
                candidates.entry(triplet.count).or_default().push(Triplet { z, y, x });
            }
        }
    }

    while let Some((&priority, _)) = candidates.iter().next_back() {
        let bucket = candidates.get_mut(&priority).unwrap();
        let t = bucket.pop().unwrap();
        if bucket.is_empty() {
            candidates.remove(&priority);
        }

        if priority <= 2 {
            continue;
        }

        if !data.set_relationship(t.y, t.z, Rel::P2C) {
            continue;
        }

        let mut next_in_line: BTreeSet<(AS, AS)> = BTreeSet::new();
        let is_: Vec<AS> = data
            .link(t.y, t.z)
            .map(|l| l.triplets.keys().copied().collect())
            .unwrap_or_default();

        for i in is_ {
            if data.link(i, t.z).map(|l| l.relationship) != Some(Rel::Unknown) {
                continue;
            }
            if data.rank_of(i) > data.rank_of(t.z) {
                // Re-derives the edge just assigned; topDown below drops it
                // as already-resolved. Preserved as found.
                next_in_line.insert((t.y, t.z));
            } else if let Some(end_of_path) = data
                .link(i, t.z)
                .and_then(|l| l.triplets.get(&t.y))
                .map(|tt| tt.end_of_path)
            {
                if end_of_path {
                    let count = data.link(i, t.z).unwrap().triplets[&t.y].count;
                    candidates
                        .entry(count)
                        .or_default()
                        .push(Triplet { z: i, y: t.z, x: t.y });
                }
            }
        }

        top_down(data, &mut next_in_line);
    }
}

/// Phase 4: an AS with exactly one provider (itself) and a high transit
/// degree but no real upstream is resolved to P2P with its remaining
/// unoriented neighbors, most important first.
pub fn break_ties_when_no_provider(data: &mut Data) {
    for x in data.as_by_rank.clone() {
        let dx = &data.ases[&x];
        if dx.provider_cone.len() != 1 || dx.in_clique || dx.transit_degree < 10 {
            continue;
        }

        let neighbor_ids: Vec<AS> = dx.links.keys().copied().collect();
        let mut neighbors: Vec<AS> = neighbor_ids
            .into_iter()
            .filter(|&y| {
                let has_evidence = data.link(y, x).map(|l| !l.triplets.is_empty()).unwrap_or(false);
                let unknown = data.link(x, y).map(|l| l.relationship == Rel::Unknown).unwrap_or(false);
                has_evidence && unknown
            })
            .collect();
        neighbors.sort_by_key(|&y| data.rank_of(y));

        for y in neighbors {
            data.set_relationship(x, y, Rel::P2P);

            let thirds: Vec<AS> = data
                .link(x, y)
                .map(|l| l.triplets.keys().copied().collect())
                .unwrap_or_default();
            let mut next_in_line: BTreeSet<(AS, AS)> = thirds.into_iter().map(|w| (y, w)).collect();
            top_down(data, &mut next_in_line);
        }
    }
}

/// Phase 5: a clique member's stub neighbors (no transit of their own)
/// become its P2C customers.
pub fn set_clique_stub_links_as_p2c(data: &mut Data, clique: &BTreeSet<AS>) {
    for &c in clique {
        let neighbors: Vec<AS> = data
            .ases
            .get(&c)
            .map(|d| d.links.keys().copied().collect())
            .unwrap_or_default();

        for s in neighbors {
            if data.ases.get(&s).map(|d| d.transit_degree).unwrap_or(0) == 0 {
                data.set_relationship(c, s, Rel::P2C);
            }
        }
    }
}

/// Phase 6: resolves the remaining ambiguous transit triples, screening out
/// any candidate that would contradict an AS's existing provider cone or
/// play both upstream and downstream roles at once.
pub fn break_remaining_ties(data: &mut Data) {
    for y in data.as_by_rank.clone() {
        if data.ases[&y].transit_degree == 0 {
            continue;
        }

        let transit_pairs: Vec<(AS, AS)> = data.ases[&y].transit_pairs.iter().copied().collect();
        let provider_cone = data.ases[&y].provider_cone.clone();

        let mut candidates: BTreeSet<(AS, AS)> = BTreeSet::new();
        let mut upstream: BTreeSet<AS> = BTreeSet::new();
        let mut downstream: BTreeSet<AS> = BTreeSet::new();

        for (x, z) in transit_pairs {
            let skip = data
                .link(x, y)
                .map(|l| l.triplets.keys().any(|w| provider_cone.contains(w)))
                .unwrap_or(false);
            if skip {
                continue;
            }
            candidates.insert((x, z));
            upstream.insert(x);
            downstream.insert(z);
        }

        candidates.retain(|&(a, b)| !upstream.contains(&b) && !downstream.contains(&a));

        let mut next_in_line: BTreeSet<(AS, AS)> = BTreeSet::new();
        for (_, z) in candidates {
            if data.rank_of(y) < data.rank_of(z) {
                next_in_line.insert((y, z));
            }
        }
        top_down(data, &mut next_in_line);
    }
}

/// Phase 7: every link still unoriented settles as P2P.
pub fn complete_with_p2p_links(data: &mut Data) {
    let pairs: Vec<(AS, AS)> = data
        .ases
        .iter()
        .flat_map(|(&a, ad)| ad.links.keys().map(move |&b| (a, b)).collect::<Vec<_>>())
        .collect();

    for (a, b) in pairs {
        data.set_relationship(a, b, Rel::P2P);
    }
}

/// Runs all seven phases in order, exactly as `main.cpp` does after
/// building `Data`.
pub fn infer(data: &mut Data, clique: &BTreeSet<AS>) {
    add_upstream_provider_links(data);
    find_client_stubs_seen_from_partial_vp(data);
    add_links_to_smaller_providers(data);
    break_ties_when_no_provider(data);
    set_clique_stub_links_as_p2c(data, clique);
    break_remaining_ties(data);
    complete_with_p2p_links(data);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranker::{compute_as_ranks, compute_transit_degrees};

    fn build(paths: &[&[AS]], clique: &BTreeSet<AS>) -> Data {
        let mut data = Data::new();
        for p in paths {
            data.ingest_path(p, &BTreeSet::new(), clique);
        }
        data.seed_clique(clique);
        compute_transit_degrees(&mut data);
        compute_as_ranks(&mut data);
        data
    }

    #[test]
    fn stub_inference_scenario() {
        // AS 10 is the sole clique member; 10-20-30 observed three times.
        let clique: BTreeSet<AS> = [10].into_iter().collect();
        let path: &[AS] = &[10, 20, 30];
        let mut data = build(&[path, path, path], &clique);

        infer(&mut data, &clique);

        assert_eq!(data.link(10, 20).unwrap().relationship, Rel::P2P);
        assert_eq!(data.link(20, 30).unwrap().relationship, Rel::P2C);
    }

    #[test]
    fn clique_mesh_scenario() {
        let clique: BTreeSet<AS> = [1, 2, 3].into_iter().collect();
        let mut data = build(&[&[1, 2], &[2, 3], &[1, 3]], &clique);
        infer(&mut data, &clique);
        assert_eq!(data.link(1, 2).unwrap().relationship, Rel::P2P);
        assert_eq!(data.link(1, 3).unwrap().relationship, Rel::P2P);
        assert_eq!(data.link(2, 3).unwrap().relationship, Rel::P2P);
    }

    #[test]
    fn cone_cycle_rejection_scenario() {
        let mut data = Data::new();
        assert!(data.set_relationship(1, 2, Rel::P2C));
        assert!(data.set_relationship(2, 3, Rel::P2C));
        assert!(!data.set_relationship(3, 1, Rel::P2C));

        compute_transit_degrees(&mut data);
        compute_as_ranks(&mut data);
        infer(&mut data, &BTreeSet::new());

        // Phase 7 resolves the never-observed (1, 3) pair to P2P.
        assert_eq!(data.link(1, 3).unwrap().relationship, Rel::P2P);
        assert_eq!(data.link(1, 2).unwrap().relationship, Rel::P2C);
        assert_eq!(data.link(2, 3).unwrap().relationship, Rel::P2C);
    }

    #[test]
    fn trivial_chain_resolves_via_phase6_and_phase7() {
        // A single (1, 2, 3) observation gives AS 2 exactly one transit-pair
        // witness, which breakRemainingTies schedules into topDown since
        // rank(2) < rank(3); (1, 2) is left untouched until Phase 7. See
        // DESIGN.md, Open Question 7.
        let mut data = build(&[&[1, 2, 3]], &BTreeSet::new());
        infer(&mut data, &BTreeSet::new());
        assert_eq!(data.link(1, 2).unwrap().relationship, Rel::P2P);
        assert_eq!(data.link(2, 3).unwrap().relationship, Rel::P2C);
    }

    #[test]
    fn top_down_propagates_and_skips_already_assigned() {
        let mut data = build(&[&[1, 2, 3], &[1, 2, 3], &[1, 2, 3]], &BTreeSet::new());
        let mut candidates: BTreeSet<(AS, AS)> = [(1, 2)].into_iter().collect();
        top_down(&mut data, &mut candidates);
        assert_eq!(data.link(1, 2).unwrap().relationship, Rel::P2C);
        assert!(candidates.is_empty());
    }
}
