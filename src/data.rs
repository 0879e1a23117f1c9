//! Relationship mutation, path ingest and clique seeding: spec.md §4.1–§4.3.
//! Grounded on `original_source/data.cpp` (`Data::setRelationship`,
//! `setClique`) and `original_source/io.cpp` (`extractPath`).

use std::collections::BTreeSet;
use std::mem::swap;

use crate::types::{ASData, Data, Rel, AS};

impl Data {
    /// Returns a mutable `ASData` for `x`, creating it (with reflexive
    /// cone membership) if this is its first mention. See DESIGN.md, Open
    /// Question 1, for why the cone seeding happens here rather than after
    /// ranking as in the C++ original.
    pub(crate) fn as_entry(&mut self, x: AS) -> &mut ASData {
        self.ases.entry(x).or_insert_with(|| {
            let mut d = ASData::default();
            d.customer_cone.insert(x);
            d.provider_cone.insert(x);
            d
        })
    }

    /// Ensures the mirrored link records `a -> b` and `b -> a` exist
    /// (as `UNKNOWN`, if new). Idempotent.
    pub(crate) fn ensure_link(&mut self, a: AS, b: AS) {
        self.as_entry(a).links.entry(b).or_default();
        self.as_entry(b).links.entry(a).or_default();
    }

    fn link_mut(&mut self, a: AS, b: AS) -> &mut crate::types::LinkData {
        self.ases
            .get_mut(&a)
            .expect("ensure_link called first")
            .links
            .get_mut(&b)
            .expect("ensure_link called first")
    }

    fn triplet_mut(&mut self, p: AS, q: AS, r: AS) -> &mut crate::types::TripletData {
        self.as_entry(p)
            .links
            .entry(q)
            .or_default()
            .triplets
            .entry(r)
            .or_default()
    }

    /// Assigns relationship `t` to link `(a, b)`. See spec.md §4.2.
    ///
    /// Returns `false` (no-op on the relationship value) if the link is
    /// already assigned, or if a P2C/C2P assignment would create a cycle
    /// in the customer/provider cones. Mirrored link records are created
    /// regardless of success — see DESIGN.md, Open Question 2.
    pub fn set_relationship(&mut self, mut a: AS, mut b: AS, t: Rel) -> bool {
        self.ensure_link(a, b);

        if self.link(a, b).unwrap().relationship != Rel::Unknown {
            return false;
        }

        if !matches!(t, Rel::P2C | Rel::C2P) {
            self.link_mut(a, b).relationship = t;
            self.link_mut(b, a).relationship = t;
            return true;
        }

        if t == Rel::C2P {
            swap(&mut a, &mut b);
        }
        // Henceforth a is the provider, b the customer.

        if self.ases[&a].provider_cone.contains(&b) {
            return false;
        }

        self.link_mut(a, b).relationship = Rel::P2C;
        self.link_mut(b, a).relationship = Rel::C2P;

        let providers_of_a: Vec<AS> = self.ases[&a].provider_cone.iter().copied().collect();
        let customers_of_b: Vec<AS> = self.ases[&b].customer_cone.iter().copied().collect();

        for &p in &providers_of_a {
            self.as_entry(p)
                .customer_cone
                .extend(customers_of_b.iter().copied());
        }
        for &c in &customers_of_b {
            self.as_entry(c)
                .provider_cone
                .extend(providers_of_a.iter().copied());
        }

        true
    }

    /// Applies the IXP filter/collapse and validity gate of spec.md §4.1
    /// steps 1–2 to a raw path, then records it (step 3) if accepted.
    pub fn ingest_path(&mut self, raw: &[AS], ixp: &BTreeSet<AS>, clique: &BTreeSet<AS>) {
        let prepared = prepare_path(raw, ixp);
        if validate_path(&prepared, clique) {
            self.record_path(&prepared);
        }
    }

    /// Records an already-filtered, already-validated path. spec.md §4.1
    /// step 3.
    fn record_path(&mut self, path: &[AS]) {
        let n = path.len();
        debug_assert!(n >= 2);

        self.ensure_link(path[0], path[1]);
        let last = path[n - 1];
        self.as_entry(path[0]).visibility_as_vp.insert(last);

        if n == 2 {
            return;
        }

        for i in 1..=(n - 2) {
            let x = path[i - 1];
            let y = path[i];
            let z = path[i + 1];

            self.ensure_link(x, y);
            self.ensure_link(y, z);

            self.triplet_mut(z, y, x).bump_count();
            self.triplet_mut(x, y, z).bump_count();

            let was_upstream = self.triplet_mut(z, y, x).upstream;
            if !was_upstream {
                self.triplet_mut(z, y, x).upstream = true;
                self.link_mut(y, x).transit = true;
                self.link_mut(y, z).transit = true;
                self.as_entry(y).transit_pairs.insert((x, z));
            }

            if i == n - 2 {
                self.triplet_mut(z, y, x).end_of_path = true;
                if n == 3 {
                    self.triplet_mut(x, y, z).two_edge_path = true;
                }
            }
        }
    }

    /// spec.md §4.3: mark clique members and mesh them with P2P.
    pub fn seed_clique(&mut self, clique: &BTreeSet<AS>) {
        for &c in clique {
            self.as_entry(c).in_clique = true;
        }

        let members: Vec<AS> = clique.iter().copied().collect();
        for (idx, &u) in members.iter().enumerate() {
            for &v in &members[..idx] {
                self.set_relationship(u, v, Rel::P2P);
            }
        }
    }
}

/// spec.md §4.1 step 1: drop IXP ASes, collapse consecutive duplicates,
/// then (the preserved quirk) re-admit the original last raw token if the
/// collapsed path doesn't already end with it.
pub fn prepare_path(raw: &[AS], ixp: &BTreeSet<AS>) -> Vec<AS> {
    let mut path: Vec<AS> = Vec::with_capacity(raw.len());
    for &a in raw {
        if !ixp.contains(&a) && path.last() != Some(&a) {
            path.push(a);
        }
    }

    if path.is_empty() {
        return path;
    }

    if let Some(&last_raw) = raw.last() {
        if path.last() != Some(&last_raw) {
            path.push(last_raw);
        }
    }

    path
}

/// spec.md §4.1 step 2: length, loop and clique-alternation gate.
pub fn validate_path(path: &[AS], clique: &BTreeSet<AS>) -> bool {
    let size = path.len();
    if size < 2 {
        return false;
    }

    let mut visited = BTreeSet::new();
    let mut c: u32 = 0;
    for &a in path {
        visited.insert(a);
        let in_clique = u32::from(clique.contains(&a));
        if in_clique != c % 2 {
            c += 1;
        }
    }

    c <= 2 && visited.len() == size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_path_drops_ixp_and_collapses_dups() {
        let ixp: BTreeSet<AS> = [99].into_iter().collect();
        assert_eq!(prepare_path(&[1, 99, 2, 2, 3], &ixp), vec![1, 2, 3]);
    }

    #[test]
    fn prepare_path_readmits_trailing_ixp() {
        let ixp: BTreeSet<AS> = [99].into_iter().collect();
        // Trailing IXP re-admitted verbatim, per the preserved quirk.
        assert_eq!(prepare_path(&[1, 2, 99], &ixp), vec![1, 2, 99]);
    }

    #[test]
    fn prepare_path_all_ixp_yields_empty() {
        let ixp: BTreeSet<AS> = [1, 2].into_iter().collect();
        assert_eq!(prepare_path(&[1, 2], &ixp), Vec::<AS>::new());
    }

    #[test]
    fn validate_path_rejects_short_and_looping_paths() {
        let clique = BTreeSet::new();
        assert!(!validate_path(&[1], &clique));
        assert!(!validate_path(&[1, 2, 3, 2, 4], &clique));
        assert!(validate_path(&[1, 2, 3], &clique));
    }

    #[test]
    fn validate_path_clique_alternation() {
        let clique: BTreeSet<AS> = [2, 4].into_iter().collect();
        // not-clique(1) clique(2) not-clique(3) clique(4): alternation = 3.
        assert!(!validate_path(&[1, 2, 3, 4], &clique));
        // not-clique(1) clique(2) not-clique(3): alternation = 2, accepted.
        assert!(validate_path(&[1, 2, 3], &clique));
    }

    #[test]
    fn two_as_path_has_no_triplets() {
        let mut data = Data::new();
        data.ingest_path(&[1, 2], &BTreeSet::new(), &BTreeSet::new());
        assert!(data.link(1, 2).unwrap().triplets.is_empty());
        assert!(data.ases[&1].visibility_as_vp.contains(&2));
    }

    #[test]
    fn three_as_path_sets_end_of_path_and_two_edge_path() {
        let mut data = Data::new();
        data.ingest_path(&[1, 2, 3], &BTreeSet::new(), &BTreeSet::new());
        let t_321 = data.link(3, 2).unwrap().triplets[&1];
        assert!(t_321.end_of_path);
        let t_123 = data.link(1, 2).unwrap().triplets[&3];
        assert!(t_123.two_edge_path);
    }

    #[test]
    fn repeated_as_drops_whole_path() {
        let mut data = Data::new();
        data.ingest_path(&[1, 2, 3, 2, 4], &BTreeSet::new(), &BTreeSet::new());
        assert!(data.is_empty());
    }

    #[test]
    fn count_saturates_at_u16_ceiling() {
        let mut data = Data::new();
        for _ in 0..100_000 {
            data.ingest_path(&[7, 8, 9], &BTreeSet::new(), &BTreeSet::new());
        }
        assert_eq!(data.link(9, 8).unwrap().triplets[&7].count, u16::MAX);
    }

    #[test]
    fn set_relationship_mirrors_and_rejects_cycle() {
        let mut data = Data::new();
        assert!(data.set_relationship(1, 2, Rel::P2C));
        assert!(data.set_relationship(2, 3, Rel::P2C));
        // 3 provider of 1 would create a cycle through the existing chain.
        assert!(!data.set_relationship(3, 1, Rel::P2C));
        // Rejected attempt still creates a mirrored UNKNOWN link record.
        assert_eq!(data.link(1, 3).unwrap().relationship, Rel::Unknown);
        assert_eq!(data.link(3, 1).unwrap().relationship, Rel::Unknown);

        assert_eq!(data.link(1, 2).unwrap().relationship, Rel::P2C);
        assert_eq!(data.link(2, 1).unwrap().relationship, Rel::C2P);
    }

    #[test]
    fn cones_stay_reflexive_and_closed() {
        let mut data = Data::new();
        data.set_relationship(1, 2, Rel::P2C);
        data.set_relationship(2, 3, Rel::P2C);
        assert!(data.ases[&1].customer_cone.contains(&1));
        assert!(data.ases[&1].customer_cone.is_superset(&[1, 2, 3].into_iter().collect()));
        assert!(data.ases[&3].provider_cone.is_superset(&[1, 2, 3].into_iter().collect()));
    }

    #[test]
    fn already_assigned_link_rejects_second_assignment() {
        let mut data = Data::new();
        assert!(data.set_relationship(1, 2, Rel::P2P));
        assert!(!data.set_relationship(1, 2, Rel::S2S));
        assert_eq!(data.link(1, 2).unwrap().relationship, Rel::P2P);
    }
}
