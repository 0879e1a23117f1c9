//! AS ranking: spec.md §4.4. Grounded on `original_source/inference.cpp`'s
//! `computeTransitDegrees` / `Comparator` / `computeASRanks`.

use crate::types::{Data, AS};

/// Transit degree of `x`: number of neighbors `y` for which link `x -> y`
/// carries transit traffic.
pub fn compute_transit_degrees(data: &mut Data) {
    let ids: Vec<AS> = data.ases.keys().copied().collect();
    for id in ids {
        let degree = data.ases[&id]
            .links
            .values()
            .filter(|l| l.transit)
            .count() as u32;
        data.ases.get_mut(&id).unwrap().transit_degree = degree;
    }
}

/// Total order over ASes: clique members first, then larger transit
/// degree, then larger neighbor count, then smaller AS number.
pub fn compute_as_ranks(data: &mut Data) {
    let mut order: Vec<AS> = data.ases.keys().copied().collect();

    order.sort_by(|&a, &b| {
        let da = &data.ases[&a];
        let db = &data.ases[&b];
        db.in_clique
            .cmp(&da.in_clique)
            .then_with(|| db.transit_degree.cmp(&da.transit_degree))
            .then_with(|| db.links.len().cmp(&da.links.len()))
            .then_with(|| a.cmp(&b))
    });

    for (i, &id) in order.iter().enumerate() {
        data.ases.get_mut(&id).unwrap().rank = (i + 1) as u32;
    }
    data.as_by_rank = order;
}
