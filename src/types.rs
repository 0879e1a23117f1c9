//! Core data model: the triplet-indexed structure that summarises observed
//! AS-path data. Field layout mirrors `original_source/data.h` one-to-one;
//! the nested `map<AS, map<AS, map<AS, TripletData>>>` of the C++ original
//! becomes a `BTreeMap` of `BTreeMap`s here so iteration is always in
//! ascending AS-id order without needing a separate sort step.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// An Autonomous System number.
pub type AS = u32;

/// The inferred (or preloaded) commercial relationship of a directed link.
///
/// Wire encoding matches the CAIDA relationship-file convention used both
/// for input preloads and for emitted output: `P2C=-1, P2P=0, C2P=1,
/// S2S=2, UNKNOWN=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rel {
    P2P,
    P2C,
    C2P,
    S2S,
    Unknown,
}

impl Rel {
    pub fn code(self) -> i8 {
        match self {
            Rel::P2P => 0,
            Rel::P2C => -1,
            Rel::C2P => 1,
            Rel::S2S => 2,
            Rel::Unknown => 3,
        }
    }

    pub fn from_code(code: i8) -> Option<Rel> {
        match code {
            0 => Some(Rel::P2P),
            -1 => Some(Rel::P2C),
            1 => Some(Rel::C2P),
            2 => Some(Rel::S2S),
            3 => Some(Rel::Unknown),
            _ => None,
        }
    }
}

impl Default for Rel {
    fn default() -> Self {
        Rel::Unknown
    }
}

/// Per directed ordered triple `x -> y -> z`, indexed here as
/// `Data[x].links[y].triplets[z]` (the link `x -> y`, keyed by the third AS
/// `z`). See spec.md §3 for the exact meaning of each field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripletData {
    pub upstream: bool,
    pub end_of_path: bool,
    pub two_edge_path: bool,
    pub count: u16,
}

impl TripletData {
    pub fn bump_count(&mut self) {
        self.count = self.count.saturating_add(1);
    }
}

/// Per directed link `x -> y`.
#[derive(Debug, Clone, Default)]
pub struct LinkData {
    pub triplets: BTreeMap<AS, TripletData>,
    pub transit: bool,
    pub relationship: Rel,
}

/// Per AS `x`.
#[derive(Debug, Clone, Default)]
pub struct ASData {
    pub links: BTreeMap<AS, LinkData>,
    pub customer_cone: BTreeSet<AS>,
    pub provider_cone: BTreeSet<AS>,
    pub visibility_as_vp: BTreeSet<AS>,
    pub transit_pairs: BTreeSet<(AS, AS)>,
    pub transit_degree: u32,
    pub rank: u32,
    pub in_clique: bool,
}

/// The engine's whole data set.
#[derive(Debug, Clone, Default)]
pub struct Data {
    pub ases: BTreeMap<AS, ASData>,
    pub as_by_rank: Vec<AS>,
}

impl Data {
    pub fn new() -> Self {
        Data::default()
    }

    pub fn len(&self) -> usize {
        self.ases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ases.is_empty()
    }

    /// Directed link `a -> b`, if it exists.
    pub fn link(&self, a: AS, b: AS) -> Option<&LinkData> {
        self.ases.get(&a)?.links.get(&b)
    }

    pub fn rank_of(&self, x: AS) -> u32 {
        self.ases.get(&x).map(|d| d.rank).unwrap_or(u32::MAX)
    }
}
