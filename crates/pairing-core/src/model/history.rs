use crate::model::player::PlayerId;
use std::collections::{BTreeMap, BTreeSet};

/// Per-player record of opponents already faced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpponentHistory {
    faced: BTreeMap<PlayerId, BTreeSet<PlayerId>>,
}

impl OpponentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opponents(&self, id: PlayerId) -> Option<&BTreeSet<PlayerId>> {
        self.faced.get(&id)
    }

    pub fn has_faced(&self, a: PlayerId, b: PlayerId) -> bool {
        self.faced.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// Inserts one direction only. Used when rebuilding from stored players,
    /// whose records each carry their own side.
    pub fn insert(&mut self, id: PlayerId, opponents: impl IntoIterator<Item = PlayerId>) {
        self.faced.entry(id).or_default().extend(opponents);
    }

    /// Records a match in both directions.
    pub fn record(&mut self, a: PlayerId, b: PlayerId) {
        self.faced.entry(a).or_default().insert(b);
        self.faced.entry(b).or_default().insert(a);
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &BTreeSet<PlayerId>)> {
        self.faced.iter().map(|(id, set)| (*id, set))
    }

    /// Returns the first `(a, b)` where `b` is listed for `a` but not vice versa.
    pub fn asymmetry(&self) -> Option<(PlayerId, PlayerId)> {
        self.iter().find_map(|(a, set)| {
            set.iter()
                .copied()
                .find(|b| !self.has_faced(*b, a))
                .map(|b| (a, b))
        })
    }

    pub fn is_symmetric(&self) -> bool {
        self.asymmetry().is_none()
    }
}
