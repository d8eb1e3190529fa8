use crate::model::player::PlayerId;
use crate::pairing::PairingError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Two players matched for a round, in the order they were drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub first: PlayerId,
    pub second: PlayerId,
}

impl Pair {
    pub const fn new(first: PlayerId, second: PlayerId) -> Self {
        Self { first, second }
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.first == id || self.second == id
    }

    /// Order-independent form used when comparing pairs across rounds.
    pub fn normalized(&self) -> (PlayerId, PlayerId) {
        if self.first <= self.second {
            (self.first, self.second)
        } else {
            (self.second, self.first)
        }
    }
}

impl From<(PlayerId, PlayerId)> for Pair {
    fn from((first, second): (PlayerId, PlayerId)) -> Self {
        Pair::new(first, second)
    }
}

/// Immutable record of one pairing event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    id: u32,
    active: Vec<PlayerId>,
    bye: Option<PlayerId>,
    pairs: Vec<Pair>,
}

impl Round {
    pub fn new(id: u32, active: Vec<PlayerId>, bye: Option<PlayerId>, pairs: Vec<Pair>) -> Self {
        Self {
            id,
            active,
            bye,
            pairs,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn active(&self) -> &[PlayerId] {
        &self.active
    }

    pub fn bye(&self) -> Option<PlayerId> {
        self.bye
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Every non-bye active id must appear in exactly one pair, and nothing else may.
    pub fn check_partition(&self) -> Result<(), PairingError> {
        if let Some(bye) = self.bye
            && !self.active.contains(&bye)
        {
            return Err(PairingError::ByeNotActive { id: bye });
        }

        let expected: HashSet<PlayerId> = self
            .active
            .iter()
            .copied()
            .filter(|id| Some(*id) != self.bye)
            .collect();

        let mut seen = HashSet::with_capacity(expected.len());
        for pair in &self.pairs {
            for id in [pair.first, pair.second] {
                if !expected.contains(&id) || !seen.insert(id) {
                    return Err(PairingError::PartitionBroken {
                        round: self.id,
                        id,
                    });
                }
            }
        }

        if let Some(missing) = expected.iter().copied().find(|id| !seen.contains(id)) {
            return Err(PairingError::PartitionBroken {
                round: self.id,
                id: missing,
            });
        }

        Ok(())
    }
}
