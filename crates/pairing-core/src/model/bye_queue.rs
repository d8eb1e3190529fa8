use crate::model::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Ids that have sat out, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByeQueue {
    entries: VecDeque<PlayerId>,
}

impl ByeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.entries.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.entries.iter().copied()
    }

    pub fn push(&mut self, id: PlayerId) {
        self.entries.push_back(id);
    }

    /// Removes the oldest entry satisfying `eligible` and returns its id.
    pub fn take_oldest(&mut self, mut eligible: impl FnMut(PlayerId) -> bool) -> Option<PlayerId> {
        let position = self.entries.iter().position(|id| eligible(*id))?;
        self.entries.remove(position)
    }

    /// Drops every occurrence of `id`. Returns whether anything was removed.
    pub fn purge(&mut self, id: PlayerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| *entry != id);
        before != self.entries.len()
    }
}

impl FromIterator<PlayerId> for ByeQueue {
    fn from_iter<T: IntoIterator<Item = PlayerId>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ByeQueue;

    #[test]
    fn take_oldest_skips_ineligible_entries() {
        let mut queue: ByeQueue = [9, 2, 3].into_iter().collect();
        let taken = queue.take_oldest(|id| id != 9);
        assert_eq!(taken, Some(2));
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![9, 3]);
    }

    #[test]
    fn purge_removes_every_occurrence() {
        let mut queue: ByeQueue = [2, 3, 2, 4].into_iter().collect();
        assert!(queue.purge(2));
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![3, 4]);
        assert!(!queue.purge(7));
    }
}
