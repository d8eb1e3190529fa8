use crate::model::bye_queue::ByeQueue;
use crate::model::player::PlayerId;
use crate::pairing::draw::Draw;
use tracing::{Level, event};

/// Result of choosing who sits out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByeAssignment {
    pub bye: PlayerId,
    pub queue: ByeQueue,
    /// Every active player had already sat out, so the oldest one repeats.
    pub rotated: bool,
}

/// Picks the bye for a round among `active`.
///
/// Players who have never sat out are drawn uniformly. Once everyone active is
/// in the queue, the oldest active entry is moved to the back instead. Entries
/// for players no longer active are skipped and left where they are.
///
/// Returns `None` only for an empty active set.
pub fn assign_bye<D: Draw + ?Sized>(
    active: &[PlayerId],
    queue: &ByeQueue,
    draw: &mut D,
) -> Option<ByeAssignment> {
    if active.is_empty() {
        return None;
    }

    let mut queue = queue.clone();
    let candidates: Vec<PlayerId> = active
        .iter()
        .copied()
        .filter(|id| !queue.contains(*id))
        .collect();

    let (bye, rotated) = if candidates.is_empty() {
        let oldest = queue
            .take_oldest(|id| active.contains(&id))
            .unwrap_or(active[0]);
        tracing::warn!(
            target: "pairing_core::bye",
            bye = oldest,
            queue_len = queue.len() + 1,
            reason = "bye_rotation",
            message = "every active player has sat out; rotating oldest bye"
        );
        (oldest, true)
    } else {
        let chosen = candidates[draw.index(candidates.len())];
        event!(
            target: "pairing_core::bye",
            Level::DEBUG,
            bye = chosen,
            candidates = candidates.len()
        );
        (chosen, false)
    };

    queue.push(bye);
    Some(ByeAssignment {
        bye,
        queue,
        rotated,
    })
}
