use crate::model::bye_queue::ByeQueue;
use crate::model::history::OpponentHistory;
use crate::model::player::PlayerId;
use crate::model::round::{Pair, Round};
use crate::pairing::PairingError;
use crate::pairing::bye::assign_bye;
use crate::pairing::draw::Draw;
use crate::pairing::opponents::assign_pairs;
use std::collections::HashSet;
use tracing::{Level, event};

/// Everything a started round changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub round: Round,
    pub queue: ByeQueue,
    pub history: OpponentHistory,
    pub bye_rotated: bool,
    pub forced_rematches: Vec<Pair>,
}

/// Chooses a bye when `active` is odd, then pairs everyone else.
pub fn start_round<D: Draw + ?Sized>(
    round_id: u32,
    active: &[PlayerId],
    queue: &ByeQueue,
    history: &OpponentHistory,
    draw: &mut D,
) -> Result<RoundOutcome, PairingError> {
    check_unique(active)?;

    let (bye, queue, bye_rotated) = if active.len() % 2 == 1 {
        match assign_bye(active, queue, draw) {
            Some(assignment) => (
                Some(assignment.bye),
                assignment.queue,
                assignment.rotated,
            ),
            None => (None, queue.clone(), false),
        }
    } else {
        (None, queue.clone(), false)
    };

    let (pairs, history, forced_rematches) = pair_round(active, bye, history, draw)?;
    let round = Round::new(round_id, active.to_vec(), bye, pairs);
    round.check_partition()?;

    event!(
        target: "pairing_core::round",
        Level::INFO,
        round = round_id,
        players = active.len(),
        bye = ?bye,
        pairs = round.pairs().len(),
        bye_rotated,
        forced_rematches = forced_rematches.len()
    );

    Ok(RoundOutcome {
        round,
        queue,
        history,
        bye_rotated,
        forced_rematches,
    })
}

/// Pairs `active` minus an already chosen `bye`.
///
/// Rejects a bye outside the active set and an odd pool instead of leaving a
/// player unpaired.
pub fn pair_round<D: Draw + ?Sized>(
    active: &[PlayerId],
    bye: Option<PlayerId>,
    history: &OpponentHistory,
    draw: &mut D,
) -> Result<(Vec<Pair>, OpponentHistory, Vec<Pair>), PairingError> {
    check_unique(active)?;

    if let Some(id) = bye
        && !active.contains(&id)
    {
        return Err(PairingError::ByeNotActive { id });
    }

    let pool: Vec<PlayerId> = active
        .iter()
        .copied()
        .filter(|id| Some(*id) != bye)
        .collect();

    if pool.len() % 2 == 1 {
        return Err(PairingError::OddPool { size: pool.len() });
    }

    let outcome = assign_pairs(&pool, history, draw);
    Ok((outcome.pairs, outcome.history, outcome.forced_rematches))
}

fn check_unique(active: &[PlayerId]) -> Result<(), PairingError> {
    let mut seen = HashSet::with_capacity(active.len());
    match active.iter().copied().find(|id| !seen.insert(*id)) {
        Some(id) => Err(PairingError::DuplicateId { id }),
        None => Ok(()),
    }
}
