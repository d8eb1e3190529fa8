use crate::model::history::OpponentHistory;
use crate::model::player::PlayerId;
use crate::model::round::Pair;
use crate::pairing::draw::Draw;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingOutcome {
    pub pairs: Vec<Pair>,
    pub history: OpponentHistory,
    /// Left over when the pool had an odd size.
    pub unpaired: Option<PlayerId>,
    /// Pairs made although both players had already met.
    pub forced_rematches: Vec<Pair>,
}

impl PairingOutcome {
    pub fn is_degraded(&self) -> bool {
        self.unpaired.is_some() || !self.forced_rematches.is_empty()
    }
}

/// Greedy randomized matching that prefers opponents not yet faced.
///
/// A player is drawn from the pool, then a partner is drawn among the
/// remaining players they have not met. With a single fresh candidate no draw
/// is spent; with none, the first remaining player is taken as a rematch.
/// `history` is left untouched; the returned outcome carries the updated copy.
pub fn assign_pairs<D: Draw + ?Sized>(
    pool: &[PlayerId],
    history: &OpponentHistory,
    draw: &mut D,
) -> PairingOutcome {
    let mut remaining = pool.to_vec();
    let mut history = history.clone();
    let mut pairs = Vec::with_capacity(remaining.len() / 2);
    let mut forced_rematches = Vec::new();

    while remaining.len() >= 2 {
        let a = remaining.remove(draw.index(remaining.len()));

        let fresh: Vec<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, id)| !history.has_faced(a, **id))
            .map(|(idx, _)| idx)
            .collect();

        let (position, forced) = match fresh.len() {
            0 => (0, true),
            1 => (fresh[0], false),
            len => (fresh[draw.index(len)], false),
        };

        let b = remaining.remove(position);
        let pair = Pair::new(a, b);
        history.record(a, b);

        if forced {
            tracing::warn!(
                target: "pairing_core::pairs",
                a,
                b,
                reason = "forced_rematch",
                message = "no fresh opponent left; pairing a rematch"
            );
            forced_rematches.push(pair);
        } else {
            event!(target: "pairing_core::pairs", Level::TRACE, a, b);
        }

        pairs.push(pair);
    }

    let unpaired = remaining.pop();
    if let Some(id) = unpaired {
        tracing::warn!(
            target: "pairing_core::pairs",
            id,
            reason = "odd_pool",
            message = "odd pool; player left without an opponent"
        );
    }

    PairingOutcome {
        pairs,
        history,
        unpaired,
        forced_rematches,
    }
}
