use crate::economy::{EconomyConfig, Payouts};
use crate::model::bye_queue::ByeQueue;
use crate::model::player::{InvalidName, Player, PlayerId, PlayerStatus};
use crate::model::roster::Roster;
use crate::model::round::Round;
use crate::pairing::{Draw, PairingError, RoundOutcome, start_round};
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("no player with id {id}")]
    UnknownPlayer { id: PlayerId },
    #[error("Chip count must be >= 0")]
    NegativeChipCount { value: i64 },
    #[error("Chip count must be <= {max}", max = u32::MAX)]
    ChipCountTooLarge { value: i64 },
    #[error("{0}")]
    InvalidName(#[from] InvalidName),
    #[error("no round with id {id}")]
    RoundNotFound { id: u32 },
    #[error("{0}")]
    Pairing(#[from] PairingError),
}

/// Side effects of a roster change that callers may need to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RosterChange {
    pub byes_changed: bool,
}

/// Roster, round history and bye queue for one event.
#[derive(Debug, Clone)]
pub struct EventState {
    roster: Roster,
    rounds: Vec<Round>,
    byes: ByeQueue,
    economy: EconomyConfig,
}

impl EventState {
    pub fn new(economy: EconomyConfig) -> Self {
        Self::from_parts(Roster::new(), Vec::new(), ByeQueue::new(), economy)
    }

    pub fn from_parts(
        roster: Roster,
        rounds: Vec<Round>,
        byes: ByeQueue,
        economy: EconomyConfig,
    ) -> Self {
        Self {
            roster,
            rounds,
            byes,
            economy,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn byes(&self) -> &ByeQueue {
        &self.byes
    }

    pub fn economy(&self) -> &EconomyConfig {
        &self.economy
    }

    pub fn round(&self, id: u32) -> Result<&Round, EventError> {
        self.rounds
            .iter()
            .find(|round| round.id() == id)
            .ok_or(EventError::RoundNotFound { id })
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn total_chips(&self) -> u64 {
        self.roster.total_chips()
    }

    pub fn payouts(&self) -> Payouts {
        Payouts::compute(&self.roster, &self.economy)
    }

    /// Adds a player holding the configured buy-in.
    pub fn register(&mut self, first: &str, last: &str) -> Result<&Player, EventError> {
        let chips = self.economy.buy_in_chip_count;
        let player = self.roster.register(first, last, chips)?;
        event!(
            target: "pairing_core::roster",
            Level::INFO,
            id = player.id(),
            action = "register"
        );
        Ok(player)
    }

    /// Marks a player withdrawn and drops them from the bye queue.
    pub fn withdraw(&mut self, id: PlayerId) -> Result<RosterChange, EventError> {
        let player = self
            .roster
            .get_mut(id)
            .ok_or(EventError::UnknownPlayer { id })?;
        player.set_status(PlayerStatus::Withdrawn);
        let byes_changed = self.byes.purge(id);
        event!(
            target: "pairing_core::roster",
            Level::INFO,
            id,
            action = "withdraw",
            byes_changed
        );
        Ok(RosterChange { byes_changed })
    }

    /// Reactivates a player with `chips`, or the buy-in when omitted.
    pub fn buy_back(&mut self, id: PlayerId, chips: Option<u32>) -> Result<(), EventError> {
        let buy_in = self.economy.buy_in_chip_count;
        let player = self
            .roster
            .get_mut(id)
            .ok_or(EventError::UnknownPlayer { id })?;
        player.set_status(PlayerStatus::Active);
        player.set_chips(chips.unwrap_or(buy_in));
        event!(
            target: "pairing_core::roster",
            Level::INFO,
            id,
            action = "buy_back",
            chips = player.chips()
        );
        Ok(())
    }

    /// Records a reported chip count. Reporting zero knocks the player out.
    pub fn report_chips(&mut self, id: PlayerId, value: i64) -> Result<RosterChange, EventError> {
        if value < 0 {
            return Err(EventError::NegativeChipCount { value });
        }
        let chips =
            u32::try_from(value).map_err(|_| EventError::ChipCountTooLarge { value })?;
        let player = self
            .roster
            .get_mut(id)
            .ok_or(EventError::UnknownPlayer { id })?;
        player.set_chips(chips);

        if chips == 0 {
            return self.withdraw(id);
        }
        Ok(RosterChange::default())
    }

    /// Pairs every active player for the next round and records it.
    pub fn start_round<D: Draw + ?Sized>(&mut self, draw: &mut D) -> Result<&Round, EventError> {
        let round_id = u32::try_from(self.rounds.len() + 1).unwrap_or(u32::MAX);
        let active = self.roster.active_ids();
        let history = self.roster.history();

        let RoundOutcome {
            round,
            queue,
            history,
            ..
        } = start_round(round_id, &active, &self.byes, &history, draw)?;

        self.roster.apply_history(&history);
        self.byes = queue;
        self.rounds.push(round);
        self.round(round_id)
    }
}
