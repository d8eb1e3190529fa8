//! Bye selection and opponent matching.
//!
//! Every entry point takes its random source as a [`Draw`] so a seeded
//! generator or a [`ScriptedDraw`] reproduces the same round.

pub mod bye;
pub mod draw;
pub mod opponents;
pub mod round;

pub use bye::{ByeAssignment, assign_bye};
pub use draw::{Draw, ScriptedDraw};
pub use opponents::{PairingOutcome, assign_pairs};
pub use round::{RoundOutcome, pair_round, start_round};

use crate::model::player::PlayerId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    #[error("bye player {id} is not in the active set")]
    ByeNotActive { id: PlayerId },
    #[error("cannot pair an odd pool of {size} players")]
    OddPool { size: usize },
    #[error("player {id} is listed more than once in the active set")]
    DuplicateId { id: PlayerId },
    #[error("round {round} does not partition its players (offending id {id})")]
    PartitionBroken { round: u32, id: PlayerId },
}
