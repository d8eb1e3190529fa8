use crate::model::history::OpponentHistory;
use crate::model::player::{InvalidName, Player, PlayerId, PlayerStatus, check_name};

/// Players in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_players(players: Vec<Player>) -> Self {
        Self { players }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id() == id)
    }

    /// Next id is one past the highest ever registered, so ids are never reused.
    pub fn next_id(&self) -> PlayerId {
        self.players.iter().map(Player::id).max().unwrap_or(0) + 1
    }

    pub fn register(
        &mut self,
        first: &str,
        last: &str,
        chips: u32,
    ) -> Result<&Player, InvalidName> {
        check_name(first)?;
        check_name(last)?;
        let id = self.next_id();
        self.players.push(Player::new(id, first, last, chips));
        let index = self.players.len() - 1;
        Ok(&self.players[index])
    }

    pub fn active(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active())
    }

    pub fn withdrawn(&self) -> impl Iterator<Item = &Player> {
        self.players
            .iter()
            .filter(|p| p.status() == PlayerStatus::Withdrawn)
    }

    pub fn active_ids(&self) -> Vec<PlayerId> {
        self.active().map(Player::id).collect()
    }

    /// Chips held by every player, withdrawn ones included.
    pub fn total_chips(&self) -> u64 {
        self.players.iter().map(|p| u64::from(p.chips())).sum()
    }

    pub fn history(&self) -> OpponentHistory {
        let mut history = OpponentHistory::new();
        for player in &self.players {
            history.insert(player.id(), player.opponents().iter().copied());
        }
        history
    }

    /// Copies opponents from `history` onto the matching players. Ids without a
    /// roster entry are ignored.
    pub fn apply_history(&mut self, history: &OpponentHistory) {
        for player in &mut self.players {
            if let Some(opponents) = history.opponents(player.id()) {
                player.extend_opponents(opponents.iter().copied());
            }
        }
    }
}
