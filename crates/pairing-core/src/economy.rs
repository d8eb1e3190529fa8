use crate::model::player::PlayerId;
use crate::model::roster::Roster;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUY_IN_CHIPS: u32 = 10;
pub const DEFAULT_CHIP_VALUE: u32 = 10;

/// Chip economy settings for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyConfig {
    #[serde(default = "default_buy_in")]
    pub buy_in_chip_count: u32,
    #[serde(default = "default_chip_value")]
    pub chip_value: u32,
    /// Flat amount kept by the room before payouts.
    #[serde(default)]
    pub fees: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            buy_in_chip_count: DEFAULT_BUY_IN_CHIPS,
            chip_value: DEFAULT_CHIP_VALUE,
            fees: 0,
        }
    }
}

fn default_buy_in() -> u32 {
    DEFAULT_BUY_IN_CHIPS
}

fn default_chip_value() -> u32 {
    DEFAULT_CHIP_VALUE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub id: PlayerId,
    pub name: String,
    pub chips: u32,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payouts {
    pub entries: Vec<Payout>,
    pub total_chips: u64,
    pub total_pot: u64,
    pub net_pot: u64,
}

impl Payouts {
    /// Splits the pot after fees among active players in proportion to their
    /// chips, rounding each share down.
    pub fn compute(roster: &Roster, economy: &EconomyConfig) -> Self {
        let total_chips = roster.total_chips();
        let total_pot = total_chips * u64::from(economy.chip_value);
        let net_pot = total_pot.saturating_sub(u64::from(economy.fees));

        let entries = roster
            .active()
            .map(|player| {
                let chips = u64::from(player.chips());
                let amount = if total_chips == 0 {
                    0
                } else {
                    chips * net_pot / total_chips
                };
                Payout {
                    id: player.id(),
                    name: player.full_name(),
                    chips: player.chips(),
                    amount,
                }
            })
            .collect();

        Self {
            entries,
            total_chips,
            total_pot,
            net_pot,
        }
    }
}
