use crate::catalog::Catalog;
use crate::items::ItemId;
use crate::trainer::Trainer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Move slot value that selects Struggle.
pub const STRUGGLE_SLOT: i8 = -1;

/// A decision made by one trainer for one turn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // The slot refers to the move's position (0-3) in the active Pokémon's move list,
    // or STRUGGLE_SLOT.
    Attack { move_slot: i8 },

    // The index refers to the Pokémon's position (1-5) in the trainer's team.
    Switch { pokemon_index: usize },

    UseItem { item_id: ItemId, target_index: usize },

    Pass,
}

impl Action {
    pub const STRUGGLE: Action = Action::Attack {
        move_slot: STRUGGLE_SLOT,
    };

    pub fn is_struggle(&self) -> bool {
        matches!(self, Action::Attack { move_slot } if *move_slot < 0)
    }

    /// Ordering tier: switches and items go first, then attacks, Struggle
    /// and finally passing.
    pub fn tier(&self) -> u8 {
        match self {
            Action::Switch { .. } | Action::UseItem { .. } => 3,
            Action::Attack { move_slot } if *move_slot < 0 => 1,
            Action::Attack { .. } => 2,
            Action::Pass => 0,
        }
    }

    /// Human-readable description in the context of `trainer`'s team.
    pub fn describe(&self, trainer: &Trainer, catalog: &Catalog) -> String {
        match *self {
            Action::Attack { move_slot } if move_slot < 0 => "Use Struggle".to_string(),
            Action::Attack { move_slot } => {
                let name = trainer
                    .active()
                    .move_slot(move_slot as usize)
                    .and_then(|slot| catalog.move_(slot.move_id))
                    .map(|move_| move_.name.to_string())
                    .unwrap_or_else(|| format!("move slot {}", move_slot));
                format!("Use {}", name)
            }
            Action::Switch { pokemon_index } => match trainer.pokemon(pokemon_index) {
                Some(pokemon) => format!("Switch to {}", pokemon.surname()),
                None => format!("Switch to team slot {}", pokemon_index),
            },
            Action::UseItem {
                item_id,
                target_index,
            } => {
                let item = catalog
                    .item(item_id)
                    .map(|item| item.name.to_string())
                    .unwrap_or_else(|| format!("item {}", item_id.0));
                let target = trainer
                    .pokemon(target_index)
                    .map(|pokemon| pokemon.surname().to_string())
                    .unwrap_or_else(|| format!("team slot {}", target_index));
                format!("Use {} on {}", item, target)
            }
            Action::Pass => "Pass".to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Attack { move_slot } if *move_slot < 0 => write!(f, "Struggle"),
            Action::Attack { move_slot } => write!(f, "Attack(slot {})", move_slot),
            Action::Switch { pokemon_index } => write!(f, "Switch({})", pokemon_index),
            Action::UseItem {
                item_id,
                target_index,
            } => write!(f, "UseItem({} -> {})", item_id.0, target_index),
            Action::Pass => write!(f, "Pass"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Action::Switch { pokemon_index: 1 }, 3)]
    #[case(Action::UseItem { item_id: ItemId(0), target_index: 0 }, 3)]
    #[case(Action::Attack { move_slot: 2 }, 2)]
    #[case(Action::STRUGGLE, 1)]
    #[case(Action::Pass, 0)]
    fn test_action_tiers(#[case] action: Action, #[case] tier: u8) {
        assert_eq!(action.tier(), tier);
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::STRUGGLE.to_string(), "Struggle");
        assert!(Action::STRUGGLE.is_struggle());
        assert_eq!(Action::Attack { move_slot: 0 }.to_string(), "Attack(slot 0)");
        assert_eq!(Action::Pass.to_string(), "Pass");
    }
}
