use crate::battle::state::{BattleEvent, EventBus};
use crate::errors::{CatalogError, CatalogResult};
use crate::pokemon::{PokemonInst, StatusCondition};
use schema::{ItemCategory, ItemDefinition, ItemEffectDefinition, StatusType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Dense index of an item inside its catalog; also the inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u16);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemEffect {
    HealHp(u16),
    /// `None` cures every status.
    CureStatus(Option<Vec<StatusType>>),
    Revive(u8),
}

impl ItemEffect {
    pub fn can_use(&self, target: &PokemonInst) -> bool {
        match self {
            ItemEffect::HealHp(_) => target.is_alive() && target.hp() < target.max_hp(),
            ItemEffect::CureStatus(cures) => match target.status().as_status_type() {
                Some(status) if target.is_alive() => {
                    cures.as_ref().map_or(true, |cures| cures.contains(&status))
                }
                _ => false,
            },
            ItemEffect::Revive(_) => target.status() == StatusCondition::Fainted,
        }
    }

    fn apply(&self, target: &mut PokemonInst, events: &mut EventBus) {
        match self {
            ItemEffect::HealHp(amount) => {
                let recovered = target.heal(*amount);
                events.push_with(|| BattleEvent::PokemonHealed {
                    target: target.surname().clone(),
                    amount: recovered,
                });
            }
            ItemEffect::CureStatus(_) => {
                let cured = target.status().as_status_type();
                target.cure_status();
                if let Some(status) = cured {
                    events.push_with(|| BattleEvent::PokemonStatusRemoved {
                        target: target.surname().clone(),
                        status,
                    });
                }
            }
            ItemEffect::Revive(percent) => {
                target.revive(*percent);
                events.push_with(|| BattleEvent::PokemonRevived {
                    target: target.surname().clone(),
                });
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: Arc<str>,
    pub category: ItemCategory,
    pub description: Arc<str>,
    pub effect: ItemEffect,
}

impl Item {
    /// Validate a definition and resolve it into an item.
    pub fn from_definition(definition: &ItemDefinition) -> CatalogResult<Self> {
        let invalid = |reason: &str| CatalogError::Invalid {
            kind: "item",
            name: definition.name.clone(),
            reason: reason.to_string(),
        };

        if definition.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        let effect = match &definition.effect {
            ItemEffectDefinition::HealHp(0) => return Err(invalid("heal amount must be positive")),
            ItemEffectDefinition::HealHp(amount) => ItemEffect::HealHp(*amount),
            ItemEffectDefinition::CureStatus(Some(cures)) if cures.is_empty() => {
                return Err(invalid("cure list must not be empty"));
            }
            ItemEffectDefinition::CureStatus(cures) => ItemEffect::CureStatus(cures.clone()),
            ItemEffectDefinition::Revive(percent) if *percent == 0 || *percent > 100 => {
                return Err(invalid("revive percent must be within 1..=100"));
            }
            ItemEffectDefinition::Revive(percent) => ItemEffect::Revive(*percent),
        };

        Ok(Self {
            id: ItemId(definition.id),
            name: Arc::from(definition.name.as_str()),
            category: definition.category,
            description: Arc::from(definition.description.as_str()),
            effect,
        })
    }

    /// Whether using the item on `target` would have any effect.
    pub fn can_use(&self, target: &PokemonInst) -> bool {
        self.effect.can_use(target)
    }

    /// Apply the item to `target`. Does nothing when the item is not usable.
    pub fn apply(&self, target: &mut PokemonInst, events: &mut EventBus) {
        if self.can_use(target) {
            self.effect.apply(target, events);
        }
    }

    /// Use the item on `target`, returning whether it took effect.
    pub fn use_on(&self, target: &mut PokemonInst, events: &mut EventBus) -> bool {
        if !self.can_use(target) {
            events.push(BattleEvent::ItemHadNoEffect);
            return false;
        }
        self.effect.apply(target, events);
        true
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.category, self.description)
    }
}
