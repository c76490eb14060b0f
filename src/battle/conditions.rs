use crate::battle::damage::calculate_damage;
use crate::battle::state::{ActionFailureReason, BattleEvent, EventBus, TurnRng};
use crate::moves::Move;
use crate::pokemon::{PokemonInst, StatusCondition};
use schema::{StatusType, VolatileType};

const THAW_CHANCE: u8 = 20;
const FULL_PARALYSIS_CHANCE: u8 = 25;
const CONFUSION_SELF_HIT_CHANCE: u8 = 50;

/// Decide whether `pokemon` gets to execute its chosen attack this turn.
///
/// Persistent status is checked first, then confusion. Counters tick here,
/// so this must be called exactly once per attempted attack.
pub fn can_attack(
    pokemon: &mut PokemonInst,
    self_hit: &Move,
    rng: &mut TurnRng,
    events: &mut EventBus,
) -> bool {
    match pokemon.status() {
        StatusCondition::Fainted => return false,
        StatusCondition::Freeze => {
            if rng.chance(THAW_CHANCE, "Thaw Check") {
                pokemon.cure_status();
                events.push_with(|| BattleEvent::PokemonStatusRemoved {
                    target: pokemon.surname().clone(),
                    status: StatusType::Freeze,
                });
            } else {
                push_failure(pokemon, ActionFailureReason::IsFrozen, events);
                return false;
            }
        }
        StatusCondition::Sleep => {
            let remaining = pokemon.sleep_turns().saturating_sub(1);
            pokemon.set_sleep_turns(remaining);
            if remaining == 0 {
                pokemon.cure_status();
                events.push_with(|| BattleEvent::PokemonStatusRemoved {
                    target: pokemon.surname().clone(),
                    status: StatusType::Sleep,
                });
            } else {
                push_failure(pokemon, ActionFailureReason::IsAsleep, events);
                return false;
            }
        }
        StatusCondition::Paralysis => {
            if rng.chance(FULL_PARALYSIS_CHANCE, "Full Paralysis Check") {
                push_failure(pokemon, ActionFailureReason::IsParalyzed, events);
                return false;
            }
        }
        StatusCondition::Healthy | StatusCondition::Burn | StatusCondition::Poison => {}
    }

    if pokemon.is_confused() {
        let volatiles = pokemon.volatiles_mut();
        volatiles.confusion_turns -= 1;
        if volatiles.confusion_turns == 0 {
            events.push_with(|| BattleEvent::VolatileExpired {
                target: pokemon.surname().clone(),
                volatile: VolatileType::Confusion,
            });
            return true;
        }

        if rng.chance(CONFUSION_SELF_HIT_CHANCE, "Confusion Self-Hit Check") {
            push_failure(pokemon, ActionFailureReason::HurtItselfInConfusion, events);
            let roll = calculate_damage(self_hit, pokemon, pokemon, rng);
            let lost = pokemon.take_damage(roll.damage);
            events.push_with(|| BattleEvent::DamageDealt {
                target: pokemon.surname().clone(),
                damage: lost,
                remaining_hp: pokemon.hp(),
            });
            return false;
        }

        events.push_with(|| BattleEvent::Confused {
            pokemon: pokemon.surname().clone(),
        });
    }

    true
}

/// End-of-turn upkeep for one active Pokemon: burn and poison damage, then
/// the taunt countdown.
pub fn after_turn(pokemon: &mut PokemonInst, events: &mut EventBus) {
    if !pokemon.is_alive() {
        return;
    }

    if let Some(status @ (StatusType::Burn | StatusType::Poison)) = pokemon.status().as_status_type() {
        let damage = (pokemon.max_hp() / 8).max(1);
        let lost = pokemon.take_damage(damage);
        events.push_with(|| BattleEvent::PokemonStatusDamage {
            target: pokemon.surname().clone(),
            status,
            damage: lost,
        });
        events.push_with(|| BattleEvent::DamageDealt {
            target: pokemon.surname().clone(),
            damage: lost,
            remaining_hp: pokemon.hp(),
        });
    }

    if pokemon.is_taunted() {
        let volatiles = pokemon.volatiles_mut();
        volatiles.taunt_turns -= 1;
        if volatiles.taunt_turns == 0 {
            events.push_with(|| BattleEvent::VolatileExpired {
                target: pokemon.surname().clone(),
                volatile: VolatileType::Taunt,
            });
        }
    }
}

fn push_failure(pokemon: &PokemonInst, reason: ActionFailureReason, events: &mut EventBus) {
    events.push_with(|| BattleEvent::ActionFailed {
        pokemon: pokemon.surname().clone(),
        reason,
    });
}
