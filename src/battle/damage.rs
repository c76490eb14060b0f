use crate::battle::state::{BattleEvent, EventBus, TurnRng};
use crate::battle::stats::{effective_attack, effective_defense, hit_threshold};
use crate::moves::{Move, MoveKind};
use crate::pokemon::{PokemonInst, StatusCondition};
use crate::type_chart;
use schema::{StatType, StatusType, Target, VolatileType};

const CRITICAL_HIT_RATE: f64 = 1.0 / 16.0;
const CRITICAL_HIT_MULTIPLIER: f64 = 1.5;
const STAB_MULTIPLIER: f64 = 1.5;
const RANDOM_FACTOR_FLOOR: f64 = 0.85;

/// Outcome of one damage calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub damage: u16,
    /// Level, power and stat part of the formula before any multiplier.
    pub base_damage: u16,
    pub critical: bool,
    pub stab: bool,
    pub effectiveness: f64,
    /// False only when the accuracy check failed.
    pub hit: bool,
}

impl DamageRoll {
    /// The roll of a move that does not deal damage.
    pub const NO_DAMAGE: DamageRoll = DamageRoll {
        damage: 0,
        base_damage: 0,
        critical: false,
        stab: false,
        effectiveness: 1.0,
        hit: true,
    };

    /// Whether the move connected with a target that is not immune to it.
    pub fn landed(&self) -> bool {
        self.hit && self.effectiveness > 0.0
    }
}

/// Roll the damage `move_` deals from `user` to `target`.
///
/// Random draws happen in a fixed order: accuracy, random factor, critical.
/// A miss stops after the accuracy draw. Moves without power only roll
/// accuracy, and only when they aim at the target and can miss.
pub fn calculate_damage(
    move_: &Move,
    user: &PokemonInst,
    target: &PokemonInst,
    rng: &mut TurnRng,
) -> DamageRoll {
    if !move_.deals_damage() {
        return status_accuracy(move_, user, rng);
    }

    let effectiveness = type_chart::effectiveness(move_.element, target.types());
    let stab = user.has_type(move_.element);

    let threshold = hit_threshold(move_.accuracy, user.stage(StatType::Acc));
    if rng.next_unit("Accuracy Check") >= threshold {
        return DamageRoll {
            damage: 0,
            base_damage: 0,
            critical: false,
            stab,
            effectiveness,
            hit: false,
        };
    }

    let attack = f64::from(effective_attack(user, move_.category));
    let defense = f64::from(effective_defense(target, move_.category).max(1));
    let base = user.level_factor() * f64::from(move_.power) * attack / defense / 50.0 + 2.0;

    let random_factor = RANDOM_FACTOR_FLOOR + (1.0 - RANDOM_FACTOR_FLOOR) * rng.next_unit("Damage Variance");
    let critical = rng.next_unit("Critical Hit Check") < CRITICAL_HIT_RATE;

    let mut damage = base * random_factor * effectiveness;
    if critical {
        damage *= CRITICAL_HIT_MULTIPLIER;
    }
    if stab {
        damage *= STAB_MULTIPLIER;
    }

    DamageRoll {
        damage: damage.min(f64::from(u16::MAX)) as u16,
        base_damage: base as u16,
        critical,
        stab,
        effectiveness,
        hit: true,
    }
}

fn status_accuracy(move_: &Move, user: &PokemonInst, rng: &mut TurnRng) -> DamageRoll {
    let self_targeted = matches!(
        move_.kind,
        MoveKind::StatChange {
            target: Target::User,
            ..
        }
    );
    let threshold = hit_threshold(move_.accuracy, user.stage(StatType::Acc));
    if self_targeted || threshold >= 1.0 {
        return DamageRoll::NO_DAMAGE;
    }

    DamageRoll {
        hit: rng.next_unit("Accuracy Check") < threshold,
        ..DamageRoll::NO_DAMAGE
    }
}

/// Apply the non-damage part of `move_` after its damage has been dealt.
pub fn secondary_effect(
    move_: &Move,
    user: &mut PokemonInst,
    target: &mut PokemonInst,
    roll: &DamageRoll,
    rng: &mut TurnRng,
    events: &mut EventBus,
) {
    match move_.kind {
        MoveKind::Damage => {}

        MoveKind::StatChange {
            target: side,
            stat,
            stages,
            chance,
        } => {
            if !roll.landed() {
                return;
            }
            let affected = match side {
                Target::User => user,
                Target::Target => target,
            };
            if !affected.is_alive() || !rng.chance(chance, "Stat Change Chance") {
                return;
            }
            change_stage(affected, stat, stages, events);
        }

        MoveKind::InflictStatus {
            status,
            volatile,
            chance,
            duration,
        } => {
            if !roll.landed() || !target.is_alive() || !rng.chance(chance, "Status Chance") {
                return;
            }

            let mut applied = false;
            if let Some(status) = status {
                applied |= inflict_status(target, status, duration, rng, events);
            }
            if let Some(volatile) = volatile {
                applied |= inflict_volatile(target, volatile, duration, rng, events);
            }

            if !applied && move_.is_status() {
                events.push(BattleEvent::MoveFailed);
            }
        }

        MoveKind::Recoil { percent } => {
            if roll.damage == 0 || !user.is_alive() {
                return;
            }
            let recoil = (u32::from(roll.damage) * u32::from(percent) / 100).max(1);
            take_recoil(user, recoil.min(u32::from(u16::MAX)) as u16, events);
        }

        MoveKind::Struggle => {
            if !user.is_alive() {
                return;
            }
            let recoil = (user.max_hp() / 4).max(1);
            take_recoil(user, recoil, events);
        }
    }
}

fn change_stage(pokemon: &mut PokemonInst, stat: StatType, delta: i8, events: &mut EventBus) {
    if pokemon.apply_stage(stat, delta) {
        events.push_with(|| BattleEvent::StatStageChanged {
            target: pokemon.surname().clone(),
            stat,
            delta,
        });
    } else {
        events.push_with(|| BattleEvent::StatChangeBlocked {
            target: pokemon.surname().clone(),
            stat,
            rising: delta > 0,
        });
    }
}

fn inflict_status(
    target: &mut PokemonInst,
    status: StatusType,
    duration: (u8, u8),
    rng: &mut TurnRng,
    events: &mut EventBus,
) -> bool {
    if target.status() != StatusCondition::Healthy {
        return false;
    }
    let sleep_turns = if status == StatusType::Sleep {
        rng.range_inclusive(duration.0, duration.1, "Sleep Duration")
    } else {
        0
    };
    let applied = target.inflict_status(status, sleep_turns);
    if applied {
        events.push_with(|| BattleEvent::PokemonStatusApplied {
            target: target.surname().clone(),
            status,
        });
    }
    applied
}

fn inflict_volatile(
    target: &mut PokemonInst,
    volatile: VolatileType,
    duration: (u8, u8),
    rng: &mut TurnRng,
    events: &mut EventBus,
) -> bool {
    let already_set = match volatile {
        VolatileType::Confusion => target.is_confused(),
        VolatileType::Taunt => target.is_taunted(),
    };
    if already_set {
        return false;
    }
    let turns = rng.range_inclusive(duration.0, duration.1, "Volatile Duration");
    let applied = match volatile {
        VolatileType::Confusion => target.confuse(turns),
        VolatileType::Taunt => target.taunt(turns),
    };
    if applied {
        events.push_with(|| BattleEvent::VolatileApplied {
            target: target.surname().clone(),
            volatile,
        });
    }
    applied
}

fn take_recoil(user: &mut PokemonInst, recoil: u16, events: &mut EventBus) {
    let lost = user.take_damage(recoil);
    events.push_with(|| BattleEvent::RecoilDamage {
        pokemon: user.surname().clone(),
        damage: lost,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveId;
    use crate::species::{Species, SpeciesId};
    use pretty_assertions::assert_eq;
    use schema::{BaseStats, ElementalType, MoveCategory};
    use std::sync::Arc;

    fn species(name: &str, types: (ElementalType, ElementalType)) -> Species {
        Species {
            id: SpeciesId(0),
            name: Arc::from(name),
            types,
            base_stats: BaseStats {
                hp: 80,
                attack: 80,
                defense: 80,
                sp_attack: 80,
                sp_defense: 80,
                speed: 80,
            },
            default_moves: vec![],
        }
    }

    fn pokemon(name: &str, element: ElementalType) -> PokemonInst {
        PokemonInst::new(&species(name, (element, element)), 50, &[], None, None, None)
            .expect("valid pokemon")
    }

    fn move_with(element: ElementalType, power: u8, accuracy: u8, kind: MoveKind) -> Move {
        Move {
            id: MoveId(0),
            name: Arc::from("Test Move"),
            category: if power == 0 {
                MoveCategory::Status
            } else {
                MoveCategory::Physical
            },
            element,
            power,
            accuracy,
            max_pp: 10,
            priority: 0,
            kind,
        }
    }

    fn sleep_powder() -> Move {
        move_with(
            ElementalType::Grass,
            0,
            75,
            MoveKind::InflictStatus {
                status: Some(StatusType::Sleep),
                volatile: None,
                chance: 100,
                duration: (2, 4),
            },
        )
    }

    #[test]
    fn test_status_move_accuracy_gates_the_effect() {
        let user = pokemon("User", ElementalType::Grass);
        let target = pokemon("Target", ElementalType::Normal);

        let hit = calculate_damage(&sleep_powder(), &user, &target, &mut TurnRng::new_for_test(vec![75]));
        let miss = calculate_damage(&sleep_powder(), &user, &target, &mut TurnRng::new_for_test(vec![76]));

        assert!(hit.hit);
        assert_eq!(hit.damage, 0);
        assert!(!miss.hit);
        assert!(!miss.landed());
    }

    #[test]
    fn test_self_targeted_moves_never_miss() {
        let mut user = pokemon("User", ElementalType::Normal);
        user.apply_stage(StatType::Acc, -6);
        let target = pokemon("Target", ElementalType::Normal);
        let swords_dance = move_with(
            ElementalType::Normal,
            0,
            100,
            MoveKind::StatChange {
                target: Target::User,
                stat: StatType::Atk,
                stages: 2,
                chance: 100,
            },
        );
        let mut rng = TurnRng::new_for_test(vec![]);

        let roll = calculate_damage(&swords_dance, &user, &target, &mut rng);

        assert_eq!(roll, DamageRoll::NO_DAMAGE);
    }

    #[test]
    fn test_certain_status_moves_draw_nothing() {
        let user = pokemon("User", ElementalType::Normal);
        let target = pokemon("Target", ElementalType::Normal);
        let growl = move_with(
            ElementalType::Normal,
            0,
            100,
            MoveKind::StatChange {
                target: Target::Target,
                stat: StatType::Atk,
                stages: -1,
                chance: 100,
            },
        );
        let mut rng = TurnRng::new_for_test(vec![]);

        let roll = calculate_damage(&growl, &user, &target, &mut rng);

        assert_eq!(roll, DamageRoll::NO_DAMAGE);
    }

    #[test]
    fn test_miss_reports_effectiveness_and_stab() {
        let user = pokemon("User", ElementalType::Water);
        let target = pokemon("Target", ElementalType::Fire);
        let hydro_pump = move_with(ElementalType::Water, 120, 80, MoveKind::Damage);
        let mut rng = TurnRng::new_for_test(vec![81]);

        let roll = calculate_damage(&hydro_pump, &user, &target, &mut rng);

        assert!(!roll.hit);
        assert_eq!(roll.damage, 0);
        assert!(roll.stab);
        assert!((roll.effectiveness - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_damage_formula_with_all_multipliers() {
        // Arrange
        let user = pokemon("User", ElementalType::Water);
        let target = pokemon("Target", ElementalType::Fire);
        let water_gun = move_with(ElementalType::Water, 40, 100, MoveKind::Damage);
        // hit, factor = 0.85 exactly, critical
        let mut rng = TurnRng::new_for_test(vec![1, 1, 1]);

        // Act
        let roll = calculate_damage(&water_gun, &user, &target, &mut rng);

        // Assert
        // base = 22 * 40 * 1 / 50 + 2 = 19.6
        let expected = 19.6 * 0.85 * 2.0 * 1.5 * 1.5;
        assert!(roll.hit);
        assert!(roll.critical);
        assert!(roll.stab);
        assert_eq!(roll.base_damage, 19);
        assert_eq!(roll.damage, expected as u16);
    }

    #[test]
    fn test_immune_target_takes_no_damage() {
        let user = pokemon("User", ElementalType::Normal);
        let target = pokemon("Target", ElementalType::Ghost);
        let tackle = move_with(ElementalType::Normal, 35, 100, MoveKind::Damage);
        let mut rng = TurnRng::new_for_test(vec![1, 50, 50]);

        let roll = calculate_damage(&tackle, &user, &target, &mut rng);

        assert_eq!(roll.damage, 0);
        assert!(!roll.landed());
    }

    #[test]
    fn test_burn_does_not_weaken_physical_attacks() {
        let healthy = pokemon("User", ElementalType::Normal);
        let mut burned = healthy.clone();
        assert!(burned.inflict_status(StatusType::Burn, 0));
        let target = pokemon("Target", ElementalType::Water);
        let tackle = move_with(ElementalType::Normal, 35, 100, MoveKind::Damage);

        let healthy_roll = calculate_damage(&tackle, &healthy, &target, &mut TurnRng::new_for_test(vec![50, 50, 50]));
        let burned_roll = calculate_damage(&tackle, &burned, &target, &mut TurnRng::new_for_test(vec![50, 50, 50]));

        assert!(healthy_roll.damage > 0);
        assert_eq!(burned_roll.damage, healthy_roll.damage);
    }

    #[test]
    fn test_sharp_stat_drop_and_blocked_raise() {
        let mut user = pokemon("User", ElementalType::Normal);
        let mut target = pokemon("Target", ElementalType::Normal);
        let screech = move_with(
            ElementalType::Normal,
            0,
            100,
            MoveKind::StatChange {
                target: Target::Target,
                stat: StatType::Def,
                stages: -2,
                chance: 100,
            },
        );
        let mut rng = TurnRng::new_for_test(vec![]);
        let mut events = EventBus::new();

        secondary_effect(&screech, &mut user, &mut target, &DamageRoll::NO_DAMAGE, &mut rng, &mut events);
        target.apply_stage(StatType::Def, -6);
        secondary_effect(&screech, &mut user, &mut target, &DamageRoll::NO_DAMAGE, &mut rng, &mut events);

        assert_eq!(target.stage(StatType::Def), -6);
        assert_eq!(
            events.messages(),
            vec!["Target's Defense sharply fell!", "Target's Defense won't go any lower!"]
        );
    }

    #[test]
    fn test_status_move_fails_on_statused_target() {
        let mut user = pokemon("User", ElementalType::Grass);
        let mut target = pokemon("Target", ElementalType::Normal);
        let sleep_powder = move_with(
            ElementalType::Grass,
            0,
            75,
            MoveKind::InflictStatus {
                status: Some(StatusType::Sleep),
                volatile: None,
                chance: 100,
                duration: (2, 4),
            },
        );
        let mut rng = TurnRng::new_for_test(vec![2]);
        let mut events = EventBus::new();

        secondary_effect(&sleep_powder, &mut user, &mut target, &DamageRoll::NO_DAMAGE, &mut rng, &mut events);
        assert_eq!(target.status(), StatusCondition::Sleep);
        assert_eq!(target.sleep_turns(), 3);

        secondary_effect(&sleep_powder, &mut user, &mut target, &DamageRoll::NO_DAMAGE, &mut rng, &mut events);
        assert_eq!(events.messages(), vec!["Target fell asleep!", "But it failed!"]);
    }

    #[test]
    fn test_struggle_recoil_is_a_quarter_of_max_hp() {
        let mut user = pokemon("User", ElementalType::Normal);
        let mut target = pokemon("Target", ElementalType::Normal);
        let max_hp = user.max_hp();
        let mut rng = TurnRng::new_for_test(vec![]);
        let mut events = EventBus::headless();
        let roll = DamageRoll {
            damage: 0,
            hit: false,
            ..DamageRoll::NO_DAMAGE
        };

        secondary_effect(&Move::struggle(), &mut user, &mut target, &roll, &mut rng, &mut events);

        assert_eq!(user.hp(), max_hp - (max_hp / 4).max(1));
    }

    #[test]
    fn test_recoil_scales_with_damage() {
        let mut user = pokemon("User", ElementalType::Normal);
        let mut target = pokemon("Target", ElementalType::Normal);
        let max_hp = user.max_hp();
        let take_down = move_with(ElementalType::Normal, 90, 85, MoveKind::Recoil { percent: 25 });
        let roll = DamageRoll {
            damage: 41,
            ..DamageRoll::NO_DAMAGE
        };
        let mut rng = TurnRng::new_for_test(vec![]);
        let mut events = EventBus::new();

        secondary_effect(&take_down, &mut user, &mut target, &roll, &mut rng, &mut events);

        assert_eq!(user.hp(), max_hp - 10);
        assert!(events.messages()[0].contains("recoil"));
    }
}
