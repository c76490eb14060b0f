use crate::battle::action::Action;
use crate::battle::conditions::{after_turn, can_attack};
use crate::battle::damage::{calculate_damage, secondary_effect};
use crate::battle::state::{BattleEvent, EventBus, TurnRng};
use crate::battle::stats::effective_speed;
use crate::catalog::Catalog;
use crate::errors::{BattleError, DuelResult, TeamError};
use crate::items::ItemId;
use crate::moves::{Move, MoveKind};
use crate::trainer::Trainer;
use schema::Target;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_MAX_ROUNDS: u32 = 100;

/// Construction-time knobs of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleOptions {
    /// The battle ends in a tie once this many rounds have been played.
    pub max_rounds: u32,
    /// Headless battles record no events.
    pub headless: bool,
    /// Seed of the battle's random source; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            headless: false,
            seed: None,
        }
    }
}

/// A one-on-one battle between two trainers.
///
/// A battle is a plain value: cloning it yields a fully independent copy
/// (sharing only the immutable catalog), which is what search agents rely on.
#[derive(Debug, Clone)]
pub struct Battle {
    catalog: Arc<Catalog>,
    trainers: [Trainer; 2],
    round: u32,
    max_rounds: u32,
    winner: Option<usize>,
    tie: bool,
    headless: bool,
    seed: Option<u64>,
    rng: TurnRng,
}

impl Battle {
    pub fn new(catalog: Arc<Catalog>, trainer_0: Trainer, trainer_1: Trainer) -> DuelResult<Self> {
        Self::with_options(catalog, trainer_0, trainer_1, BattleOptions::default())
    }

    /// Build a battle after checking both trainers against `catalog`.
    pub fn with_options(
        catalog: Arc<Catalog>,
        trainer_0: Trainer,
        trainer_1: Trainer,
        options: BattleOptions,
    ) -> DuelResult<Self> {
        if options.max_rounds == 0 {
            return Err(BattleError::InvalidMaxRounds.into());
        }
        for trainer in [&trainer_0, &trainer_1] {
            validate_trainer(trainer, &catalog)?;
        }

        let rng = match options.seed {
            Some(seed) => TurnRng::from_seed(seed),
            None => TurnRng::new_random(),
        };

        log::debug!(
            "New battle: {} vs {} (max rounds {}, headless {})",
            trainer_0.name(),
            trainer_1.name(),
            options.max_rounds,
            options.headless
        );

        Ok(Battle {
            catalog,
            trainers: [trainer_0, trainer_1],
            round: 0,
            max_rounds: options.max_rounds,
            winner: None,
            tie: false,
            headless: options.headless,
            seed: options.seed,
            rng,
        })
    }

    /// Replace the random source, e.g. with a scripted one in tests.
    pub fn with_rng(mut self, rng: TurnRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn reseed(&mut self, seed: u64) {
        self.seed = Some(seed);
        self.rng = TurnRng::from_seed(seed);
    }

    /// An independent copy of this battle.
    pub fn copy(&self) -> Battle {
        self.clone()
    }

    /// Restore both trainers and the round state to how the battle started.
    /// A seeded battle also restarts its random sequence.
    pub fn reset(&mut self) {
        for trainer in &mut self.trainers {
            trainer.reset();
        }
        self.round = 0;
        self.winner = None;
        self.tie = false;
        if let Some(seed) = self.seed {
            self.rng = TurnRng::from_seed(seed);
        }
    }

    // === State queries ===

    pub fn done(&self) -> bool {
        self.tie || self.winner.is_some()
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn tie(&self) -> bool {
        self.tie
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn headless(&self) -> bool {
        self.headless
    }

    pub fn set_headless(&mut self, headless: bool) {
        self.headless = headless;
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn trainers(&self) -> &[Trainer; 2] {
        &self.trainers
    }

    pub fn trainer(&self, index: usize) -> &Trainer {
        &self.trainers[index]
    }

    pub fn trainer_mut(&mut self, index: usize) -> &mut Trainer {
        &mut self.trainers[index]
    }

    // === Legal actions ===

    /// Every action `trainer_id` may submit for the next turn.
    ///
    /// A trainer whose active Pokemon fainted may only switch (an empty list
    /// means it has lost); a trainer waiting on the opponent's replacement
    /// may only pass.
    pub fn get_possible_actions(&self, trainer_id: usize) -> Vec<Action> {
        let trainer = &self.trainers[trainer_id];
        let opponent = &self.trainers[1 - trainer_id];
        let switches = trainer
            .switch_targets()
            .map(|pokemon_index| Action::Switch { pokemon_index });

        if self.done() {
            return Vec::new();
        }
        if trainer.active().is_fainted() {
            return switches.collect();
        }
        if opponent.active().is_fainted() {
            return vec![Action::Pass];
        }

        let active = trainer.active();
        let mut actions: Vec<Action> = active
            .moves()
            .iter()
            .enumerate()
            .filter_map(|(slot, move_slot)| {
                let move_slot = move_slot.as_ref()?;
                let move_ = self.catalog.move_(move_slot.move_id)?;
                let blocked_by_taunt = active.is_taunted() && move_.is_status();
                (move_slot.pp > 0 && !blocked_by_taunt).then_some(Action::Attack {
                    move_slot: slot as i8,
                })
            })
            .collect();
        if actions.is_empty() {
            actions.push(Action::STRUGGLE);
        }

        actions.extend(switches);

        for (item_id, _) in trainer.possessed_items() {
            let Some(item) = self.catalog.item(item_id) else {
                continue;
            };
            for (target_index, pokemon) in trainer.team().iter().enumerate() {
                if item.can_use(pokemon) {
                    actions.push(Action::UseItem {
                        item_id,
                        target_index,
                    });
                }
            }
        }

        actions
    }

    // === Turn resolution ===

    /// Resolve one round with both trainers' actions and return what happened.
    ///
    /// # Panics
    ///
    /// Panics if the battle is already over, or if either action is not one
    /// [`Battle::get_possible_actions`] offers that trainer (a switch to the
    /// active or a fainted Pokemon, a status move under taunt, Struggle while
    /// a move is usable, passing with nothing to wait for, an item the
    /// trainer does not hold).
    pub fn turn(&mut self, action_0: Action, action_1: Action) -> Vec<BattleEvent> {
        assert!(!self.done(), "Cannot take a turn after the battle is done");
        self.resolve_turn([action_0, action_1])
    }

    /// Like [`Battle::turn`], but reports a finished battle as an error.
    /// Illegal actions still panic.
    pub fn try_turn(&mut self, action_0: Action, action_1: Action) -> Result<Vec<BattleEvent>, BattleError> {
        if self.done() {
            return Err(BattleError::BattleFinished);
        }
        Ok(self.resolve_turn([action_0, action_1]))
    }

    fn resolve_turn(&mut self, actions: [Action; 2]) -> Vec<BattleEvent> {
        for (player_index, action) in actions.into_iter().enumerate() {
            self.assert_legal(player_index, action);
        }

        let mut bus = if self.headless {
            EventBus::headless()
        } else {
            EventBus::new()
        };

        self.round += 1;
        bus.push(BattleEvent::TurnStarted { round: self.round });
        log::debug!("Round {}: {} vs {}", self.round, actions[0], actions[1]);

        // Actives that were already down when the turn began have been announced.
        let mut announced = [
            self.trainers[0].active().is_fainted(),
            self.trainers[1].active().is_fainted(),
        ];

        let first = self.first_mover(&actions);
        log::debug!("Trainer {} moves first", first);

        for player_index in [first, 1 - first] {
            let action = actions[player_index];
            if matches!(action, Action::Attack { .. }) && self.trainers[player_index].active().is_fainted() {
                log::debug!("Skipping attack of trainer {}: active Pokemon has fainted", player_index);
                continue;
            }
            if matches!(action, Action::Switch { .. }) {
                announced[player_index] = false;
            }

            self.execute_action(player_index, action, &mut bus);
            self.announce_faints(&mut announced, &mut bus);
            if self.check_termination(&mut bus) {
                return self.finish_turn(bus);
            }
        }

        for player_index in 0..2 {
            after_turn(self.trainers[player_index].active_mut(), &mut bus);
        }
        self.announce_faints(&mut announced, &mut bus);
        self.check_termination(&mut bus);

        self.finish_turn(bus)
    }

    fn assert_legal(&self, player_index: usize, action: Action) {
        if !self.get_possible_actions(player_index).contains(&action) {
            panic!("Illegal action {}: {}", action, self.illegal_reason(player_index, action));
        }
    }

    /// Why `action` is not among the actions offered to `player_index`.
    fn illegal_reason(&self, player_index: usize, action: Action) -> String {
        let trainer = &self.trainers[player_index];
        let name = trainer.name();
        let active = trainer.active();
        let waiting = self.trainers[1 - player_index].active().is_fainted();

        match action {
            Action::Switch { pokemon_index } => match trainer.pokemon(pokemon_index) {
                Some(pokemon) if pokemon_index > 0 && !pokemon.is_alive() => {
                    format!("{} cannot switch to fainted {}", name, pokemon.surname())
                }
                Some(_) if pokemon_index > 0 => format!("{} must wait for the opposing replacement", name),
                _ => format!("{} cannot switch to team slot {}", name, pokemon_index),
            },
            _ if active.is_fainted() => format!("{} must replace fainted {}", name, active.surname()),
            Action::Pass if !waiting => format!("{} has nothing to wait for", name),
            _ if waiting => format!("{} must wait for the opposing replacement", name),
            Action::Attack { move_slot } if move_slot < 0 => {
                format!("{} still has a move it can use and cannot struggle", active.surname())
            }
            Action::Attack { move_slot } => match active.move_slot(move_slot as usize) {
                None => format!("{} has no move in slot {}", active.surname(), move_slot),
                Some(slot) if slot.pp == 0 => {
                    format!("{} has no PP left in move slot {}", active.surname(), move_slot)
                }
                Some(slot) => format!(
                    "{} is taunted and cannot use {}",
                    active.surname(),
                    self.catalog
                        .move_(slot.move_id)
                        .map_or_else(|| format!("move {}", slot.move_id.0), |move_| move_.name.to_string())
                ),
            },
            Action::UseItem {
                item_id,
                target_index,
            } => {
                if trainer.item_quantity(item_id) == 0 {
                    return format!("{} has no item {} left to use", name, item_id.0);
                }
                let item = self
                    .catalog
                    .item(item_id)
                    .map_or_else(|| format!("item {}", item_id.0), |item| item.name.to_string());
                match trainer.pokemon(target_index) {
                    Some(pokemon) => format!("{} would have no effect on {}", item, pokemon.surname()),
                    None => format!("{} has no Pokemon in team slot {}", name, target_index),
                }
            }
            Action::Pass => format!("{} cannot pass now", name),
        }
    }

    fn finish_turn(&self, bus: EventBus) -> Vec<BattleEvent> {
        if log::log_enabled!(log::Level::Debug) && bus.is_recording() {
            bus.log_debug(&format!("Events of round {}:", self.round));
        }
        bus.into_events()
    }

    /// Index of the trainer whose action resolves first.
    fn first_mover(&mut self, actions: &[Action; 2]) -> usize {
        let key = |player_index: usize| {
            let action = actions[player_index];
            let priority = match action {
                Action::Attack { move_slot } if move_slot >= 0 => self.trainers[player_index]
                    .active()
                    .move_slot(move_slot as usize)
                    .and_then(|slot| self.catalog.move_(slot.move_id))
                    .map_or(0, |move_| move_.priority),
                _ => 0,
            };
            let speed = effective_speed(self.trainers[player_index].active());
            (action.tier(), priority, speed)
        };

        match key(0).cmp(&key(1)) {
            Ordering::Greater => 0,
            Ordering::Less => 1,
            Ordering::Equal => {
                if self.rng.chance(50, "Speed Tie") {
                    0
                } else {
                    1
                }
            }
        }
    }

    fn execute_action(&mut self, player_index: usize, action: Action, bus: &mut EventBus) {
        match action {
            Action::Attack { move_slot } => self.execute_attack(player_index, move_slot, bus),
            Action::Switch { pokemon_index } => {
                let trainer = &mut self.trainers[player_index];
                trainer.switch_pokemon(pokemon_index);
                bus.push_with(|| BattleEvent::PokemonSwitched {
                    trainer: trainer.name().clone(),
                    new_pokemon: trainer.active().surname().clone(),
                });
            }
            Action::UseItem {
                item_id,
                target_index,
            } => self.execute_item(player_index, item_id, target_index, bus),
            Action::Pass => {
                bus.push_with(|| BattleEvent::TrainerWaited {
                    trainer: self.trainers[player_index].name().clone(),
                });
            }
        }
    }

    fn execute_attack(&mut self, player_index: usize, move_slot: i8, bus: &mut EventBus) {
        let Battle {
            catalog,
            trainers,
            rng,
            ..
        } = self;
        let (user_trainer, target_trainer) = split_trainers(trainers, player_index);

        let move_ = if move_slot < 0 {
            catalog.struggle()
        } else {
            let index = move_slot as usize;
            let active = user_trainer.active();
            let move_id = match active.move_slot(index) {
                Some(slot) if slot.pp > 0 => slot.move_id,
                Some(_) => panic!("{} has no PP left in move slot {}", active.surname(), move_slot),
                None => panic!("{} has no move in slot {}", active.surname(), move_slot),
            };
            if let Some(slot) = user_trainer.active_mut().move_slot_mut(index) {
                slot.use_pp();
            }
            catalog
                .move_(move_id)
                .unwrap_or_else(|| panic!("move {} is not in the catalog", move_id.0))
        };

        bus.push_with(|| BattleEvent::MoveUsed {
            trainer: user_trainer.name().clone(),
            pokemon: user_trainer.active().surname().clone(),
            move_name: move_.name.clone(),
        });

        let user = user_trainer.active_mut();
        if !can_attack(user, catalog.self_hit(), rng, bus) {
            return;
        }

        let target = target_trainer.active_mut();
        if target.is_fainted() && needs_target(move_) {
            bus.push(BattleEvent::MoveFailed);
            return;
        }

        let roll = calculate_damage(move_, user, target, rng);
        if !roll.hit {
            bus.push_with(|| BattleEvent::MoveMissed {
                attacker: user.surname().clone(),
            });
        } else if move_.deals_damage() {
            let lost = target.take_damage(roll.damage);
            bus.push(BattleEvent::AttackTypeEffectiveness {
                multiplier: roll.effectiveness,
            });
            if roll.effectiveness > 0.0 {
                if roll.critical {
                    bus.push(BattleEvent::CriticalHit);
                }
                bus.push_with(|| BattleEvent::DamageDealt {
                    target: target.surname().clone(),
                    damage: lost,
                    remaining_hp: target.hp(),
                });
            }
        }

        secondary_effect(move_, user, target, &roll, rng, bus);
    }

    fn execute_item(&mut self, player_index: usize, item_id: ItemId, target_index: usize, bus: &mut EventBus) {
        let trainer = &mut self.trainers[player_index];
        assert!(
            trainer.item_quantity(item_id) > 0,
            "{} has no item {} left to use",
            trainer.name(),
            item_id.0
        );
        let item = self
            .catalog
            .item(item_id)
            .unwrap_or_else(|| panic!("item {} is not in the catalog", item_id.0));

        let trainer_name = trainer.name().clone();
        let target = trainer
            .pokemon_mut(target_index)
            .unwrap_or_else(|| panic!("{} has no Pokemon in team slot {}", trainer_name, target_index));
        bus.push_with(|| BattleEvent::ItemUsed {
            trainer: trainer_name.clone(),
            item: item.name.clone(),
            target: target.surname().clone(),
        });

        if item.use_on(target, bus) {
            trainer.decrease_item_quantity(item_id);
        }
    }

    /// Emit a faint event for every active Pokemon that went down since the
    /// last announcement.
    fn announce_faints(&self, announced: &mut [bool; 2], bus: &mut EventBus) {
        for (player_index, trainer) in self.trainers.iter().enumerate() {
            if trainer.active().is_fainted() && !announced[player_index] {
                announced[player_index] = true;
                bus.push_with(|| BattleEvent::PokemonFainted {
                    player_index,
                    pokemon: trainer.active().surname().clone(),
                });
            }
        }
    }

    /// Decide the outcome once it is settled. Returns whether the battle is over.
    fn check_termination(&mut self, bus: &mut EventBus) -> bool {
        if self.done() {
            return true;
        }

        let defeated = [self.trainers[0].is_defeated(), self.trainers[1].is_defeated()];
        match defeated {
            [true, true] => self.tie = true,
            [true, false] => self.winner = Some(1),
            [false, true] => self.winner = Some(0),
            [false, false] if self.round >= self.max_rounds => self.tie = true,
            [false, false] => return false,
        }

        match self.winner {
            Some(winner) => log::debug!("Battle over after {} rounds: trainer {} wins", self.round, winner),
            None => log::debug!("Battle over after {} rounds: tie", self.round),
        }
        bus.push_with(|| BattleEvent::BattleEnded {
            winner: self.winner.map(|winner| self.trainers[winner].name().clone()),
        });
        true
    }
}

impl fmt::Display for Battle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Round {}/{}", self.round, self.max_rounds)?;
        for trainer in &self.trainers {
            writeln!(f, "{}: {}", trainer.name(), trainer.active())?;
        }
        match (self.winner, self.tie) {
            (Some(winner), _) => write!(f, "Winner: {}", self.trainers[winner].name()),
            (None, true) => write!(f, "Result: tie"),
            (None, false) => write!(f, "In progress"),
        }
    }
}

/// Mutable access to the trainer at `user` and to its opponent.
fn split_trainers(trainers: &mut [Trainer; 2], user: usize) -> (&mut Trainer, &mut Trainer) {
    let (left, right) = trainers.split_at_mut(1);
    if user == 0 {
        (&mut left[0], &mut right[0])
    } else {
        (&mut right[0], &mut left[0])
    }
}

/// Whether a move has nothing to do once the opposing Pokemon is down.
fn needs_target(move_: &Move) -> bool {
    !matches!(
        move_.kind,
        MoveKind::StatChange {
            target: Target::User,
            ..
        }
    ) || move_.deals_damage()
}

fn validate_trainer(trainer: &Trainer, catalog: &Catalog) -> Result<(), TeamError> {
    for pokemon in trainer.team() {
        if catalog.species(pokemon.species()).is_none() {
            return Err(TeamError::UnknownSpecies(pokemon.species().0));
        }
        for slot in pokemon.moves().iter().flatten() {
            if catalog.move_(slot.move_id).is_none() {
                return Err(TeamError::UnknownMove(slot.move_id.0));
            }
        }
    }
    if let Some((item, _)) = trainer
        .possessed_items()
        .into_iter()
        .find(|(item, _)| catalog.item(*item).is_none())
    {
        return Err(TeamError::UnknownItem(item.0));
    }
    Ok(())
}
