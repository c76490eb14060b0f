use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use schema::{StatType, StatusType, VolatileType};
use std::fmt;
use std::sync::Arc;

/// Why a chosen attack did not go off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFailureReason {
    IsAsleep,
    IsFrozen,
    IsParalyzed,
    HurtItselfInConfusion,
}

/// One observable occurrence during a turn.
///
/// Events carry the names they mention, so they can be rendered without the
/// battle that produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        round: u32,
    },

    // Actions
    MoveUsed {
        trainer: Arc<str>,
        pokemon: Arc<str>,
        move_name: Arc<str>,
    },
    PokemonSwitched {
        trainer: Arc<str>,
        new_pokemon: Arc<str>,
    },
    ItemUsed {
        trainer: Arc<str>,
        item: Arc<str>,
        target: Arc<str>,
    },
    ItemHadNoEffect,
    TrainerWaited {
        trainer: Arc<str>,
    },

    // Move resolution
    MoveMissed {
        attacker: Arc<str>,
    },
    AttackTypeEffectiveness {
        multiplier: f64,
    },
    CriticalHit,
    DamageDealt {
        target: Arc<str>,
        damage: u16,
        remaining_hp: u16,
    },
    RecoilDamage {
        pokemon: Arc<str>,
        damage: u16,
    },
    MoveFailed,

    // Healing
    PokemonHealed {
        target: Arc<str>,
        amount: u16,
    },
    PokemonRevived {
        target: Arc<str>,
    },
    PokemonFainted {
        player_index: usize,
        pokemon: Arc<str>,
    },

    // Status Effects
    PokemonStatusApplied {
        target: Arc<str>,
        status: StatusType,
    },
    PokemonStatusRemoved {
        target: Arc<str>,
        status: StatusType,
    },
    PokemonStatusDamage {
        target: Arc<str>,
        status: StatusType,
        damage: u16,
    },
    VolatileApplied {
        target: Arc<str>,
        volatile: VolatileType,
    },
    VolatileExpired {
        target: Arc<str>,
        volatile: VolatileType,
    },
    Confused {
        pokemon: Arc<str>,
    },
    ActionFailed {
        pokemon: Arc<str>,
        reason: ActionFailureReason,
    },

    // Stat Changes
    StatStageChanged {
        target: Arc<str>,
        stat: StatType,
        delta: i8,
    },
    StatChangeBlocked {
        target: Arc<str>,
        stat: StatType,
        rising: bool,
    },

    // Battle End
    BattleEnded {
        winner: Option<Arc<str>>,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable line.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::TurnStarted { round } => Some(format!("=== Round {} ===", round)),

            BattleEvent::MoveUsed { trainer, pokemon, move_name } => {
                Some(format!("{}'s {} used {}!", trainer, pokemon, move_name))
            }
            BattleEvent::PokemonSwitched { trainer, new_pokemon } => {
                Some(format!("{} brings in {}!", trainer, new_pokemon))
            }
            BattleEvent::ItemUsed { trainer, item, target } => {
                Some(format!("{} used a {} on {}.", trainer, item, target))
            }
            BattleEvent::ItemHadNoEffect => Some("It won't have any effect.".to_string()),
            BattleEvent::TrainerWaited { trainer } => Some(format!("{} waits.", trainer)),

            BattleEvent::MoveMissed { attacker } => Some(format!("{}'s attack missed!", attacker)),
            BattleEvent::AttackTypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m > 0.0 && m < 1.0 => Some("It's not very effective...".to_string()),
                m if m == 0.0 => Some("It doesn't affect the target...".to_string()),
                _ => None, // Normal effectiveness, no message
            },
            BattleEvent::CriticalHit => Some("Critical hit!".to_string()),
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} lost {} HP.", target, damage))
            }
            BattleEvent::RecoilDamage { pokemon, damage } => {
                Some(format!("{} is damaged by recoil! It lost {} HP.", pokemon, damage))
            }
            BattleEvent::MoveFailed => Some("But it failed!".to_string()),

            BattleEvent::PokemonHealed { target, amount } => {
                Some(format!("{} recovered {} HP.", target, amount))
            }
            BattleEvent::PokemonRevived { target } => Some(format!("{} was revived!", target)),
            BattleEvent::PokemonFainted { pokemon, .. } => Some(format!("{} fainted!", pokemon)),

            BattleEvent::PokemonStatusApplied { target, status } => {
                Some(format!("{} {}", target, Self::format_status_applied(*status)))
            }
            BattleEvent::PokemonStatusRemoved { target, status } => {
                Some(format!("{} {}", target, Self::format_status_removed(*status)))
            }
            BattleEvent::PokemonStatusDamage { target, status, .. } => {
                Some(format!("{} is hurt by its {}!", target, status))
            }
            BattleEvent::VolatileApplied { target, volatile } => match volatile {
                VolatileType::Confusion => Some(format!("{} became confused!", target)),
                VolatileType::Taunt => Some(format!("{} fell for the taunt!", target)),
            },
            BattleEvent::VolatileExpired { target, volatile } => match volatile {
                VolatileType::Confusion => Some(format!("{} snapped out of confusion!", target)),
                VolatileType::Taunt => None, // Taunt wears off silently
            },
            BattleEvent::Confused { pokemon } => Some(format!("{} is confused!", pokemon)),
            BattleEvent::ActionFailed { pokemon, reason } => {
                Some(format!("{} {}", pokemon, Self::format_action_failure_reason(*reason)))
            }

            BattleEvent::StatStageChanged { target, stat, delta } => {
                let direction = if *delta > 0 { "rose" } else { "fell" };
                if delta.abs() > 1 {
                    Some(format!("{}'s {} sharply {}!", target, stat, direction))
                } else {
                    Some(format!("{}'s {} {}!", target, stat, direction))
                }
            }
            BattleEvent::StatChangeBlocked { target, stat, rising } => {
                let bound = if *rising { "higher" } else { "lower" };
                Some(format!("{}'s {} won't go any {}!", target, stat, bound))
            }

            BattleEvent::BattleEnded { winner } => match winner {
                Some(name) => Some(format!("{} wins the battle!", name)),
                None => Some("It's a tie!".to_string()),
            },
        }
    }

    // --- Private Helper Functions ---

    fn format_status_applied(status: StatusType) -> &'static str {
        match status {
            StatusType::Sleep => "fell asleep!",
            StatusType::Poison => "was poisoned!",
            StatusType::Burn => "was burned!",
            StatusType::Freeze => "was frozen solid!",
            StatusType::Paralysis => "is paralyzed! It may be unable to move!",
        }
    }

    fn format_status_removed(status: StatusType) -> String {
        match status {
            StatusType::Sleep => "woke up!".to_string(),
            StatusType::Freeze => "thawed out!".to_string(),
            _ => format!("was cured of its {}.", status),
        }
    }

    fn format_action_failure_reason(reason: ActionFailureReason) -> &'static str {
        match reason {
            ActionFailureReason::IsAsleep => "is fast asleep.",
            ActionFailureReason::IsFrozen => "is frozen solid!",
            ActionFailureReason::IsParalyzed => "is fully paralyzed!",
            ActionFailureReason::HurtItselfInConfusion => {
                "is confused! It hurt itself in its confusion!"
            }
        }
    }
}

impl fmt::Display for BattleEvent {
    /// Formatted text, or the debug form for silent events.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format() {
            Some(text) => write!(f, "{}", text),
            None => write!(f, "{:?}", self),
        }
    }
}

/// Event bus for collecting battle events.
///
/// A headless bus drops every event on push, so rollouts pay nothing for
/// messages they never read. State changes never depend on the bus.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
    headless: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            headless: false,
        }
    }

    pub fn headless() -> Self {
        Self {
            events: Vec::new(),
            headless: true,
        }
    }

    pub fn is_recording(&self) -> bool {
        !self.headless
    }

    pub fn push(&mut self, event: BattleEvent) {
        if !self.headless {
            self.events.push(event);
        }
    }

    /// Like [`EventBus::push`], but the event is only built when recorded.
    pub fn push_with(&mut self, event: impl FnOnce() -> BattleEvent) {
        if !self.headless {
            self.events.push(event());
        }
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// Formatted text of every audible event, in order.
    pub fn messages(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    /// Log all events at debug level with a header line.
    pub fn log_debug(&self, header: &str) {
        log::debug!("{}", header);
        for event in &self.events {
            log::debug!("  {:?}", event);
        }
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {}", event)?;
        }
        Ok(())
    }
}

/// The single random source of a battle.
///
/// Seeded sources drive real simulations; scripted sources replay a fixed
/// list of percentile outcomes (1..=100) and are meant for tests.
#[derive(Debug, Clone)]
pub enum TurnRng {
    Seeded(SmallRng),
    Scripted { outcomes: Arc<[u8]>, index: usize },
}

impl TurnRng {
    pub fn from_seed(seed: u64) -> Self {
        TurnRng::Seeded(SmallRng::seed_from_u64(seed))
    }

    pub fn new_random() -> Self {
        TurnRng::Seeded(SmallRng::from_rng(&mut rand::rng()))
    }

    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        TurnRng::Scripted {
            outcomes: Arc::from(outcomes),
            index: 0,
        }
    }

    /// A percentile outcome in 1..=100.
    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = match self {
            TurnRng::Seeded(rng) => rng.random_range(1..=100),
            TurnRng::Scripted { outcomes, index } => {
                let Some(&outcome) = outcomes.get(*index) else {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                };
                *index += 1;
                outcome
            }
        };
        log::trace!("[RNG] Consumed {} for: {}", outcome, reason);
        outcome
    }

    /// A uniform draw in [0, 1). Scripted outcomes map `n` to `(n - 1) / 100`.
    pub fn next_unit(&mut self, reason: &str) -> f64 {
        match self {
            TurnRng::Seeded(rng) => {
                let value: f64 = rng.random();
                log::trace!("[RNG] Consumed {:.4} for: {}", value, reason);
                value
            }
            TurnRng::Scripted { .. } => f64::from(self.next_outcome(reason).saturating_sub(1)) / 100.0,
        }
    }

    /// True with probability `percent`/100. Certain and impossible events
    /// consume nothing.
    pub fn chance(&mut self, percent: u8, reason: &str) -> bool {
        match percent {
            0 => false,
            100.. => true,
            _ => self.next_outcome(reason) <= percent,
        }
    }

    /// A uniform integer in `low..=high`. Degenerate ranges consume nothing.
    pub fn range_inclusive(&mut self, low: u8, high: u8, reason: &str) -> u8 {
        if low >= high {
            return low;
        }
        match self {
            TurnRng::Seeded(rng) => {
                let value = rng.random_range(low..=high);
                log::trace!("[RNG] Consumed {} for: {}", value, reason);
                value
            }
            TurnRng::Scripted { .. } => {
                let span = high - low + 1;
                low + (self.next_outcome(reason) - 1) % span
            }
        }
    }
}
