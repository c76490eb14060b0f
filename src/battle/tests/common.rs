use crate::battle::engine::{Battle, BattleOptions};
use crate::battle::state::{BattleEvent, TurnRng};
use crate::catalog::Catalog;
use crate::items::ItemId;
use crate::pokemon::PokemonInst;
use crate::trainer::Trainer;
use schema::StatusType;
use std::sync::{Arc, LazyLock};

static CATALOG: LazyLock<Arc<Catalog>> =
    LazyLock::new(|| Arc::new(Catalog::builtin().expect("builtin catalog is valid")));

/// The built-in catalog, loaded once per test binary.
pub fn test_catalog() -> Arc<Catalog> {
    CATALOG.clone()
}

/// A builder for creating test Pokemon instances with common defaults.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new("Pikachu", 25)
///     .with_moves(&["Tackle"])
///     .with_status(StatusType::Paralysis)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    species: String,
    level: u8,
    moves: Option<Vec<String>>,
    status: Option<StatusType>,
    sleep_turns: u8,
    current_hp: Option<u16>,
    ivs: Option<[u8; 6]>,
}

impl TestPokemonBuilder {
    /// Creates a new builder for a given species and level.
    pub fn new(species: &str, level: u8) -> Self {
        Self {
            species: species.to_string(),
            level,
            moves: None,
            status: None,
            sleep_turns: 0,
            current_hp: None,
            ivs: None,
        }
    }

    /// Sets the moves by name. Without this the species' default moves are used.
    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.moves = Some(moves.iter().map(|name| name.to_string()).collect());
        self
    }

    pub fn with_status(mut self, status: StatusType) -> Self {
        self.status = Some(status);
        self.sleep_turns = 3;
        self
    }

    pub fn asleep_for(mut self, turns: u8) -> Self {
        self.status = Some(StatusType::Sleep);
        self.sleep_turns = turns;
        self
    }

    /// Sets the current HP for the test Pokemon. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_ivs(mut self, ivs: [u8; 6]) -> Self {
        self.ivs = Some(ivs);
        self
    }

    /// Builds the `PokemonInst`.
    pub fn build(self) -> PokemonInst {
        let catalog = test_catalog();
        let species = catalog
            .species_by_name(&self.species)
            .unwrap_or_else(|error| panic!("Failed to find species {}: {}", self.species, error));
        let moves = self.moves.map(|names| {
            names
                .iter()
                .map(|name| match catalog.move_by_name(name) {
                    Ok(move_) => move_.id,
                    Err(error) => panic!("Failed to find move {}: {}", name, error),
                })
                .collect::<Vec<_>>()
        });

        let mut pokemon = catalog
            .create_pokemon(species.id, self.level, moves.as_deref(), self.ivs, None, None)
            .expect("valid test pokemon");

        if let Some(status) = self.status {
            pokemon.inflict_status(status, self.sleep_turns);
        }
        if let Some(hp) = self.current_hp {
            pokemon.set_hp(hp);
        }

        pokemon
    }
}

/// Creates a test trainer holding `inventory`, given as item names and quantities.
pub fn create_test_trainer(name: &str, team: Vec<PokemonInst>, inventory: &[(&str, u16)]) -> Trainer {
    let catalog = test_catalog();
    let inventory: Vec<(ItemId, u16)> = inventory
        .iter()
        .map(|(item, quantity)| (item_id(item), *quantity))
        .collect();
    Trainer::new(name, team, &inventory, catalog.item_count()).expect("valid test trainer")
}

pub fn item_id(name: &str) -> ItemId {
    test_catalog().item_by_name(name).expect("known item").id
}

/// Creates a battle between "Red" and "Blue" that draws from `rng`.
pub fn create_test_battle(team_0: Vec<PokemonInst>, team_1: Vec<PokemonInst>, rng: TurnRng) -> Battle {
    let trainer_0 = create_test_trainer("Red", team_0, &[]);
    let trainer_1 = create_test_trainer("Blue", team_1, &[]);
    battle_between(trainer_0, trainer_1, BattleOptions::default()).with_rng(rng)
}

pub fn battle_between(trainer_0: Trainer, trainer_1: Trainer, options: BattleOptions) -> Battle {
    Battle::with_options(test_catalog(), trainer_0, trainer_1, options).expect("valid test battle")
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// Useful for tests where the specific RNG outcome is not important, preventing panics from exhaustion.
///
/// Against a 50 every accuracy check of 50% or more hits, no critical hit
/// happens and every secondary effect below 50% fails.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Names of the Pokemon that used a move, in order.
pub fn move_users(events: &[BattleEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            BattleEvent::MoveUsed { pokemon, .. } => Some(pokemon.to_string()),
            _ => None,
        })
        .collect()
}

/// Position of the first event matching `predicate`.
pub fn position_of(events: &[BattleEvent], predicate: impl Fn(&BattleEvent) -> bool) -> Option<usize> {
    events.iter().position(predicate)
}
