use crate::battle::engine::{Battle, BattleOptions};
use crate::catalog::Catalog;
use crate::errors::{DuelResult, ScenarioError};
use crate::moves::MoveId;
use crate::pokemon::PokemonInst;
use crate::trainer::Trainer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn default_level() -> u8 {
    50
}

/// A predefined battle between two trainers, used to benchmark agents on
/// the same starting position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabScenario {
    pub id: String,
    pub description: String,
    pub trainers: [PrefabTrainer; 2],
}

/// A predefined trainer: names are resolved against a catalog when the
/// scenario is instantiated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabTrainer {
    pub name: String,
    pub team: Vec<PrefabPokemon>,
    #[serde(default)]
    pub inventory: Vec<(String, u16)>,
}

/// A predefined Pokemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabPokemon {
    pub species: String,
    #[serde(default = "default_level")]
    pub level: u8,
    /// Move names; an empty list uses the species' default moves.
    #[serde(default)]
    pub moves: Vec<String>,
}

impl PrefabPokemon {
    fn new(species: &str, level: u8, moves: &[&str]) -> Self {
        Self {
            species: species.to_string(),
            level,
            moves: moves.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn build(&self, catalog: &Catalog) -> DuelResult<PokemonInst> {
        let species = catalog.species_by_name(&self.species)?;
        let moves = self
            .moves
            .iter()
            .map(|name| catalog.move_by_name(name).map(|move_| move_.id))
            .collect::<Result<Vec<MoveId>, _>>()?;
        let moves = (!moves.is_empty()).then_some(moves.as_slice());

        Ok(catalog.create_pokemon(species.id, self.level, moves, None, None, None)?)
    }
}

impl PrefabTrainer {
    fn new(name: &str, team: Vec<PrefabPokemon>, inventory: &[(&str, u16)]) -> Self {
        Self {
            name: name.to_string(),
            team,
            inventory: inventory
                .iter()
                .map(|(item, quantity)| (item.to_string(), *quantity))
                .collect(),
        }
    }

    pub fn build(&self, catalog: &Catalog) -> DuelResult<Trainer> {
        let team = self
            .team
            .iter()
            .map(|pokemon| pokemon.build(catalog))
            .collect::<DuelResult<Vec<_>>>()?;
        let inventory = self
            .inventory
            .iter()
            .map(|(name, quantity)| catalog.item_by_name(name).map(|item| (item.id, *quantity)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Trainer::new(&self.name, team, &inventory, catalog.item_count())?)
    }
}

impl PrefabScenario {
    /// Resolve both trainers against `catalog` and start a fresh battle.
    pub fn build(&self, catalog: Arc<Catalog>, options: BattleOptions) -> DuelResult<Battle> {
        let [first, second] = &self.trainers;
        let trainer_0 = first.build(&catalog)?;
        let trainer_1 = second.build(&catalog)?;
        Battle::with_options(catalog, trainer_0, trainer_1, options)
    }
}

fn classic_six(name: &str) -> PrefabTrainer {
    PrefabTrainer::new(
        name,
        vec![
            PrefabPokemon::new("Arcanine", 75, &["Flamethrower", "Extreme Speed", "Bite"]),
            PrefabPokemon::new("Gyarados", 75, &["Hydro Pump", "Bite", "Taunt"]),
            PrefabPokemon::new("Exeggutor", 75, &["Psychic", "Solar Beam", "Sleep Powder"]),
            PrefabPokemon::new("Rhydon", 75, &["Earthquake", "Rock Slide", "Body Slam"]),
            PrefabPokemon::new("Alakazam", 75, &["Psychic", "Thunder Wave", "Tackle"]),
            PrefabPokemon::new("Snorlax", 75, &["Body Slam", "Hyper Beam", "Pound"]),
        ],
        &[("Hyper Potion", 2), ("Full Heal", 2)],
    )
}

fn lone_pikachu(name: &str) -> PrefabTrainer {
    PrefabTrainer::new(
        name,
        vec![PrefabPokemon::new(
            "Pikachu",
            50,
            &["Thunderbolt", "Quick Attack", "Iron Tail", "Thunder Wave"],
        )],
        &[("Super Potion", 1)],
    )
}

/// Get all predefined battle scenarios
pub fn get_prefab_scenarios() -> Vec<PrefabScenario> {
    vec![
        PrefabScenario {
            id: "kanto_classic".to_string(),
            description: "A simple 1v1 between two iconic Pokemon".to_string(),
            trainers: [
                PrefabTrainer::new(
                    "Ash",
                    vec![PrefabPokemon::new(
                        "Pikachu",
                        50,
                        &["Thunderbolt", "Quick Attack", "Tail Whip", "Thunder Wave"],
                    )],
                    &[("Super Potion", 1)],
                ),
                PrefabTrainer::new(
                    "Gary",
                    vec![PrefabPokemon::new("Eevee", 50, &["Tackle", "Bite", "Sand Attack"])],
                    &[("Super Potion", 1)],
                ),
            ],
        },
        PrefabScenario {
            id: "mirror_match_6v6".to_string(),
            description: "Two identical six-Pokemon teams".to_string(),
            trainers: [classic_six("Player 1"), classic_six("Player 2")],
        },
        PrefabScenario {
            id: "type_triangle_tussle".to_string(),
            description: "A 3v3 battle built around strategic switching".to_string(),
            trainers: [
                PrefabTrainer::new(
                    "Green",
                    vec![
                        PrefabPokemon::new("Venusaur", 50, &["Solar Beam", "Sleep Powder", "Razor Leaf"]),
                        PrefabPokemon::new("Arcanine", 50, &["Flamethrower", "Extreme Speed", "Bite"]),
                        PrefabPokemon::new("Lapras", 50, &["Blizzard", "Hydro Pump", "Body Slam"]),
                    ],
                    &[("Super Potion", 2), ("Full Heal", 1)],
                ),
                PrefabTrainer::new(
                    "Red",
                    vec![
                        PrefabPokemon::new("Charizard", 50, &["Flamethrower", "Wing Attack", "Slash"]),
                        PrefabPokemon::new("Blastoise", 50, &["Hydro Pump", "Skull Bash", "Bite"]),
                        PrefabPokemon::new("Exeggutor", 50, &["Psychic", "Solar Beam", "Tackle"]),
                    ],
                    &[("Super Potion", 2), ("Full Heal", 1)],
                ),
            ],
        },
        PrefabScenario {
            id: "brain_vs_brawn".to_string(),
            description: "Physical attackers against special attackers, 3v3".to_string(),
            trainers: [
                PrefabTrainer::new(
                    "Brawn",
                    vec![
                        PrefabPokemon::new("Rhydon", 52, &["Earthquake", "Rock Slide", "Body Slam"]),
                        PrefabPokemon::new("Snorlax", 52, &["Body Slam", "Hyper Beam", "Skull Bash"]),
                        PrefabPokemon::new("Gyarados", 52, &["Taunt", "Bite", "Hydro Pump"]),
                    ],
                    &[("Hyper Potion", 2)],
                ),
                PrefabTrainer::new(
                    "Brain",
                    vec![
                        PrefabPokemon::new("Alakazam", 52, &["Psychic", "Thunder Wave", "Tackle"]),
                        PrefabPokemon::new("Pikachu", 52, &["Thunderbolt", "Thunder Shock", "Quick Attack"]),
                        PrefabPokemon::new("Exeggutor", 52, &["Psychic", "Solar Beam", "Tackle"]),
                    ],
                    &[("Hyper Potion", 2)],
                ),
            ],
        },
        PrefabScenario {
            id: "full_team_6v6".to_string(),
            description: "Two full teams at high level".to_string(),
            trainers: [
                PrefabTrainer::new(
                    "Red",
                    vec![
                        PrefabPokemon::new("Pikachu", 88, &["Thunderbolt", "Quick Attack", "Iron Tail"]),
                        PrefabPokemon::new("Charizard", 84, &["Flamethrower", "Wing Attack", "Slash"]),
                        PrefabPokemon::new("Blastoise", 84, &["Hydro Pump", "Skull Bash", "Bite"]),
                        PrefabPokemon::new("Venusaur", 84, &["Solar Beam", "Razor Leaf", "Sleep Powder"]),
                        PrefabPokemon::new("Snorlax", 82, &["Body Slam", "Hyper Beam", "Pound"]),
                        PrefabPokemon::new("Lapras", 80, &["Blizzard", "Body Slam", "Hydro Pump"]),
                    ],
                    &[("Hyper Potion", 5), ("Full Heal", 5)],
                ),
                PrefabTrainer::new(
                    "Blue",
                    vec![
                        PrefabPokemon::new("Pidgeot", 85, &["Wing Attack", "Sky Attack", "Tackle"]),
                        PrefabPokemon::new("Alakazam", 82, &["Psychic", "Tackle", "Pound"]),
                        PrefabPokemon::new("Rhydon", 82, &["Earthquake", "Rock Slide", "Pound"]),
                        PrefabPokemon::new("Gyarados", 84, &["Hydro Pump", "Hyper Beam", "Bite"]),
                        PrefabPokemon::new("Arcanine", 84, &["Flamethrower", "Extreme Speed", "Bite"]),
                        PrefabPokemon::new("Exeggutor", 86, &["Psychic", "Solar Beam", "Sleep Powder"]),
                    ],
                    &[("Hyper Potion", 5), ("Full Heal", 5)],
                ),
            ],
        },
        PrefabScenario {
            id: "mirror_match".to_string(),
            description: "A perfectly symmetrical battle for agent evaluation".to_string(),
            trainers: [lone_pikachu("Player 1"), lone_pikachu("Player 2")],
        },
    ]
}

/// Ids of every predefined scenario, in registration order.
pub fn list_scenarios() -> Vec<String> {
    get_prefab_scenarios()
        .into_iter()
        .map(|scenario| scenario.id)
        .collect()
}

/// Instantiate the scenario registered as `name`.
pub fn scenario(name: &str, catalog: Arc<Catalog>, options: BattleOptions) -> DuelResult<Battle> {
    let prefab = get_prefab_scenarios()
        .into_iter()
        .find(|scenario| scenario.id == name)
        .ok_or_else(|| ScenarioError::UnknownScenario(name.to_string()))?;
    log::debug!("Instantiating scenario {}", prefab.id);
    prefab.build(catalog, options)
}
