use crate::errors::{CatalogError, CatalogResult, TeamError, TeamResult};
use crate::items::{Item, ItemId};
use crate::moves::{Move, MoveId};
use crate::pokemon::{PokemonInst, MAX_MOVES};
use crate::species::{Species, SpeciesId};
use schema::{CatalogDefinition, ElementalType};
use std::collections::HashMap;
use std::sync::Arc;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.ron");

/// Immutable registry of every species, move and item a battle can refer to.
///
/// Ids are dense, so lookups by id are plain indexing. Names are matched
/// case-insensitively with spaces ignored ("thunderwave" finds "Thunder Wave").
#[derive(Debug, Clone)]
pub struct Catalog {
    species: Vec<Species>,
    moves: Vec<Move>,
    items: Vec<Item>,
    struggle: Move,
    self_hit: Move,
    species_names: HashMap<String, SpeciesId>,
    move_names: HashMap<String, MoveId>,
    item_names: HashMap<String, ItemId>,
}

fn name_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Check that `ids` is a permutation of `0..ids.len()` and return the
/// order that sorts the entries by id.
fn dense_order(kind: &'static str, ids: &[u16]) -> CatalogResult<Vec<usize>> {
    let mut order: Vec<usize> = (0..ids.len()).collect();
    order.sort_by_key(|&index| ids[index]);
    let mut previous = None;
    for (expected, &index) in order.iter().enumerate() {
        let id = ids[index];
        if previous == Some(id) {
            return Err(CatalogError::DuplicateId { kind, id });
        }
        previous = Some(id);
        if usize::from(id) != expected {
            return Err(CatalogError::SparseId {
                kind,
                expected,
                found: id,
            });
        }
    }
    Ok(order)
}

fn index_names<'a, Id: Copy>(
    kind: &'static str,
    entries: impl Iterator<Item = (&'a str, Id)>,
) -> CatalogResult<HashMap<String, Id>> {
    let mut names = HashMap::new();
    for (name, id) in entries {
        if names.insert(name_key(name), id).is_some() {
            return Err(CatalogError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(names)
}

impl Catalog {
    /// Validate a definition document and resolve it into a catalog.
    pub fn from_definition(definition: CatalogDefinition) -> CatalogResult<Self> {
        let CatalogDefinition {
            species: species_defs,
            moves: move_defs,
            items: item_defs,
        } = definition;

        let move_order = dense_order("move", &move_defs.iter().map(|m| m.id).collect::<Vec<_>>())?;
        let moves = move_order
            .into_iter()
            .map(|index| Move::from_definition(&move_defs[index]))
            .collect::<CatalogResult<Vec<_>>>()?;
        let move_names = index_names("move", moves.iter().map(|m| (m.name.as_ref(), m.id)))?;

        let item_order = dense_order("item", &item_defs.iter().map(|i| i.id).collect::<Vec<_>>())?;
        let items = item_order
            .into_iter()
            .map(|index| Item::from_definition(&item_defs[index]))
            .collect::<CatalogResult<Vec<_>>>()?;
        let item_names = index_names("item", items.iter().map(|i| (i.name.as_ref(), i.id)))?;

        let species_order = dense_order("species", &species_defs.iter().map(|s| s.id).collect::<Vec<_>>())?;
        let mut species = Vec::with_capacity(species_defs.len());
        for index in species_order {
            let definition = &species_defs[index];
            let invalid = |reason: &str| CatalogError::Invalid {
                kind: "species",
                name: definition.name.clone(),
                reason: reason.to_string(),
            };

            if definition.name.trim().is_empty() {
                return Err(invalid("name must not be empty"));
            }
            let types = match definition.types.as_slice() {
                [ElementalType::TypeNone, ..] | [_, ElementalType::TypeNone] => {
                    return Err(invalid("TypeNone is reserved for engine moves"));
                }
                [single] => (*single, *single),
                [first, second] if first != second => (*first, *second),
                _ => return Err(invalid("a species has one or two distinct types")),
            };
            if definition.default_moves.len() > MAX_MOVES {
                return Err(invalid("a species has at most four default moves"));
            }
            let default_moves = definition
                .default_moves
                .iter()
                .map(|name| {
                    move_names
                        .get(&name_key(name))
                        .copied()
                        .ok_or_else(|| CatalogError::UnknownMove {
                            species: definition.name.clone(),
                            name: name.clone(),
                        })
                })
                .collect::<CatalogResult<Vec<_>>>()?;

            species.push(Species {
                id: SpeciesId(definition.id),
                name: Arc::from(definition.name.as_str()),
                types,
                base_stats: definition.base_stats,
                default_moves,
            });
        }
        let species_names = index_names("species", species.iter().map(|s| (s.name.as_ref(), s.id)))?;

        log::debug!(
            "Catalog loaded: {} species, {} moves, {} items",
            species.len(),
            moves.len(),
            items.len()
        );

        Ok(Catalog {
            species,
            moves,
            items,
            struggle: Move::struggle(),
            self_hit: Move::self_hit(),
            species_names,
            move_names,
            item_names,
        })
    }

    /// Parse a RON catalog document and resolve it.
    pub fn from_ron_str(text: &str) -> CatalogResult<Self> {
        let definition: CatalogDefinition =
            ron::from_str(text).map_err(|error| CatalogError::Parse(error.to_string()))?;
        Self::from_definition(definition)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_ron_str(BUILTIN_CATALOG)
    }

    // === Lookups by id ===

    pub fn species(&self, id: SpeciesId) -> Option<&Species> {
        self.species.get(usize::from(id.0))
    }

    /// Look up a move, including the engine-internal Struggle and Self Hit.
    pub fn move_(&self, id: MoveId) -> Option<&Move> {
        match id {
            MoveId::STRUGGLE => Some(&self.struggle),
            MoveId::SELF_HIT => Some(&self.self_hit),
            _ => self.moves.get(usize::from(id.0)),
        }
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(usize::from(id.0))
    }

    pub fn struggle(&self) -> &Move {
        &self.struggle
    }

    pub fn self_hit(&self) -> &Move {
        &self.self_hit
    }

    // === Lookups by name ===

    pub fn species_by_name(&self, name: &str) -> CatalogResult<&Species> {
        self.species_names
            .get(&name_key(name))
            .and_then(|&id| self.species(id))
            .ok_or_else(|| CatalogError::NotFound {
                kind: "species",
                name: name.to_string(),
            })
    }

    pub fn move_by_name(&self, name: &str) -> CatalogResult<&Move> {
        self.move_names
            .get(&name_key(name))
            .and_then(|&id| self.move_(id))
            .ok_or_else(|| CatalogError::NotFound {
                kind: "move",
                name: name.to_string(),
            })
    }

    pub fn item_by_name(&self, name: &str) -> CatalogResult<&Item> {
        self.item_names
            .get(&name_key(name))
            .and_then(|&id| self.item(id))
            .ok_or_else(|| CatalogError::NotFound {
                kind: "item",
                name: name.to_string(),
            })
    }

    // === Listing ===

    pub fn all_species(&self) -> &[Species] {
        &self.species
    }

    pub fn all_moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn all_items(&self) -> &[Item] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Build an individual of `species`, knowing `moves` or the species'
    /// default moves when `moves` is `None`.
    pub fn create_pokemon(
        &self,
        species: SpeciesId,
        level: u8,
        moves: Option<&[MoveId]>,
        ivs: Option<[u8; 6]>,
        evs: Option<[u8; 6]>,
        surname: Option<&str>,
    ) -> TeamResult<PokemonInst> {
        let species = self.species(species).ok_or(TeamError::UnknownSpecies(species.0))?;
        let move_ids = moves.unwrap_or(species.default_moves.as_slice());
        let moves = move_ids
            .iter()
            .map(|&id| {
                self.moves
                    .get(usize::from(id.0))
                    .ok_or(TeamError::UnknownMove(id.0))
            })
            .collect::<TeamResult<Vec<_>>>()?;

        PokemonInst::new(species, level, &moves, ivs, evs, surname)
    }
}
