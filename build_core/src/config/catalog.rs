//! Catalog loading

use super::ConfigError;
use crate::catalog::{Catalog, Modifier, Move, NpcPreset, Race};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Contents of `races.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RacesConfig {
    pub races: Vec<Race>,
}

/// Contents of `modifiers.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifiersConfig {
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

/// Contents of `moves.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovesConfig {
    #[serde(default)]
    pub moves: Vec<Move>,
}

/// Contents of `npcs.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcsConfig {
    #[serde(default)]
    pub npcs: Vec<NpcPreset>,
}

/// Raw TOML text of each catalog file
#[derive(Debug, Clone, Copy)]
pub struct CatalogSources<'a> {
    pub races: &'a str,
    pub modifiers: &'a str,
    pub moves: &'a str,
    pub npcs: &'a str,
}

impl CatalogSources<'static> {
    /// The catalog shipped with the crate
    pub fn reference() -> Self {
        CatalogSources {
            races: include_str!("../../config/races.toml"),
            modifiers: include_str!("../../config/modifiers.toml"),
            moves: include_str!("../../config/moves.toml"),
            npcs: include_str!("../../config/npcs.toml"),
        }
    }
}

/// Parse and validate a catalog from TOML strings
pub fn parse_catalog(sources: CatalogSources<'_>) -> Result<Catalog, ConfigError> {
    let races: RacesConfig = super::parse_toml(sources.races)?;
    let modifiers: ModifiersConfig = super::parse_toml(sources.modifiers)?;
    let moves: MovesConfig = super::parse_toml(sources.moves)?;
    let npcs: NpcsConfig = super::parse_toml(sources.npcs)?;

    let catalog = Catalog {
        races: races.races,
        modifiers: modifiers.modifiers,
        moves: moves.moves,
        npcs: npcs.npcs,
    };
    catalog.validate()?;

    debug!(
        races = catalog.races.len(),
        modifiers = catalog.modifiers.len(),
        moves = catalog.moves.len(),
        npcs = catalog.npcs.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Load `races.toml`, `modifiers.toml`, `moves.toml` and `npcs.toml` from `dir`
pub fn load_catalog_dir(dir: &Path) -> Result<Catalog, ConfigError> {
    let races = std::fs::read_to_string(dir.join("races.toml"))?;
    let modifiers = std::fs::read_to_string(dir.join("modifiers.toml"))?;
    let moves = std::fs::read_to_string(dir.join("moves.toml"))?;
    let npcs = std::fs::read_to_string(dir.join("npcs.toml"))?;

    parse_catalog(CatalogSources {
        races: &races,
        modifiers: &modifiers,
        moves: &moves,
        npcs: &npcs,
    })
}

impl Catalog {
    /// The reference catalog embedded in the crate
    pub fn reference() -> Result<Catalog, ConfigError> {
        parse_catalog(CatalogSources::reference())
    }

    /// Load a catalog from a directory of TOML files
    pub fn load_dir(dir: &Path) -> Result<Catalog, ConfigError> {
        load_catalog_dir(dir)
    }
}
