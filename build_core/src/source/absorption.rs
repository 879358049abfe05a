//! AbsorptionSource - Stats absorbed from another character

use crate::catalog::{Catalog, Race};
use crate::source::StatSource;
use crate::stat_block::{Stage, StatAccumulator, StatBlock};
use crate::types::{RaceMechanic, MAX_LEVEL};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What the absorbing race has absorbed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AbsorptionState {
    #[default]
    None,
    /// A copy of the own race at another level
    ClonedLevel { level: u32 },
    /// A fixed NPC preset, by name
    NpcPreset { name: String },
}

/// Absorbed stats for `race`; all zero unless the race absorbs
pub fn absorption_stats(race: &Race, state: &AbsorptionState, catalog: &Catalog) -> StatBlock {
    if !race.has_mechanic(RaceMechanic::Absorption) {
        return StatBlock::zero();
    }

    match state {
        AbsorptionState::None => StatBlock::zero(),
        AbsorptionState::ClonedLevel { level } => race.base_stats((*level).min(MAX_LEVEL)),
        AbsorptionState::NpcPreset { name } => match catalog.npc(name) {
            Some(npc) => npc.stats,
            None => {
                warn!(npc = %name, "unknown NPC preset, absorbing nothing");
                StatBlock::zero()
            }
        },
    }
}

/// Stats from absorption
pub struct AbsorptionSource {
    stats: StatBlock,
}

impl AbsorptionSource {
    pub fn new(stats: StatBlock) -> Self {
        AbsorptionSource { stats }
    }
}

impl StatSource for AbsorptionSource {
    fn id(&self) -> &str {
        "absorption"
    }

    fn stage(&self) -> Stage {
        Stage::Absorption
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.add_block(&self.stats);
    }
}
