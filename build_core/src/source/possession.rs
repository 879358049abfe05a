//! PossessionSource - A share of a possessed body's stats

use crate::catalog::{Catalog, Race};
use crate::source::StatSource;
use crate::stat_block::{Stage, StatAccumulator, StatBlock, StatTable};
use crate::types::{RaceMechanic, MAX_LEVEL};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fraction of the possessed body's stats granted to the possessor
pub const POSSESSION_RATE: f64 = 0.1;

/// Who the possessing race is inhabiting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PossessionState {
    #[default]
    None,
    Target {
        /// Possessed race name
        race: String,
        /// Subrace of the possessed race, if it has presets
        #[serde(default)]
        subrace: Option<String>,
        /// Level of the possessed body; `None` uses the possessor's level
        #[serde(default)]
        level: Option<u32>,
        /// Points the possessed body spent on top of its base stats
        #[serde(default)]
        extra: StatBlock,
    },
}

impl PossessionState {
    pub fn target(race: impl Into<String>) -> Self {
        PossessionState::Target {
            race: race.into(),
            subrace: None,
            level: None,
            extra: StatBlock::zero(),
        }
    }
}

/// Possession stats for `race` at `level`; all zero unless the race possesses.
///
/// Every stat except the HP and Ki pools gets
/// `floor((possessed_base + extra) * 0.1)`.
pub fn possession_stats(race: &Race, level: u32, state: &PossessionState, catalog: &Catalog) -> StatBlock {
    if !race.has_mechanic(RaceMechanic::Possession) {
        return StatBlock::zero();
    }

    let PossessionState::Target {
        race: target,
        subrace,
        level: body_level,
        extra,
    } = state
    else {
        return StatBlock::zero();
    };

    let Some(possessed) = catalog.race(target) else {
        warn!(race = %target, "unknown possession target, no bonus");
        return StatBlock::zero();
    };

    let possessed = possessed.resolve(subrace.as_deref());
    let base = possessed.base_stats(body_level.unwrap_or(level).min(MAX_LEVEL));

    StatTable::from_fn(|stat| {
        if stat.is_pool() {
            0.0
        } else {
            ((base[stat] + extra[stat].max(0.0)) * POSSESSION_RATE).floor()
        }
    })
}

/// Stats from possession
pub struct PossessionSource {
    stats: StatBlock,
}

impl PossessionSource {
    pub fn new(stats: StatBlock) -> Self {
        PossessionSource { stats }
    }
}

impl StatSource for PossessionSource {
    fn id(&self) -> &str {
        "possession"
    }

    fn stage(&self) -> Stage {
        Stage::Possession
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        stats.add_block(&self.stats);
    }
}
