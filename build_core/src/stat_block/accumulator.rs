//! StatAccumulator - Running stat block threaded through the pipeline stages

use crate::source::StatSource;
use crate::stat_block::StatBlock;
use crate::types::{MasteryTier, StatKind};
use serde::{Deserialize, Serialize};

/// Pipeline stages, in the order they are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Base,
    Manual,
    Forms,
    Absorption,
    Possession,
    Modifiers,
}

impl Stage {
    pub fn all() -> &'static [Stage] {
        &[
            Stage::Base,
            Stage::Manual,
            Stage::Forms,
            Stage::Absorption,
            Stage::Possession,
            Stage::Modifiers,
        ]
    }

    /// Default source priority for this stage (lower applies first)
    pub fn priority(&self) -> i32 {
        match self {
            Stage::Base => -100,
            Stage::Manual => -50,
            Stage::Forms => 0,
            Stage::Absorption => 100,
            Stage::Possession => 150,
            Stage::Modifiers => 200,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Base => "Base",
            Stage::Manual => "Manual",
            Stage::Forms => "Forms",
            Stage::Absorption => "Absorption",
            Stage::Possession => "Possession",
            Stage::Modifiers => "Modifiers",
        }
    }
}

/// Stat block as it stood after a stage finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSnapshot {
    pub stage: Stage,
    /// Ids of the sources applied in this stage, in application order
    pub sources: Vec<String>,
    pub stats: StatBlock,
}

/// Stat block right after one active form was applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormStep {
    pub form: String,
    pub tier: MasteryTier,
    pub stats: StatBlock,
}

/// Every intermediate stat block of one pipeline run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatBreakdown {
    /// One snapshot per stage, in stage order
    pub stages: Vec<StageSnapshot>,
    /// One entry per applied form, in activation order
    pub form_steps: Vec<FormStep>,
}

impl StatBreakdown {
    /// Snapshot after `stage`
    pub fn after(&self, stage: Stage) -> Option<&StatBlock> {
        self.stages.iter().find(|s| s.stage == stage).map(|s| &s.stats)
    }

    /// Result of the last stage
    pub fn final_stats(&self) -> StatBlock {
        self.stages.last().map(|s| s.stats).unwrap_or_default()
    }
}

/// Accumulates stat changes from all sources
///
/// Unlike a flat/increased/more model every operation is applied
/// immediately, so the order sources run in is observable in the result.
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    stats: StatBlock,
    breakdown: StatBreakdown,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current running values
    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    /// `stats[s] += value`
    pub fn add_flat(&mut self, stat: StatKind, value: f64) {
        self.stats[stat] += value;
    }

    /// `stats[s] = floor(stats[s] * factor)`
    pub fn multiply_floor(&mut self, stat: StatKind, factor: f64) {
        self.stats[stat] = (self.stats[stat] * factor).floor();
    }

    /// Add every stat of `block`
    pub fn add_block(&mut self, block: &StatBlock) {
        for (stat, value) in block.iter() {
            self.stats[stat] += *value;
        }
    }

    /// Record the running values after one active form
    pub fn record_form_step(&mut self, form: &str, tier: MasteryTier) {
        self.breakdown.form_steps.push(FormStep {
            form: form.to_string(),
            tier,
            stats: self.stats,
        });
    }

    fn close_stage(&mut self, stage: Stage, sources: Vec<String>) {
        self.breakdown.stages.push(StageSnapshot {
            stage,
            sources,
            stats: self.stats,
        });
    }

    /// Run every source stage by stage and return all snapshots.
    ///
    /// Within a stage sources run by priority; the sort is stable so sources
    /// with equal priority keep the order they were given in.
    pub fn run(sources: &[Box<dyn StatSource + '_>]) -> StatBreakdown {
        let mut sorted: Vec<&Box<dyn StatSource + '_>> = sources.iter().collect();
        sorted.sort_by_key(|s| s.priority());

        let mut acc = StatAccumulator::new();
        for stage in Stage::all() {
            let mut applied = Vec::new();
            for source in sorted.iter().filter(|s| s.stage() == *stage) {
                source.apply(&mut acc);
                applied.push(source.id().to_string());
            }
            acc.close_stage(*stage, applied);
        }
        acc.breakdown
    }
}
