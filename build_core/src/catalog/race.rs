//! Races, their growth tables and subrace presets

use crate::catalog::Form;
use crate::source::base_stats;
use crate::stat_block::{StatBlock, StatTable};
use crate::types::RaceMechanic;
use serde::{Deserialize, Serialize};

/// Every `every` levels the stat gains `amount`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRule {
    pub amount: f64,
    pub every: u32,
}

impl GrowthRule {
    pub fn new(amount: f64, every: u32) -> Self {
        GrowthRule { amount, every }
    }

    /// `floor(level / every) * amount`
    pub fn at_level(&self, level: u32) -> f64 {
        if self.every == 0 {
            return 0.0;
        }
        (level / self.every) as f64 * self.amount
    }
}

/// Growth rule per stat
pub type GrowthTable = StatTable<GrowthRule>;

/// Interchangeable growth preset of a race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subrace {
    pub name: String,
    pub growth: GrowthTable,
}

/// A playable race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub name: String,
    /// Short selector used in share codes
    pub code: String,
    pub growth: GrowthTable,
    /// Transformations, in catalog order (share codes index into this list)
    #[serde(default)]
    pub forms: Vec<Form>,
    /// Growth presets; the first one is the default
    #[serde(default)]
    pub subraces: Vec<Subrace>,
    #[serde(default)]
    pub mechanic: Option<RaceMechanic>,
}

impl Race {
    /// Base stats at `level`
    pub fn base_stats(&self, level: u32) -> StatBlock {
        base_stats(&self.growth, level)
    }

    pub fn has_subraces(&self) -> bool {
        !self.subraces.is_empty()
    }

    pub fn subrace(&self, name: &str) -> Option<&Subrace> {
        self.subraces.iter().find(|s| s.name == name)
    }

    /// The subrace `requested` resolves to: the matching preset, otherwise the
    /// default one. `None` for races without presets.
    pub fn resolve_subrace(&self, requested: Option<&str>) -> Option<&Subrace> {
        requested
            .and_then(|name| self.subrace(name))
            .or_else(|| self.subraces.first())
    }

    /// Copy of this race using the growth table of the resolved subrace
    pub fn resolve(&self, requested: Option<&str>) -> Race {
        let mut race = self.clone();
        if let Some(sub) = self.resolve_subrace(requested) {
            race.growth = sub.growth;
        }
        race
    }

    pub fn form(&self, index: usize) -> Option<&Form> {
        self.forms.get(index)
    }

    pub fn form_index(&self, name: &str) -> Option<usize> {
        self.forms.iter().position(|f| f.name == name)
    }

    /// Forms selectable with the given subrace, with their catalog index
    pub fn available_forms<'a>(
        &'a self,
        subrace: Option<&'a str>,
    ) -> impl Iterator<Item = (usize, &'a Form)> + 'a {
        let resolved = self.resolve_subrace(subrace).map(|s| s.name.as_str());
        self.forms
            .iter()
            .enumerate()
            .filter(move |(_, f)| f.available_to(resolved))
    }

    pub fn has_mechanic(&self, mechanic: RaceMechanic) -> bool {
        self.mechanic == Some(mechanic)
    }
}
