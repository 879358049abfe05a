//! ModifierSource - Stats from an equipped capsule

use crate::catalog::Modifier;
use crate::source::StatSource;
use crate::stat_block::{Stage, StatAccumulator};

/// Stats from one equipped modifier
pub struct ModifierSource<'a> {
    modifier: &'a Modifier,
}

impl<'a> ModifierSource<'a> {
    pub fn new(modifier: &'a Modifier) -> Self {
        ModifierSource { modifier }
    }
}

impl StatSource for ModifierSource<'_> {
    fn id(&self) -> &str {
        &self.modifier.name
    }

    fn stage(&self) -> Stage {
        Stage::Modifiers
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        for (stat, bonus) in self.modifier.effective_bonuses() {
            if bonus.percentage {
                stats.multiply_floor(stat, 1.0 + bonus.value);
            } else {
                stats.add_flat(stat, bonus.value);
            }
        }
    }
}
