//! FormSource - Active transformations and their mastery tiers

use crate::catalog::Form;
use crate::source::StatSource;
use crate::stat_block::{Stage, StatAccumulator};
use crate::types::{BonusType, MasteryTier, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bonus of one form at a mastery tier.
///
/// Only stats the form lists are present. Flat stats are scaled by the
/// tier multiplier and floored. Multiplier-type stats and stats in
/// `ignore_mastery` keep their raw catalog value; tiers do not scale a
/// multiplicative factor. Earlier versions of the calculator multiplied
/// these factors by the tier as well.
pub fn form_bonus(form: &Form, tier: MasteryTier) -> BTreeMap<StatKind, f64> {
    let multiplier = form.multipliers().for_tier(tier);

    form.bonus_stats
        .iter()
        .map(|(stat, base)| {
            let value = if form.ignore_mastery.contains(stat) {
                *base
            } else {
                match form.effective_bonus_type(*stat) {
                    BonusType::Flat => (base * multiplier).floor(),
                    BonusType::Multiplier => *base,
                }
            };
            (*stat, value)
        })
        .collect()
}

/// A form toggled on at a mastery tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveForm {
    pub form: Form,
    pub tier: MasteryTier,
}

impl ActiveForm {
    pub fn new(form: Form, tier: MasteryTier) -> Self {
        ActiveForm { form, tier }
    }
}

/// Active forms in activation order.
///
/// Order is significant: forms are folded left to right, so a multiplier
/// applied after a flat bonus multiplies the bonus too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormStack {
    forms: Vec<ActiveForm>,
}

impl FormStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle `form` at `tier`:
    /// - active at the same tier: turned off
    /// - active at another tier: tier changed in place
    /// - non-stackable while another non-stackable is active: replaces it
    /// - otherwise appended
    pub fn toggle(&mut self, form: &Form, tier: MasteryTier) {
        if let Some(pos) = self.position(&form.name) {
            if self.forms[pos].tier == tier {
                self.forms.remove(pos);
            } else {
                self.forms[pos].tier = tier;
            }
            return;
        }

        if !form.stackable {
            self.forms.retain(|f| f.form.stackable);
        }
        self.forms.push(ActiveForm::new(form.clone(), tier));
    }

    /// Append without toggle semantics, still honoring exclusivity
    pub fn push(&mut self, active: ActiveForm) {
        if self.contains(&active.form.name) {
            return;
        }
        if !active.form.stackable {
            self.forms.retain(|f| f.form.stackable);
        }
        self.forms.push(active);
    }

    pub fn remove(&mut self, name: &str) -> Option<ActiveForm> {
        self.position(name).map(|pos| self.forms.remove(pos))
    }

    pub fn clear(&mut self) {
        self.forms.clear();
    }

    /// Keep only forms matching `keep`
    pub fn retain(&mut self, keep: impl FnMut(&ActiveForm) -> bool) {
        self.forms.retain(keep);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn tier_of(&self, name: &str) -> Option<MasteryTier> {
        self.position(name).map(|pos| self.forms[pos].tier)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActiveForm> {
        self.forms.iter()
    }

    pub fn as_slice(&self) -> &[ActiveForm] {
        &self.forms
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.forms.iter().position(|f| f.form.name == name)
    }
}

impl<'a> IntoIterator for &'a FormStack {
    type Item = &'a ActiveForm;
    type IntoIter = std::slice::Iter<'a, ActiveForm>;

    fn into_iter(self) -> Self::IntoIter {
        self.forms.iter()
    }
}

/// Stats from one active form
pub struct FormSource<'a> {
    active: &'a ActiveForm,
}

impl<'a> FormSource<'a> {
    pub fn new(active: &'a ActiveForm) -> Self {
        FormSource { active }
    }
}

impl StatSource for FormSource<'_> {
    fn id(&self) -> &str {
        &self.active.form.name
    }

    fn stage(&self) -> Stage {
        Stage::Forms
    }

    fn apply(&self, stats: &mut StatAccumulator) {
        let form = &self.active.form;
        for (stat, bonus) in form_bonus(form, self.active.tier) {
            match form.effective_bonus_type(stat) {
                BonusType::Multiplier => stats.multiply_floor(stat, bonus),
                BonusType::Flat => stats.add_flat(stat, bonus),
            }
        }
        stats.record_form_step(&form.name, self.active.tier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MasteryMultipliers;

    fn kaioken() -> Form {
        Form::new("Kaioken", BonusType::Multiplier)
            .with_bonus(StatKind::MeleeDamage, 2.0)
            .with_bonus(StatKind::MeleeResistance, 1.0)
    }

    fn mystic() -> Form {
        Form::new("Mystic", BonusType::Flat).with_bonus(StatKind::MeleeDamage, 130.0)
    }

    fn max_power() -> Form {
        Form::new("Max Power", BonusType::Flat)
            .stackable()
            .with_bonus(StatKind::KiMax, 90.0)
            .with_bonus(StatKind::MeleeDamage, 10.0)
            .ignoring_mastery(StatKind::KiMax)
    }

    #[test]
    fn test_flat_bonus_scales_with_tier() {
        let form = Form::new("Odd", BonusType::Flat).with_bonus(StatKind::Speed, 75.0);
        assert_eq!(form_bonus(&form, MasteryTier::Normal)[&StatKind::Speed], 75.0);
        // floor(75 * 1.25) = 93
        assert_eq!(form_bonus(&form, MasteryTier::Mastered)[&StatKind::Speed], 93.0);
        // floor(75 * 1.5) = 112
        assert_eq!(form_bonus(&form, MasteryTier::Perfected)[&StatKind::Speed], 112.0);
    }

    #[test]
    fn test_bonus_is_sparse() {
        let bonus = form_bonus(&mystic(), MasteryTier::Normal);
        assert_eq!(bonus.len(), 1);
        assert!(!bonus.contains_key(&StatKind::HpMax));
    }

    #[test]
    fn test_ignore_mastery_passes_raw_value() {
        for tier in MasteryTier::all() {
            let bonus = form_bonus(&max_power(), *tier);
            assert_eq!(bonus[&StatKind::KiMax], 90.0);
        }
        assert_eq!(form_bonus(&max_power(), MasteryTier::Perfected)[&StatKind::MeleeDamage], 15.0);
    }

    #[test]
    fn test_multiplier_factor_ignores_tier() {
        for tier in MasteryTier::all() {
            assert_eq!(form_bonus(&kaioken(), *tier)[&StatKind::MeleeDamage], 2.0);
        }
    }

    #[test]
    fn test_multiplier_with_ignore_mastery_uses_raw_factor() {
        let form = Form::new("Ascended", BonusType::Flat)
            .with_bonus(StatKind::Speed, 0.5)
            .with_stat_type(StatKind::Speed, BonusType::Multiplier)
            .ignoring_mastery(StatKind::Speed);
        let active = ActiveForm::new(form, MasteryTier::Perfected);
        let mut acc = StatAccumulator::new();
        acc.add_flat(StatKind::Speed, 41.0);
        FormSource::new(&active).apply(&mut acc);
        assert_eq!(acc.stats().speed, 20.0);
    }

    #[test]
    fn test_custom_multipliers() {
        let form = Form::new("Custom", BonusType::Flat)
            .with_bonus(StatKind::KiDamage, 10.0)
            .with_multipliers(MasteryMultipliers {
                normal: 1.0,
                mastered: 1.3,
                perfected: 2.0,
            });
        assert_eq!(form_bonus(&form, MasteryTier::Mastered)[&StatKind::KiDamage], 13.0);
        assert_eq!(form_bonus(&form, MasteryTier::Perfected)[&StatKind::KiDamage], 20.0);
    }

    #[test]
    fn test_form_source_multiplies_and_floors() {
        let active = ActiveForm::new(kaioken(), MasteryTier::Normal);
        let mut acc = StatAccumulator::new();
        acc.add_flat(StatKind::MeleeDamage, 8.0);
        acc.add_flat(StatKind::MeleeResistance, 5.0);
        FormSource::new(&active).apply(&mut acc);
        assert_eq!(acc.stats().melee_damage, 16.0);
        assert_eq!(acc.stats().melee_resistance, 5.0);
    }

    #[test]
    fn test_toggle_same_tier_removes() {
        let mut stack = FormStack::new();
        stack.toggle(&mystic(), MasteryTier::Normal);
        stack.toggle(&mystic(), MasteryTier::Normal);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_toggle_other_tier_updates_in_place() {
        let mut stack = FormStack::new();
        stack.toggle(&max_power(), MasteryTier::Normal);
        stack.toggle(&mystic(), MasteryTier::Normal);
        stack.toggle(&max_power(), MasteryTier::Perfected);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.as_slice()[0].form.name, "Max Power");
        assert_eq!(stack.tier_of("Max Power"), Some(MasteryTier::Perfected));
    }

    #[test]
    fn test_non_stackable_replaces_non_stackable_only() {
        let mut stack = FormStack::new();
        stack.toggle(&max_power(), MasteryTier::Normal);
        stack.toggle(&kaioken(), MasteryTier::Normal);
        stack.toggle(&mystic(), MasteryTier::Mastered);

        let names: Vec<&str> = stack.iter().map(|f| f.form.name.as_str()).collect();
        assert_eq!(names, vec!["Max Power", "Mystic"]);
    }

    #[test]
    fn test_push_honors_exclusivity() {
        let mut stack = FormStack::new();
        stack.push(ActiveForm::new(kaioken(), MasteryTier::Normal));
        stack.push(ActiveForm::new(mystic(), MasteryTier::Normal));
        stack.push(ActiveForm::new(mystic(), MasteryTier::Perfected));
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.tier_of("Mystic"), Some(MasteryTier::Normal));
    }
}
