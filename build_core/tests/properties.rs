//! Property-based tests for the stat pipeline and share codes
//!
//! Tests invariants:
//! - Base stats grow linearly in whole intervals
//! - Manual points never exceed the level
//! - Higher mastery never lowers a flat bonus
//! - Ignored stats pass through every tier unchanged
//! - Share codes round-trip and never panic on arbitrary input

use build_core::catalog::GrowthRule;
use build_core::prelude::*;
use build_core::source::{base_stats, form_bonus};
use build_core::stat_block::StatTable;
use proptest::prelude::*;

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

fn arb_stat() -> impl Strategy<Value = StatKind> {
    prop::sample::select(StatKind::all().to_vec())
}

fn arb_tier() -> impl Strategy<Value = MasteryTier> {
    prop::sample::select(MasteryTier::all().to_vec())
}

fn arb_growth() -> impl Strategy<Value = GrowthRule> {
    (0.5f64..3.0, 1u32..10).prop_map(|(amount, every)| GrowthRule::new(amount, every))
}

/// Edits a user could make, replayed against fresh selections
#[derive(Debug, Clone)]
enum Edit {
    Level(i64),
    Manual(StatKind, i64),
    QuickMax(StatKind),
    Race(usize),
    Form(usize, MasteryTier),
    Modifier(usize, usize),
    Move(usize, usize),
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (-20i64..400).prop_map(Edit::Level),
        (arb_stat(), -50i64..400).prop_map(|(s, v)| Edit::Manual(s, v)),
        arb_stat().prop_map(Edit::QuickMax),
        (0usize..9).prop_map(Edit::Race),
        (0usize..8, arb_tier()).prop_map(|(i, t)| Edit::Form(i, t)),
        (0usize..4, 0usize..120).prop_map(|(s, i)| Edit::Modifier(s, i)),
        (0usize..10, 0usize..120).prop_map(|(s, i)| Edit::Move(s, i)),
    ]
}

fn apply(sel: &mut BuildSelections, edit: &Edit, catalog: &Catalog) {
    match edit {
        Edit::Level(level) => {
            sel.set_level(*level);
        }
        Edit::Manual(stat, value) => {
            sel.set_manual(*stat, *value);
        }
        Edit::QuickMax(stat) => {
            sel.quick_max(*stat);
        }
        Edit::Race(index) => {
            if let Some(name) = catalog.races.get(*index).map(|r| r.name.clone()) {
                sel.select_race(&name, catalog);
            }
        }
        Edit::Form(index, tier) => {
            sel.toggle_form(*index, *tier, catalog);
        }
        Edit::Modifier(slot, index) => {
            sel.equip_modifier(*slot, Some(*index), catalog);
        }
        Edit::Move(slot, index) => {
            sel.equip_move(*slot, Some(*index), catalog);
        }
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: base stats are the growth amount times whole intervals
    #[test]
    fn prop_base_stats_linear(rule in arb_growth(), level in 0u32..=305) {
        let growth = StatTable::from_fn(|_| rule);
        let stats = base_stats(&growth, level);
        let expected = (level / rule.every) as f64 * rule.amount;
        for (_, value) in stats.iter() {
            prop_assert!((value - expected).abs() < 1e-9);
        }
    }

    /// Property: base stats never shrink as the level rises
    #[test]
    fn prop_base_stats_monotonic(rule in arb_growth(), level in 0u32..305) {
        let growth = StatTable::from_fn(|_| rule);
        let low = base_stats(&growth, level);
        let high = base_stats(&growth, level + 1);
        for stat in StatKind::all() {
            prop_assert!(high[*stat] >= low[*stat]);
        }
    }

    /// Property: spent manual points stay within the level after any edits
    #[test]
    fn prop_point_budget(edits in prop::collection::vec(arb_edit(), 0..40)) {
        let catalog = Catalog::reference().unwrap();
        let mut sel = BuildSelections::new(&catalog);
        for edit in &edits {
            apply(&mut sel, edit, &catalog);
            prop_assert!(sel.manual().spent() <= sel.level() as f64);
            prop_assert!(sel.free_points() >= 0.0);
            for (_, points) in sel.manual().stats().iter() {
                prop_assert!(*points >= 0.0);
            }
        }
    }

    /// Property: at most one non-stackable form is active after any edits
    #[test]
    fn prop_single_non_stackable(edits in prop::collection::vec(arb_edit(), 0..40)) {
        let catalog = Catalog::reference().unwrap();
        let mut sel = BuildSelections::new(&catalog);
        for edit in &edits {
            apply(&mut sel, edit, &catalog);
            let exclusive = sel.forms().iter().filter(|f| !f.form.stackable).count();
            prop_assert!(exclusive <= 1);
        }
    }

    /// Property: a higher tier never lowers a non-negative flat bonus
    #[test]
    fn prop_mastery_monotonic(stat in arb_stat(), value in 0.0f64..500.0) {
        let form = Form::new("Probe", BonusType::Flat).with_bonus(stat, value);
        let normal = form_bonus(&form, MasteryTier::Normal)[&stat];
        let mastered = form_bonus(&form, MasteryTier::Mastered)[&stat];
        let perfected = form_bonus(&form, MasteryTier::Perfected)[&stat];
        prop_assert!(normal <= mastered);
        prop_assert!(mastered <= perfected);
    }

    /// Property: ignored stats keep their raw value at every tier
    #[test]
    fn prop_ignore_mastery_passthrough(stat in arb_stat(), value in -300.0f64..300.0, tier in arb_tier()) {
        let form = Form::new("Probe", BonusType::Flat)
            .with_bonus(stat, value)
            .ignoring_mastery(stat);
        prop_assert_eq!(form_bonus(&form, tier)[&stat], value);
    }

    /// Property: decoding an encoded build gives back the same selections
    #[test]
    fn prop_share_roundtrip(edits in prop::collection::vec(arb_edit(), 0..30)) {
        let catalog = Catalog::reference().unwrap();
        let mut sel = BuildSelections::new(&catalog);
        for edit in &edits {
            apply(&mut sel, edit, &catalog);
        }
        let decoded = decode(&encode(&sel, &catalog), &catalog).unwrap();
        prop_assert_eq!(decoded, sel);
    }

    /// Property: arbitrary text either decodes or errors, never panics
    #[test]
    fn prop_decode_never_panics(code in "\\PC{0,80}") {
        let catalog = Catalog::reference().unwrap();
        let _ = decode(&code, &catalog);
    }

    /// Property: any JSON object payload decodes to a valid build
    #[test]
    fn prop_decode_tolerates_bad_fields(
        race in "[A-Z]{0,2}",
        level in -1000i64..1000,
        modifiers in prop::collection::vec(-5i64..200, 0..8),
        forms in prop::collection::vec((0u64..12, "[0-4]"), 0..6),
    ) {
        let catalog = Catalog::reference().unwrap();
        let payload = serde_json::json!({
            "r": race,
            "l": level,
            "c": modifiers,
            "f": forms.iter().map(|(i, s)| serde_json::json!({ "i": i, "s": s })).collect::<Vec<_>>(),
        });
        let code = base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            payload.to_string(),
        );
        let sel = decode(&code, &catalog).unwrap();
        prop_assert!(sel.level() <= MAX_LEVEL);
        prop_assert!(sel.forms().iter().filter(|f| !f.form.stackable).count() <= 1);
        let stats = sel.compose(&catalog).final_stats();
        for (_, value) in stats.iter() {
            prop_assert!(value.is_finite());
        }
    }
}
