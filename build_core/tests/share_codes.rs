//! Integration test: Selections -> Share code -> Selections

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use build_core::prelude::*;
use build_core::share::code_from_url;

fn catalog() -> Catalog {
    Catalog::reference().expect("reference catalog should load")
}

fn sample_build(catalog: &Catalog) -> BuildSelections {
    let mut sel = BuildSelections::new(catalog);
    sel.select_race("Alien", catalog);
    sel.select_subrace("Yardratian", catalog);
    sel.set_level(120);
    sel.set_manual(StatKind::HpMax, 30);
    sel.set_manual(StatKind::Speed, 45);
    sel.toggle_form(3, MasteryTier::Perfected, catalog);
    sel.toggle_form(4, MasteryTier::Mastered, catalog);
    sel.equip_modifier(0, Some(6), catalog);
    sel.equip_modifier(2, Some(8), catalog);
    let instant = catalog
        .moves
        .iter()
        .position(|m| m.name == "Instant Transmission")
        .expect("Instant Transmission");
    sel.equip_move(9, Some(instant), catalog);
    sel.equip_move(0, Some(0), catalog);
    sel
}

#[test]
fn test_roundtrip_restores_selections() {
    let catalog = catalog();
    let sel = sample_build(&catalog);
    assert_eq!(sel.forms().len(), 2);

    let code = encode(&sel, &catalog);
    assert!(!code.contains('='));
    assert!(!code.contains('+'));
    assert!(!code.contains('/'));

    let decoded = decode(&code, &catalog).expect("own code should decode");
    assert_eq!(decoded, sel);
    assert_eq!(
        decoded.compose(&catalog).final_stats(),
        sel.compose(&catalog).final_stats()
    );
}

#[test]
fn test_roundtrip_through_url() {
    let catalog = catalog();
    let sel = sample_build(&catalog);
    let url = share_url("https://builder.example/", &encode(&sel, &catalog)).expect("valid base url");
    let code = code_from_url(&url).expect("url carries a code");
    assert_eq!(decode(&code, &catalog).expect("decodes"), sel);
}

#[test]
fn test_legacy_standard_base64_with_padding() {
    let catalog = catalog();
    let json = r#"{"r":"S","l":7,"m":{"hpMax":0,"kiMax":0,"meleeDamage":2,"kiDamage":0,"meleeResistance":0,"kiResistance":0,"speed":0},"f":[],"c":[-1,-1,-1,-1],"mv":[-1,-1,-1,-1,-1,-1,-1,-1,-1,-1]}"#;
    let code = STANDARD.encode(json);
    assert!(code.ends_with('='));

    let sel = decode(&code, &catalog).expect("legacy code should decode");
    assert_eq!(sel.race(), "Saiyan");
    assert_eq!(sel.level(), 7);
    assert_eq!(sel.manual().get(StatKind::MeleeDamage), 2.0);
}

#[test]
fn test_out_of_range_indices_leave_slots_empty() {
    let catalog = catalog();
    let json = r#"{"r":"H","l":10,"c":[6,9999,-1,8],"mv":[0,5000]}"#;
    let sel = decode(&URL_SAFE_NO_PAD.encode(json), &catalog).expect("decodes");

    assert_eq!(sel.modifiers.slots(), &[Some(6), None, None, Some(8)]);
    assert_eq!(sel.moves.get(0), Some(0));
    assert_eq!(sel.moves.get(1), None);
    assert_eq!(sel.compose(&catalog).final_stats().hp_max, 30.0);
}

#[test]
fn test_manual_points_are_clamped_on_decode() {
    let catalog = catalog();
    let json = r#"{"r":"H","l":10,"m":{"hpMax":8,"speed":8,"kiMax":-4}}"#;
    let sel = decode(&URL_SAFE_NO_PAD.encode(json), &catalog).expect("decodes");

    assert_eq!(sel.manual().get(StatKind::HpMax), 8.0);
    assert_eq!(sel.manual().get(StatKind::KiMax), 0.0);
    assert_eq!(sel.manual().get(StatKind::Speed), 2.0);
    assert_eq!(sel.free_points(), 0.0);
}

#[test]
fn test_subrace_ignored_for_races_without_presets() {
    let catalog = catalog();
    let json = r#"{"r":"H","l":3,"as":"Beerus"}"#;
    let sel = decode(&URL_SAFE_NO_PAD.encode(json), &catalog).expect("decodes");
    assert_eq!(sel.race(), "Human");
    assert_eq!(sel.subrace(), None);
}

#[test]
fn test_garbage_is_an_error_and_defaults_are_kept() {
    let catalog = catalog();
    for code in ["", "not base64 at all!", "bm90IGpzb24"] {
        assert!(decode(code, &catalog).is_err(), "{:?} should not decode", code);
        assert_eq!(decode_or_default(code, &catalog), BuildSelections::new(&catalog));
    }
}
