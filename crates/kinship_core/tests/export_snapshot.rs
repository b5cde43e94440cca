use kinship_core::{export_people, import_people, merge, parse, ExportError, Gender};
use std::collections::BTreeSet;

const SAMPLE: &str = "\
0 @I1@ INDI
1 NAME Mario /Rossi/
1 SEX M
1 BIRT
2 DATE 1 JAN 1900
2 PLAC Lucca
1 DEAT
2 DATE 3 MAR 1970
0 @I2@ INDI
1 NAME Anna /Bianchi/
1 SEX F
0 @I3@ INDI
1 NAME Luigi /Rossi/
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
";

#[test]
fn snapshot_reads_back_identical_people() {
    let mut people = parse(SAMPLE);
    people[1].notes = Some("line one\nline \"two\"".to_string());
    people[1].death_place = Some("Firenze".to_string());

    let text = export_people(&people).unwrap();
    let restored = import_people(&text).unwrap();

    assert_eq!(restored, people);
    assert_eq!(restored[0].gender, Gender::Male);
    assert!(!restored[0].is_living);
}

#[test]
fn snapshot_preserves_relation_membership_after_merge() {
    let merged = merge(&[], &parse(SAMPLE)).merged;
    let restored = import_people(&export_people(&merged).unwrap()).unwrap();

    for (before, after) in merged.iter().zip(&restored) {
        assert_eq!(before.id, after.id);
        let spouses_before: BTreeSet<_> = before.spouse_ids.iter().collect();
        let spouses_after: BTreeSet<_> = after.spouse_ids.iter().collect();
        assert_eq!(spouses_before, spouses_after);
        let children_before: BTreeSet<_> = before.children_ids.iter().collect();
        let children_after: BTreeSet<_> = after.children_ids.iter().collect();
        assert_eq!(children_before, children_after);
    }
}

#[test]
fn snapshot_uses_versioned_envelope() {
    let text = export_people(&parse(SAMPLE)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["format_version"], 1);
    assert_eq!(value["people"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["people"][0]["first_name"], "Mario");
    assert_eq!(value["people"][0]["gender"], "male");
}

#[test]
fn import_rejects_duplicate_ids() {
    let text = r#"{
        "format_version": 1,
        "people": [
            {"id": "x", "first_name": "A", "is_living": true},
            {"id": "x", "first_name": "B", "is_living": true}
        ]
    }"#;
    let err = import_people(text).unwrap_err();
    assert!(matches!(err, ExportError::DuplicateId(ref id) if id == "x"));
}

#[test]
fn import_fills_defaults_for_missing_optional_fields() {
    let text = r#"{"format_version": 1, "people": [{"id": "p", "first_name": "Zoe", "is_living": false}]}"#;
    let people = import_people(text).unwrap();
    assert_eq!(people[0].last_name, "");
    assert_eq!(people[0].gender, Gender::Unknown);
    assert!(people[0].spouse_ids.is_empty());
}

#[test]
fn empty_collection_round_trips() {
    let text = export_people(&[]).unwrap();
    assert!(import_people(&text).unwrap().is_empty());
}
