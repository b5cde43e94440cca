use kinship_core::{color_for_index, decompose, parse, ClanOptions, Person, ViewMode, PALETTE};
use std::collections::HashMap;

fn chain(ids: &[&str]) -> Vec<Person> {
    let mut people: Vec<Person> = ids
        .iter()
        .map(|id| {
            let mut person = Person::with_id(*id);
            person.first_name = id.to_uppercase();
            person.last_name = "Lineage".to_string();
            person
        })
        .collect();
    for index in 1..people.len() {
        let parent_id = people[index - 1].id.clone();
        let child_id = people[index].id.clone();
        people[index - 1].add_child(&child_id);
        people[index].father_id = Some(parent_id);
    }
    people
}

const TWO_CLANS: &str = "\
0 @I1@ INDI
1 NAME Mario /Rossi/
0 @I2@ INDI
1 NAME Anna /Bianchi/
0 @I3@ INDI
1 NAME Luigi /Rossi/
0 @I4@ INDI
1 NAME Sofia /Rossi/
0 @I5@ INDI
1 NAME Teo /Verdi/
0 @I6@ INDI
1 NAME Ugo /Verdi/
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
1 CHIL @I4@
0 @F2@ FAM
1 HUSB @I5@
1 CHIL @I6@
";

#[test]
fn single_lineage_yields_one_clan_of_three() {
    let people = chain(&["a", "b", "c"]);
    let clans = decompose(&people, &ClanOptions::default());

    assert_eq!(clans.len(), 1);
    assert_eq!(clans[0].root_id, "a");
    assert_eq!(clans[0].member_count, 3);
    assert_eq!(clans[0].name, "Lineage");
    assert_eq!(clans[0].depth(), 3);
}

#[test]
fn every_person_lands_in_exactly_one_clan() {
    let people = parse(TWO_CLANS);
    let clans = decompose(&people, &ClanOptions::default());

    let mut seen: HashMap<String, usize> = HashMap::new();
    for clan in &clans {
        for id in clan.member_ids() {
            *seen.entry(id.clone()).or_default() += 1;
        }
    }
    assert_eq!(seen.len(), people.len());
    assert!(seen.values().all(|count| *count == 1));
}

#[test]
fn spouse_root_is_absorbed_into_partner_clan() {
    let people = parse(TWO_CLANS);
    let clans = decompose(&people, &ClanOptions::default());

    assert_eq!(clans.len(), 2);
    let rossi = &clans[0];
    assert_eq!(rossi.root_id, "I1");
    assert_eq!(rossi.root().spouse_id.as_deref(), Some("I2"));
    assert_eq!(rossi.member_count, 4);
    let children: Vec<&str> = rossi
        .children(rossi.root())
        .map(|node| node.person_id.as_str())
        .collect();
    assert_eq!(children, vec!["I3", "I4"]);
}

#[test]
fn clans_sorted_by_size_with_colors_by_rank() {
    let people = parse(TWO_CLANS);
    let clans = decompose(&people, &ClanOptions::default());

    assert!(clans[0].member_count >= clans[1].member_count);
    assert_eq!(clans[0].color_index, 0);
    assert_eq!(clans[1].color_index, 1);
    assert_eq!(clans[1].color(), color_for_index(1));
    assert_eq!(clans[1].color(), PALETTE[1]);
}

#[test]
fn default_focus_clan_is_ranked_first() {
    let people = parse(TWO_CLANS);
    let options = ClanOptions {
        default_focus_id: Some("I6".to_string()),
        ..ClanOptions::default()
    };
    let clans = decompose(&people, &options);

    assert_eq!(clans[0].root_id, "I5");
    assert_eq!(clans[0].color_index, 0);
    assert_eq!(clans[1].root_id, "I1");
}

#[test]
fn units_mode_expands_only_the_focus_couple() {
    let mut people = parse(TWO_CLANS);
    people.extend(chain(&["x", "y", "z"]));

    let options = ClanOptions {
        mode: ViewMode::Units,
        focus_id: Some("I2".to_string()),
        default_focus_id: None,
    };
    let clans = decompose(&people, &options);

    let rossi = clans.iter().find(|clan| clan.root_id == "I1").unwrap();
    assert_eq!(rossi.root().children.len(), 2);

    let verdi = clans.iter().find(|clan| clan.root_id == "I5").unwrap();
    assert!(verdi.root().children.is_empty());
    assert_eq!(verdi.member_count, 1);

    let lineage = clans.iter().find(|clan| clan.root_id == "x").unwrap();
    assert!(lineage.root().children.is_empty());
}

#[test]
fn units_mode_without_focus_truncates_every_root() {
    let people = chain(&["a", "b"]);
    let options = ClanOptions {
        mode: ViewMode::Units,
        ..ClanOptions::default()
    };
    let clans = decompose(&people, &options);
    assert_eq!(clans.len(), 1);
    assert!(clans[0].root().children.is_empty());
}

#[test]
fn cyclic_children_terminate() {
    let mut people = chain(&["a", "b", "c"]);
    // c lists a as its child, closing a loop back to the root.
    people[2].add_child("a");
    let clans = decompose(&people, &ClanOptions::default());

    assert_eq!(clans.len(), 1);
    assert_eq!(clans[0].member_count, 3);
    assert_eq!(clans[0].depth(), 3);
}

#[test]
fn person_without_reachable_root_is_dropped() {
    let mut people = chain(&["a", "b"]);
    let mut orphan = Person::with_id("orphan");
    orphan.father_id = Some("missing".to_string());
    people.push(orphan);

    let clans = decompose(&people, &ClanOptions::default());
    assert_eq!(clans.len(), 1);
    assert!(!clans[0].contains("orphan"));
}

#[test]
fn decomposition_is_repeatable() {
    let people = parse(TWO_CLANS);
    let options = ClanOptions::default();
    assert_eq!(decompose(&people, &options), decompose(&people, &options));
}

#[test]
fn deep_lineage_decomposes_without_exhausting_the_stack() {
    let ids: Vec<String> = (0..60_000).map(|i| format!("g{i}")).collect();
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let people = chain(&refs);

    let clans = decompose(&people, &ClanOptions::default());
    assert_eq!(clans.len(), 1);
    assert_eq!(clans[0].member_count, 60_000);
    assert_eq!(clans[0].depth(), 60_000);
    assert_eq!(clans[0].nodes().last().map(|node| node.generation), Some(59_999));
    drop(clans);
}
