use kinship_core::{parse, parse_with_report, Gender, Person, UNKNOWN_FIRST_NAME};

fn find<'a>(people: &'a [Person], id: &str) -> &'a Person {
    people
        .iter()
        .find(|person| person.id == id)
        .unwrap_or_else(|| panic!("person {id} should exist"))
}

fn assert_spouse_symmetry(people: &[Person]) {
    for person in people {
        for spouse_id in &person.spouse_ids {
            let spouse = find(people, spouse_id);
            assert!(spouse.spouse_ids.contains(&person.id));
        }
    }
}

fn assert_parent_child_consistency(people: &[Person]) {
    for person in people {
        for parent_id in person.father_id.iter().chain(person.mother_id.iter()) {
            let parent = find(people, parent_id);
            assert!(parent.children_ids.contains(&person.id));
        }
    }
}

const FAMILY: &str = "\
0 HEAD
1 CHAR UTF-8
0 @I1@ INDI
1 NAME Mario /Rossi/
1 SEX M
1 BIRT
2 DATE 1 JAN 1900
2 PLAC Lucca
0 @I2@ INDI
1 NAME Anna /Bianchi/
1 SEX F
0 @I3@ INDI
1 NAME Luigi /Rossi/
1 SEX M
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
0 TRLR
";

#[test]
fn single_person_record_is_materialized() {
    let text = "0 @I1@ INDI\n1 NAME Mario /Rossi/\n1 SEX M\n1 BIRT\n2 DATE 1 JAN 1900\n";
    let people = parse(text);

    assert_eq!(people.len(), 1);
    let mario = &people[0];
    assert_eq!(mario.id, "I1");
    assert_eq!(mario.first_name, "Mario");
    assert_eq!(mario.last_name, "Rossi");
    assert_eq!(mario.gender, Gender::Male);
    assert_eq!(mario.birth_date.as_deref(), Some("1 JAN 1900"));
    assert!(mario.is_living);
}

#[test]
fn family_record_links_spouses_and_child() {
    let people = parse(FAMILY);
    assert_eq!(people.len(), 3);

    let father = find(&people, "I1");
    let mother = find(&people, "I2");
    let child = find(&people, "I3");

    assert_eq!(father.spouse_ids, vec!["I2".to_string()]);
    assert_eq!(mother.spouse_ids, vec!["I1".to_string()]);
    assert_eq!(child.father_id.as_deref(), Some("I1"));
    assert_eq!(child.mother_id.as_deref(), Some("I2"));
    assert_eq!(father.children_ids, vec!["I3".to_string()]);
    assert_eq!(mother.children_ids, vec!["I3".to_string()]);
    assert_eq!(father.birth_place.as_deref(), Some("Lucca"));

    assert_spouse_symmetry(&people);
    assert_parent_child_consistency(&people);
}

#[test]
fn death_date_marks_person_deceased_and_first_dates_win() {
    let text = "\
0 @I1@ INDI
1 NAME Giovanni /Verdi/
1 BIRT
2 DATE 1850
1 BIRT
2 DATE 1851
1 DEAT
2 DATE 1920
2 PLAC Pisa
1 DEAT
2 DATE 1921
";
    let people = parse(text);
    let person = &people[0];
    assert_eq!(person.birth_date.as_deref(), Some("1850"));
    assert_eq!(person.death_date.as_deref(), Some("1920"));
    assert!(!person.is_living);
    assert_eq!(person.death_place, None);
    assert_eq!(person.birth_place, None);
}

#[test]
fn date_without_open_event_is_ignored() {
    let text = "0 @I1@ INDI\n1 NAME Ada\n1 BIRT\n2 DATE 1900\n2 DATE 1901\n1 RESI\n2 DATE 1950\n";
    let people = parse(text);
    assert_eq!(people[0].birth_date.as_deref(), Some("1900"));
    assert_eq!(people[0].death_date, None);
}

#[test]
fn name_defaults_and_first_name_block_wins() {
    let text = "\
0 @I1@ INDI
1 NAME Giuseppe
1 NAME Other /Name/
0 @I2@ INDI
1 SEX X
";
    let people = parse(text);
    assert_eq!(people[0].first_name, "Giuseppe");
    assert_eq!(people[0].last_name, "");
    assert_eq!(people[1].first_name, UNKNOWN_FIRST_NAME);
    assert_eq!(people[1].gender, Gender::Unknown);
}

#[test]
fn malformed_and_unknown_lines_are_skipped() {
    let text = "\
garbage line
0 @N1@ NOTE something
1 CONT ignored
0 @I1@ INDI
1 NAME Lia /Neri/
not a gedcom line
0 HEAD
1 NAME Should /Ignore/
";
    let (people, report) = parse_with_report(text);
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].first_name, "Lia");
    assert_eq!(report.persons, 1);
    assert!(report.skipped_lines >= 4);
}

#[test]
fn empty_or_recordless_input_yields_empty_list() {
    assert!(parse("").is_empty());
    assert!(parse("0 HEAD\n0 TRLR\n").is_empty());
}

#[test]
fn family_with_missing_spouse_links_present_side() {
    let text = "\
0 @I1@ INDI
1 NAME Rosa /Conti/
1 SEX F
0 @I2@ INDI
1 NAME Piero /Conti/
0 @F1@ FAM
1 HUSB @I99@
1 WIFE @I1@
1 CHIL @I2@
1 CHIL @I2@
1 CHIL @I77@
";
    let (people, report) = parse_with_report(text);
    let mother = find(&people, "I1");
    let child = find(&people, "I2");

    assert!(mother.spouse_ids.is_empty());
    assert_eq!(mother.children_ids, vec!["I2".to_string()]);
    assert_eq!(child.mother_id.as_deref(), Some("I1"));
    assert_eq!(child.father_id, None);
    assert_eq!(report.unresolved_refs, 2);
    assert_parent_child_consistency(&people);
}

#[test]
fn repeated_family_does_not_duplicate_relations() {
    let text = format!("{FAMILY}0 @F2@ FAM\n1 HUSB @I1@\n1 WIFE @I2@\n1 CHIL @I3@\n");
    let people = parse(&text);
    assert_eq!(find(&people, "I1").spouse_ids.len(), 1);
    assert_eq!(find(&people, "I1").children_ids.len(), 1);
    assert_eq!(find(&people, "I2").children_ids.len(), 1);
}

#[test]
fn duplicate_person_xref_keeps_first_record() {
    let text = "0 @I1@ INDI\n1 NAME First\n0 @I1@ INDI\n1 NAME Second\n";
    let (people, report) = parse_with_report(text);
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].first_name, "First");
    assert_eq!(report.duplicate_persons, 1);
}

#[test]
fn children_keep_discovery_order_across_families() {
    let text = "\
0 @I1@ INDI
1 NAME Padre /Galli/
0 @I2@ INDI
1 NAME Prima /Galli/
0 @I3@ INDI
1 NAME Seconda /Galli/
0 @I4@ INDI
1 NAME Madre /Uno/
0 @I5@ INDI
1 NAME Madre /Due/
0 @F2@ FAM
1 HUSB @I1@
1 WIFE @I5@
1 CHIL @I3@
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I4@
1 CHIL @I2@
";
    let people = parse(text);
    let father = find(&people, "I1");
    assert_eq!(father.children_ids, vec!["I3".to_string(), "I2".to_string()]);
    assert_eq!(father.spouse_ids.len(), 2);
    assert_spouse_symmetry(&people);
    assert_parent_child_consistency(&people);
}
