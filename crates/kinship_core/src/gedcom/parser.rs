//! Record reader and linker for the interchange format.
//!
//! # Responsibility
//! - Group tokenized lines into person and family records.
//! - Extract the fields the core understands into typed intermediates.
//! - Materialize `Person` values and apply family links.
//!
//! # Invariants
//! - Parsing never fails; unrecognized lines are skipped.
//! - Output ids are unique: a repeated person xref keeps its first record.
//! - Output satisfies spouse symmetry and parent/child agreement.

use crate::gedcom::line::{xref_id, GedcomLine};
use crate::model::person::{Gender, Person, PersonId};
use log::debug;
use std::collections::HashMap;

const TAG_INDI: &str = "INDI";
const TAG_FAM: &str = "FAM";
const TAG_NAME: &str = "NAME";
const TAG_SEX: &str = "SEX";
const TAG_BIRT: &str = "BIRT";
const TAG_DEAT: &str = "DEAT";
const TAG_DATE: &str = "DATE";
const TAG_PLAC: &str = "PLAC";
const TAG_HUSB: &str = "HUSB";
const TAG_WIFE: &str = "WIFE";
const TAG_CHIL: &str = "CHIL";

/// Counters describing one parse run. Contains no record content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub persons: usize,
    pub families: usize,
    /// Lines that did not tokenize, or fell outside any open record.
    pub skipped_lines: usize,
    /// Family references (husband, wife or child) naming no known person.
    pub unresolved_refs: usize,
    /// Person records dropped because their xref was already used.
    pub duplicate_persons: usize,
}

/// Parses interchange text into linked persons.
///
/// Returns an empty list when no usable records were found.
pub fn parse(text: &str) -> Vec<Person> {
    parse_with_report(text).0
}

/// Parses interchange text and also returns run counters.
pub fn parse_with_report(text: &str) -> (Vec<Person>, ParseReport) {
    let mut reader = RecordReader::default();
    for raw in text.trim_start_matches('\u{feff}').lines() {
        reader.feed(raw);
    }
    reader.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Birth,
    Death,
}

/// Person record in progress.
#[derive(Debug, Default)]
struct RawPerson {
    id: PersonId,
    name: Option<String>,
    sex: Option<String>,
    birth_date: Option<String>,
    birth_place: Option<String>,
    death_date: Option<String>,
    /// Event block the following level-2+ lines belong to.
    current_event: Option<EventKind>,
    /// Event the next `DATE` is attributed to. Cleared once a date is seen.
    armed_date: Option<EventKind>,
}

/// Family record in progress.
#[derive(Debug, Default)]
struct RawFamily {
    husband: Option<PersonId>,
    wife: Option<PersonId>,
    children: Vec<PersonId>,
}

#[derive(Debug)]
enum RawRecord {
    Person(RawPerson),
    Family(RawFamily),
}

#[derive(Debug, Default)]
struct RecordReader {
    current: Option<RawRecord>,
    persons: Vec<RawPerson>,
    families: Vec<RawFamily>,
    skipped_lines: usize,
}

impl RecordReader {
    fn feed(&mut self, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }
        let Some(line) = GedcomLine::parse(raw) else {
            self.skipped_lines += 1;
            return;
        };

        if line.level == 0 {
            self.close_current();
            self.current = open_record(&line);
            if self.current.is_none() {
                self.skipped_lines += 1;
            }
            return;
        }

        match self.current.as_mut() {
            Some(RawRecord::Person(person)) => person.apply(&line),
            Some(RawRecord::Family(family)) => family.apply(&line),
            None => self.skipped_lines += 1,
        }
    }

    fn close_current(&mut self) {
        match self.current.take() {
            Some(RawRecord::Person(person)) => self.persons.push(person),
            Some(RawRecord::Family(family)) => self.families.push(family),
            None => {}
        }
    }

    fn finish(mut self) -> (Vec<Person>, ParseReport) {
        self.close_current();

        let mut report = ParseReport {
            families: self.families.len(),
            skipped_lines: self.skipped_lines,
            ..ParseReport::default()
        };

        let mut index_by_id: HashMap<PersonId, usize> = HashMap::new();
        let mut people: Vec<Person> = Vec::with_capacity(self.persons.len());
        for raw in self.persons {
            if index_by_id.contains_key(&raw.id) {
                debug!("event=gedcom_duplicate_xref module=gedcom status=skipped");
                report.duplicate_persons += 1;
                continue;
            }
            index_by_id.insert(raw.id.clone(), people.len());
            people.push(raw.into_person());
        }

        for family in &self.families {
            report.unresolved_refs += link_family(&mut people, &index_by_id, family);
        }

        report.persons = people.len();
        (people, report)
    }
}

fn open_record(line: &GedcomLine<'_>) -> Option<RawRecord> {
    let id = line.xref.and_then(xref_id)?;
    if line.is_tag(TAG_INDI) {
        return Some(RawRecord::Person(RawPerson {
            id: id.to_string(),
            ..RawPerson::default()
        }));
    }
    if line.is_tag(TAG_FAM) {
        return Some(RawRecord::Family(RawFamily::default()));
    }
    None
}

impl RawPerson {
    fn apply(&mut self, line: &GedcomLine<'_>) {
        if line.level == 1 {
            self.current_event = None;
            if line.is_tag(TAG_NAME) {
                if self.name.is_none() {
                    self.name = Some(line.value.to_string());
                }
            } else if line.is_tag(TAG_SEX) {
                self.sex = Some(line.value.to_string());
            } else if line.is_tag(TAG_BIRT) {
                self.current_event = Some(EventKind::Birth);
                self.armed_date = Some(EventKind::Birth);
            } else if line.is_tag(TAG_DEAT) {
                self.current_event = Some(EventKind::Death);
                self.armed_date = Some(EventKind::Death);
            }
            return;
        }

        if line.is_tag(TAG_DATE) {
            if let Some(kind) = self.armed_date.take() {
                let slot = match kind {
                    EventKind::Birth => &mut self.birth_date,
                    EventKind::Death => &mut self.death_date,
                };
                set_first(slot, line.value);
            }
        } else if line.is_tag(TAG_PLAC) && self.current_event == Some(EventKind::Birth) {
            set_first(&mut self.birth_place, line.value);
        }
    }

    fn into_person(self) -> Person {
        let mut person = Person::with_id(self.id);
        if let Some(raw_name) = self.name.as_deref() {
            let (first, last) = split_name(raw_name);
            if let Some(first) = first {
                person.first_name = first;
            }
            person.last_name = last;
        }
        person.gender = self
            .sex
            .as_deref()
            .map_or(Gender::Unknown, Gender::from_code);
        person.is_living = self.death_date.is_none();
        person.birth_date = self.birth_date;
        person.birth_place = self.birth_place;
        person.death_date = self.death_date;
        person
    }
}

impl RawFamily {
    fn apply(&mut self, line: &GedcomLine<'_>) {
        if line.level != 1 {
            return;
        }
        let Some(id) = xref_id(line.value) else {
            return;
        };
        if line.is_tag(TAG_HUSB) {
            self.husband = Some(id.to_string());
        } else if line.is_tag(TAG_WIFE) {
            self.wife = Some(id.to_string());
        } else if line.is_tag(TAG_CHIL) {
            self.children.push(id.to_string());
        }
    }
}

fn set_first(slot: &mut Option<String>, value: &str) {
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

/// Splits a raw name into `(first, last)`.
///
/// Surname slashes are dropped; the last whitespace token is the last name
/// and a single token is taken entirely as first name. `first` is `None`
/// when the name holds no tokens.
fn split_name(raw: &str) -> (Option<String>, String) {
    let cleaned = raw.replace('/', " ");
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    match tokens.as_slice() {
        [] => (None, String::new()),
        [only] => (Some((*only).to_string()), String::new()),
        [rest @ .., last] => (Some(rest.join(" ")), (*last).to_string()),
    }
}

/// Applies one family record. Returns the number of unresolved references.
fn link_family(
    people: &mut [Person],
    index_by_id: &HashMap<PersonId, usize>,
    family: &RawFamily,
) -> usize {
    let mut unresolved = 0;
    let mut resolve = |id: &Option<PersonId>| -> Option<usize> {
        let id = id.as_ref()?;
        let found = index_by_id.get(id).copied();
        if found.is_none() {
            unresolved += 1;
        }
        found
    };

    let husband = resolve(&family.husband);
    let wife = resolve(&family.wife);

    if let (Some(h), Some(w)) = (husband, wife) {
        if h != w {
            let wife_id = people[w].id.clone();
            let husband_id = people[h].id.clone();
            people[h].add_spouse(&wife_id);
            people[w].add_spouse(&husband_id);
        }
    }

    for child_id in &family.children {
        let Some(c) = index_by_id.get(child_id).copied() else {
            unresolved += 1;
            continue;
        };
        if let Some(h) = husband.filter(|h| *h != c) {
            people[c].father_id = Some(people[h].id.clone());
            people[h].add_child(child_id);
        }
        if let Some(w) = wife.filter(|w| *w != c) {
            people[c].mother_id = Some(people[w].id.clone());
            people[w].add_child(child_id);
        }
    }

    unresolved
}
