//! Merge engine for reconciling an incoming batch with an existing graph.
//!
//! # Responsibility
//! - Give every incoming record a fresh id so independent batches never
//!   collide.
//! - Resolve incoming records against existing ones by normalized name and
//!   optional birth date, filling blanks and unioning relations.
//! - Keep relation ids consistent when an incoming record is folded into an
//!   existing one.
//!
//! # Invariants
//! - Inputs are never mutated; the result owns new records.
//! - `stats.added + stats.updated == incoming.len()`.
//! - An empty incoming batch returns `existing` unchanged.
//!
//! # Known limitation
//! - Two different people sharing a name with no birth date on either side
//!   are treated as one. Resolution is first match in scan order.

use crate::model::person::{Person, PersonId};
use log::info;
use std::collections::HashMap;
use uuid::Uuid;

/// Provenance marker placed between existing and merged notes.
pub const MERGED_NOTES_MARKER: &str = "[merged]";

/// Counters returned by [`merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub updated: usize,
}

/// Merged collection plus counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub merged: Vec<Person>,
    pub stats: MergeStats,
}

/// Merges `incoming` into `existing`.
pub fn merge(existing: &[Person], incoming: &[Person]) -> MergeOutcome {
    let mut merged = existing.to_vec();
    let mut stats = MergeStats::default();
    let mut working = remap_incoming(incoming);

    for index in 0..working.len() {
        let candidate = working[index].clone();
        match find_match(&merged, &candidate) {
            Some(target) => {
                absorb(&mut merged[target], &candidate);
                let resolved_id = merged[target].id.clone();
                retarget(&mut working[index + 1..], &candidate.id, &resolved_id);
                retarget(&mut merged, &candidate.id, &resolved_id);
                stats.updated += 1;
            }
            None => {
                merged.push(candidate);
                stats.added += 1;
            }
        }
    }

    if !incoming.is_empty() {
        info!(
            "event=merge module=merge status=ok existing={} incoming={} added={} updated={}",
            existing.len(),
            incoming.len(),
            stats.added,
            stats.updated
        );
    }

    MergeOutcome { merged, stats }
}

/// Returns working copies of `incoming` with fresh ids and rewritten
/// relations. Relation ids outside the batch are dropped.
fn remap_incoming(incoming: &[Person]) -> Vec<Person> {
    let mut table: HashMap<&str, PersonId> = HashMap::with_capacity(incoming.len());
    let fresh_ids: Vec<PersonId> = incoming
        .iter()
        .map(|person| {
            let fresh = Uuid::new_v4().to_string();
            table.entry(person.id.as_str()).or_insert_with(|| fresh.clone());
            fresh
        })
        .collect();

    let lookup = |id: &PersonId| table.get(id.as_str()).cloned();

    incoming
        .iter()
        .zip(fresh_ids)
        .map(|(person, fresh_id)| {
            let mut copy = person.clone();
            copy.id = fresh_id;
            copy.father_id = person.father_id.as_ref().and_then(lookup);
            copy.mother_id = person.mother_id.as_ref().and_then(lookup);
            copy.spouse_ids = dedup(person.spouse_ids.iter().filter_map(lookup));
            copy.children_ids = dedup(person.children_ids.iter().filter_map(lookup));
            copy
        })
        .collect()
}

fn dedup(ids: impl Iterator<Item = PersonId>) -> Vec<PersonId> {
    let mut out: Vec<PersonId> = Vec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Returns whether `a` and `b` are taken to be the same person.
pub fn is_same_person(a: &Person, b: &Person) -> bool {
    if normalize(&a.first_name) != normalize(&b.first_name) {
        return false;
    }
    if normalize(&a.last_name) != normalize(&b.last_name) {
        return false;
    }
    if is_blank(&a.birth_date) || is_blank(&b.birth_date) {
        return true;
    }
    a.birth_date.as_deref().map(str::trim) == b.birth_date.as_deref().map(str::trim)
}

fn find_match(pool: &[Person], candidate: &Person) -> Option<usize> {
    pool.iter().position(|person| is_same_person(person, candidate))
}

/// Folds `incoming` into `target`, filling blanks and unioning relations.
fn absorb(target: &mut Person, incoming: &Person) {
    fill_blank(&mut target.birth_date, &incoming.birth_date);
    fill_blank(&mut target.birth_place, &incoming.birth_place);
    fill_blank(&mut target.death_place, &incoming.death_place);
    if fill_blank(&mut target.death_date, &incoming.death_date) {
        target.is_living = false;
    }
    append_notes(&mut target.notes, &incoming.notes);

    for spouse_id in &incoming.spouse_ids {
        if spouse_id != &target.id {
            target.add_spouse(spouse_id);
        }
    }
    for child_id in &incoming.children_ids {
        if child_id != &target.id {
            target.add_child(child_id);
        }
    }
    if target.father_id.is_none() {
        target.father_id = incoming.father_id.clone();
    }
    if target.mother_id.is_none() {
        target.mother_id = incoming.mother_id.clone();
    }
}

fn fill_blank(slot: &mut Option<String>, incoming: &Option<String>) -> bool {
    if is_blank(slot) && !is_blank(incoming) {
        *slot = incoming.clone();
        return true;
    }
    false
}

fn append_notes(target: &mut Option<String>, incoming: &Option<String>) {
    let Some(addition) = incoming.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    match target.as_mut() {
        Some(existing) if !existing.trim().is_empty() => {
            if !existing.contains(addition) {
                existing.push_str(&format!("\n{MERGED_NOTES_MARKER} {addition}"));
            }
        }
        _ => *target = Some(addition.to_string()),
    }
}

fn retarget(people: &mut [Person], from: &str, to: &str) {
    for person in people {
        retarget_one(person, from, to);
    }
}

/// Rewrites every relation of `person` naming `from` so it names `to`.
fn retarget_one(person: &mut Person, from: &str, to: &str) {
    for slot in [&mut person.father_id, &mut person.mother_id] {
        if slot.as_deref() == Some(from) {
            *slot = Some(to.to_string());
        }
    }
    let self_id = person.id.clone();
    for list in [&mut person.spouse_ids, &mut person.children_ids] {
        if !list.iter().any(|id| id == from) {
            continue;
        }
        let rewritten = list
            .drain(..)
            .map(|id| if id == from { to.to_string() } else { id })
            .filter(|id| id != &self_id);
        let rewritten = dedup(rewritten);
        *list = rewritten;
    }
}
