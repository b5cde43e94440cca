//! Clan decomposition of a person collection into rooted descent trees.
//!
//! # Responsibility
//! - Find clan roots (persons with no recorded parent).
//! - Build one flat descent tree per root, attaching one spouse per node.
//! - Rank clans and assign display colors deterministically.
//!
//! # Invariants
//! - Output is a pure function of the input slice and options.
//! - A root already reached by an earlier clan opens no clan of its own.
//! - Within one clan a person reached twice is a dead end the second time,
//!   so cyclic data terminates.
//! - Persons unreachable from any root are omitted without error.
//! - Traversal uses an explicit work-list; tree depth never grows the call
//!   stack.

use crate::model::person::{Person, PersonId};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// Fixed clan color palette, cycled by clan rank.
pub const PALETTE: [&str; 8] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#9c755f",
];

/// Returns the palette color for a clan rank.
pub fn color_for_index(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Which part of each clan is expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Full descent trees.
    #[default]
    All,
    /// Only the focus couple keeps its children; every other node is a leaf.
    Units,
}

/// Options for [`decompose`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClanOptions {
    pub mode: ViewMode,
    /// Person whose children stay visible in `ViewMode::Units`.
    pub focus_id: Option<PersonId>,
    /// Person whose clan is always ranked first.
    pub default_focus_id: Option<PersonId>,
}

/// One tree slot: a person, an optional attached spouse, and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClanNode {
    pub person_id: PersonId,
    pub spouse_id: Option<PersonId>,
    /// Generation below the clan root; the root is 0.
    pub generation: usize,
    /// Indices into the owning clan's node list.
    pub children: Vec<usize>,
}

/// A rooted descent tree derived from the person collection.
///
/// Nodes are stored flat in pre-order: index 0 is the root and every child
/// index is greater than its parent's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clan {
    pub root_id: PersonId,
    pub name: String,
    nodes: Vec<ClanNode>,
    /// Tree nodes plus attached spouses.
    pub member_count: usize,
    /// Rank in the sorted clan list; selects the palette color.
    pub color_index: usize,
}

impl Clan {
    /// Returns this clan's palette color.
    pub fn color(&self) -> &'static str {
        color_for_index(self.color_index)
    }

    /// Returns every tree node in pre-order. Never empty.
    pub fn nodes(&self) -> &[ClanNode] {
        &self.nodes
    }

    /// Returns the root node.
    pub fn root(&self) -> &ClanNode {
        &self.nodes[0]
    }

    /// Returns the direct children of `node`, in discovery order.
    pub fn children<'c>(
        &'c self,
        node: &'c ClanNode,
    ) -> impl Iterator<Item = &'c ClanNode> + 'c {
        node.children.iter().filter_map(|index| self.nodes.get(*index))
    }

    /// Returns the number of generations in the tree.
    pub fn depth(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| node.generation + 1)
            .max()
            .unwrap_or(0)
    }

    /// Returns every person id in the clan, spouses included.
    pub fn member_ids(&self) -> Vec<&PersonId> {
        self.nodes
            .iter()
            .flat_map(|node| std::iter::once(&node.person_id).chain(node.spouse_id.iter()))
            .collect()
    }

    /// Returns whether `person_id` is a node or attached spouse in this clan.
    pub fn contains(&self, person_id: &str) -> bool {
        self.member_ids().into_iter().any(|id| id == person_id)
    }
}

/// Partitions `people` into clans ordered for display.
pub fn decompose(people: &[Person], options: &ClanOptions) -> Vec<Clan> {
    let by_id: HashMap<&str, &Person> = people
        .iter()
        .map(|person| (person.id.as_str(), person))
        .collect();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut clans = Vec::new();

    for root in people.iter().filter(|person| person.is_root()) {
        if visited.contains(root.id.as_str()) {
            continue;
        }
        let nodes = build_tree(root, &by_id, &mut visited, options);
        let member_count = nodes.len() + nodes.iter().filter(|n| n.spouse_id.is_some()).count();
        clans.push(Clan {
            root_id: root.id.clone(),
            name: clan_name(root),
            nodes,
            member_count,
            color_index: 0,
        });
    }

    let default_focus = options.default_focus_id.as_deref();
    clans.sort_by_key(|clan| {
        let holds_focus = default_focus.map_or(false, |id| clan.contains(id));
        (!holds_focus, Reverse(clan.member_count))
    });
    for (index, clan) in clans.iter_mut().enumerate() {
        clan.color_index = index;
    }

    debug!(
        "event=clan_decompose module=clan status=ok people={} clans={} mode={:?}",
        people.len(),
        clans.len(),
        options.mode
    );
    clans
}

fn clan_name(root: &Person) -> String {
    if root.last_name.trim().is_empty() {
        root.first_name.clone()
    } else {
        root.last_name.clone()
    }
}

/// Builds one clan tree with an explicit work-list.
///
/// A node is pushed before any of its children are taken off the stack, so
/// the returned list is in pre-order and the root is always present.
fn build_tree<'a>(
    root: &'a Person,
    by_id: &HashMap<&'a str, &'a Person>,
    visited: &mut HashSet<&'a str>,
    options: &ClanOptions,
) -> Vec<ClanNode> {
    let focus = options.focus_id.as_deref();
    let mut seen: HashSet<&'a str> = HashSet::new();
    let mut nodes: Vec<ClanNode> = Vec::new();
    let mut stack: Vec<(&'a Person, Option<usize>)> = vec![(root, None)];

    while let Some((person, parent)) = stack.pop() {
        let id = person.id.as_str();
        if !seen.insert(id) {
            continue;
        }
        visited.insert(id);

        let spouse_id = person
            .spouse_ids
            .iter()
            .map(String::as_str)
            .find(|spouse| by_id.contains_key(spouse));
        if let Some(spouse) = spouse_id {
            visited.insert(spouse);
        }

        let index = nodes.len();
        let generation = parent.map_or(0, |parent| nodes[parent].generation + 1);
        nodes.push(ClanNode {
            person_id: id.to_string(),
            spouse_id: spouse_id.map(str::to_string),
            generation,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            nodes[parent].children.push(index);
        }

        let expand = match options.mode {
            ViewMode::All => true,
            ViewMode::Units => focus.is_some() && (focus == Some(id) || focus == spouse_id),
        };
        if expand {
            for child_id in person.children_ids.iter().rev() {
                if let Some(&child) = by_id.get(child_id.as_str()) {
                    stack.push((child, Some(index)));
                }
            }
        }
    }

    nodes
}
