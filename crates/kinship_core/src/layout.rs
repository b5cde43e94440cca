//! Tidy-tree layout for clans sharing one canvas.
//!
//! # Responsibility
//! - Assign every person a card position and every parent/child edge an
//!   orthogonal polyline.
//! - Pack clans left to right so their extents never intersect.
//!
//! # Invariants
//! - Every tree slot reserves room for a couple: two cards plus the spouse
//!   gap, whether or not a spouse is attached.
//! - Sibling subtrees occupy disjoint horizontal intervals; a parent is
//!   centered over its first and last child.
//! - `y` grows by `generation_spacing` per generation.
//! - Positions are card centers.
//! - Measuring and placement are index-order passes over a clan's node list,
//!   so tree depth never grows the call stack.

use crate::clan::{Clan, ClanNode};
use crate::model::person::PersonId;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Geometry constants for [`layout`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParams {
    pub card_width: f64,
    pub card_height: f64,
    /// Horizontal gap between the two cards of a couple.
    pub spouse_gap: f64,
    /// Horizontal gap between adjacent sibling subtrees.
    pub sibling_gap: f64,
    /// Vertical distance between generations, center to center.
    pub generation_spacing: f64,
    /// Horizontal gap between adjacent clans. Must be positive.
    pub clan_margin: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            card_width: 160.0,
            card_height: 64.0,
            spouse_gap: 16.0,
            sibling_gap: 32.0,
            generation_spacing: 140.0,
            clan_margin: 120.0,
        }
    }
}

impl LayoutParams {
    /// Width reserved by one tree slot.
    pub fn footprint(&self) -> f64 {
        2.0 * self.card_width + self.spouse_gap
    }

    /// Horizontal distance from a slot center to either card of a couple.
    fn couple_offset(&self) -> f64 {
        (self.card_width + self.spouse_gap) / 2.0
    }

    /// Validates geometry before layout.
    ///
    /// # Errors
    /// - Card sizes, generation spacing and the clan margin must be finite
    ///   and positive, so adjacent clans never share an edge.
    /// - Gaps must be finite and non-negative.
    /// - Generation spacing must exceed card height so generations never
    ///   overlap.
    pub fn validate(&self) -> Result<(), LayoutParamsError> {
        for (field, value) in [
            ("card_width", self.card_width),
            ("card_height", self.card_height),
            ("generation_spacing", self.generation_spacing),
            ("clan_margin", self.clan_margin),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutParamsError::NotPositive { field, value });
            }
        }
        for (field, value) in [
            ("spouse_gap", self.spouse_gap),
            ("sibling_gap", self.sibling_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutParamsError::Negative { field, value });
            }
        }
        if self.generation_spacing <= self.card_height {
            return Err(LayoutParamsError::GenerationsOverlap {
                generation_spacing: self.generation_spacing,
                card_height: self.card_height,
            });
        }
        Ok(())
    }
}

/// Invalid layout geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutParamsError {
    NotPositive {
        field: &'static str,
        value: f64,
    },
    Negative {
        field: &'static str,
        value: f64,
    },
    GenerationsOverlap {
        generation_spacing: f64,
        card_height: f64,
    },
}

impl Display for LayoutParamsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPositive { field, value } => {
                write!(f, "layout `{field}` must be a positive number, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "layout `{field}` must not be negative, got {value}")
            }
            Self::GenerationsOverlap {
                generation_spacing,
                card_height,
            } => write!(
                f,
                "generation spacing {generation_spacing} must exceed card height {card_height}"
            ),
        }
    }
}

impl Error for LayoutParamsError {}

/// Canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What a link connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Parent slot to child card.
    Descent,
    /// Between the two cards of a couple.
    Spouse,
}

/// Polyline between two cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub kind: LinkKind,
    pub source_id: PersonId,
    pub target_id: PersonId,
    pub points: Vec<Point>,
}

/// Horizontal span covered by one clan's cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClanExtent {
    pub root_id: PersonId,
    pub min_x: f64,
    pub max_x: f64,
}

/// Layout output handed to the drawing surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub positions: BTreeMap<PersonId, Point>,
    pub links: Vec<Link>,
    /// One entry per laid-out clan, left to right.
    pub extents: Vec<ClanExtent>,
}

/// Lays out every clan whose root is not in `hidden`.
///
/// `params` is expected to have passed [`LayoutParams::validate`].
pub fn layout(clans: &[Clan], params: &LayoutParams, hidden: &HashSet<PersonId>) -> Layout {
    let mut out = Layout::default();
    let mut cursor = 0.0;

    for clan in clans.iter().filter(|clan| !hidden.contains(&clan.root_id)) {
        let nodes = clan.nodes();
        let mut slots = measure(nodes, params);
        arrange(nodes, &mut slots, cursor, params);
        let (min_x, max_x) = emit(nodes, &slots, params, &mut out);
        out.extents.push(ClanExtent {
            root_id: clan.root_id.clone(),
            min_x,
            max_x,
        });
        cursor += slots.first().map_or(0.0, |root| root.width) + params.clan_margin;
    }

    debug!(
        "event=layout module=layout status=ok clans={} hidden={} persons={} links={}",
        out.extents.len(),
        clans.len() - out.extents.len(),
        out.positions.len(),
        out.links.len()
    );
    out
}

/// Horizontal allocation of one tree slot.
#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    width: f64,
    children_width: f64,
    left: f64,
    center: f64,
}

/// Computes subtree widths bottom-up.
///
/// Child indices are greater than their parent's, so a reverse scan visits
/// every child before its parent.
fn measure(nodes: &[ClanNode], params: &LayoutParams) -> Vec<Slot> {
    let mut slots = vec![Slot::default(); nodes.len()];
    for (index, node) in nodes.iter().enumerate().rev() {
        let gaps = params.sibling_gap * node.children.len().saturating_sub(1) as f64;
        let children_width = node
            .children
            .iter()
            .map(|child| slots[*child].width)
            .sum::<f64>()
            + gaps;
        slots[index].children_width = children_width;
        slots[index].width = params.footprint().max(children_width);
    }
    slots
}

/// Assigns each slot its interval top-down, then centers parents over their
/// first and last child bottom-up.
fn arrange(nodes: &[ClanNode], slots: &mut [Slot], left: f64, params: &LayoutParams) {
    if let Some(root) = slots.first_mut() {
        root.left = left;
    }
    for (index, node) in nodes.iter().enumerate() {
        let slot = slots[index];
        let mut child_left = slot.left + (slot.width - slot.children_width) / 2.0;
        for child in &node.children {
            slots[*child].left = child_left;
            child_left += slots[*child].width + params.sibling_gap;
        }
    }
    for (index, node) in nodes.iter().enumerate().rev() {
        slots[index].center = match (node.children.first(), node.children.last()) {
            (Some(first), Some(last)) => (slots[*first].center + slots[*last].center) / 2.0,
            _ => slots[index].left + slots[index].width / 2.0,
        };
    }
}

/// Writes positions and links for one arranged clan. Returns its extent.
fn emit(
    nodes: &[ClanNode],
    slots: &[Slot],
    params: &LayoutParams,
    out: &mut Layout,
) -> (f64, f64) {
    let half = params.card_width / 2.0;
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut record = |out: &mut Layout, person_id: &PersonId, point: Point| {
        min_x = min_x.min(point.x - half);
        max_x = max_x.max(point.x + half);
        out.positions.insert(person_id.clone(), point);
    };

    for (node, slot) in nodes.iter().zip(slots) {
        let y = params.card_height / 2.0 + node.generation as f64 * params.generation_spacing;
        let center = slot.center;
        let person_x = card_x(params, center, node.spouse_id.is_some());
        record(out, &node.person_id, Point::new(person_x, y));
        if let Some(spouse_id) = &node.spouse_id {
            let spouse_x = center + params.couple_offset();
            record(out, spouse_id, Point::new(spouse_x, y));
            out.links.push(Link {
                kind: LinkKind::Spouse,
                source_id: node.person_id.clone(),
                target_id: spouse_id.clone(),
                points: vec![
                    Point::new(person_x + half, y),
                    Point::new(spouse_x - half, y),
                ],
            });
        }

        let bottom = y + params.card_height / 2.0;
        let top = y + params.generation_spacing - params.card_height / 2.0;
        let mid = (bottom + top) / 2.0;
        for child in &node.children {
            let child_node = &nodes[*child];
            let target_x = card_x(params, slots[*child].center, child_node.spouse_id.is_some());
            out.links.push(Link {
                kind: LinkKind::Descent,
                source_id: node.person_id.clone(),
                target_id: child_node.person_id.clone(),
                points: vec![
                    Point::new(center, bottom),
                    Point::new(center, mid),
                    Point::new(target_x, mid),
                    Point::new(target_x, top),
                ],
            });
        }
    }

    (min_x, max_x)
}

/// X of the slot's own person card: left of center for a couple.
fn card_x(params: &LayoutParams, center: f64, has_spouse: bool) -> f64 {
    if has_spouse {
        center - params.couple_offset()
    } else {
        center
    }
}
