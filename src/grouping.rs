//! Row grouping for justified gallery layouts.
//!
//! A sequence of entities is cut into groups of at most `group_size`
//! members. Each entity can opt into sharing a row with its neighbours via
//! `groupBefore` / `groupAfter`; a missing or false flag is a boundary.
//!
//! Within a finished group every member gets a `groupRatio`: its aspect
//! ratio divided by the sum of the group's aspect ratios. Rendered at a
//! common height, members sized by `groupRatio` fill the row exactly.
//!
//! ```text
//! ratios   1.5   0.5   1.0      group ratio = 3.0
//! shares   0.5   1/6   1/3      (sum = 1)
//! ```

use crate::types::{Thumbnail, null_as_default};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// A content item as it arrives from the asset service.
///
/// Only the fields the grouper reads are typed; everything else rides along
/// in `fields` and is serialized back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_before: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_after: bool,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Entity {
    /// Aspect ratio used for layout: the thumbnail's when it has one,
    /// otherwise the entity's own, otherwise 0.
    pub fn layout_ratio(&self) -> f64 {
        self.thumbnail
            .as_ref()
            .and_then(|t| t.ratio)
            .or(self.ratio)
            .unwrap_or(0.0)
    }
}

/// An entity placed in a group, with its share of the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedEntity {
    #[serde(flatten)]
    pub entity: Entity,
    pub group_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Sum of the members' layout ratios.
    pub ratio: f64,
    pub entities: Vec<GroupedEntity>,
}

impl Group {
    fn finalize(members: Vec<Entity>) -> Self {
        let ratios: Vec<f64> = members.iter().map(Entity::layout_ratio).collect();
        let ratio: f64 = ratios.iter().sum();
        let equal_share = !(ratio.is_finite() && ratio > 0.0);
        if equal_share {
            debug!(
                members = members.len(),
                ratio, "group has no usable aspect ratio, sharing equally"
            );
        }
        let count = members.len() as f64;

        let entities = members
            .into_iter()
            .zip(ratios)
            .map(|(mut entity, own)| {
                // a stale share from earlier grouping would serialize twice
                entity.fields.remove("groupRatio");
                GroupedEntity {
                    entity,
                    group_ratio: if equal_share { 1.0 / count } else { own / ratio },
                }
            })
            .collect();

        Self { ratio, entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Partition `entities` into groups of at most `group_size` members.
///
/// Pass `usize::MAX` for unbounded groups. The input is never modified;
/// every group member is a fresh copy. An entity still waiting for a
/// neighbour when the input ends closes its group anyway.
pub fn group_entities(entities: &[Entity], group_size: usize) -> Vec<Group> {
    let group_size = group_size.max(1);
    let mut groups = Vec::new();
    let mut open: Vec<Entity> = Vec::new();

    for entity in entities {
        if !open.is_empty() && (!entity.group_before || open.len() >= group_size) {
            groups.push(Group::finalize(std::mem::take(&mut open)));
        }

        open.push(entity.clone());

        if !entity.group_after || open.len() >= group_size {
            groups.push(Group::finalize(std::mem::take(&mut open)));
        }
    }

    if !open.is_empty() {
        groups.push(Group::finalize(open));
    }

    groups
}
