//! Body-part assembly: depth-ordered regions holding their member parts
//!
//! Regions come from the `full` silhouette (plus a synthetic `rightitem`
//! region when an item is held), each bound to the geometry's `vertical`
//! record and the resolved parts its item list references. Action and
//! direction propagation happen here, before any asset is resolved.

use std::cmp::Ordering;

use crate::data::{AvatarActionInfo, BodyPart, GeometryData, PartSetsData};
use crate::parts::{AvatarPart, AvatarPartList};

/// The silhouette whose region list every composition starts from.
const AVATAR_SET: &str = "full";

/// The geometry kind carrying region depths and member radii.
pub(crate) const GEOMETRY_KIND: &str = "vertical";

/// Region id appended when the avatar holds an item.
const RIGHT_ITEM_REGION: &str = "rightitem";

/// One body region and the parts it owns for this composition.
#[derive(Debug)]
pub struct AvatarBodyPart {
    record: BodyPart,
    parts: Vec<AvatarPart>,
}

impl AvatarBodyPart {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn z(&self) -> f32 {
        self.record.z
    }

    pub fn parts(&self) -> &[AvatarPart] {
        &self.parts
    }

    /// Assign an action to the member parts its active set covers, leaving
    /// parts that already carry an action untouched - callers iterate in
    /// descending precedence, so the highest-precedence action wins.
    fn set_active_action(&mut self, action: &AvatarActionInfo, part_sets: &PartSetsData) {
        let Some(set_id) = action.active_part_set.as_deref() else {
            return;
        };
        let Some(active) = part_sets.get_active_part_set(set_id) else {
            log::warn!("action '{}' names unknown active part set '{}'", action.id, set_id);
            return;
        };

        for part in &mut self.parts {
            if part.action().is_none() && active.contains(part.part_type()) {
                part.set_active_action(action);
            }
        }
    }

    fn set_direction(&mut self, direction: i32) {
        for part in &mut self.parts {
            part.set_direction(direction);
        }
    }

    /// Member parts ordered by the geometry's per-item draw radius; members
    /// the geometry does not list are excluded.
    pub fn sorted_parts(&self, geometry: &GeometryData) -> Vec<&AvatarPart> {
        let mut with_radius: Vec<(&AvatarPart, f32)> = self
            .parts
            .iter()
            .filter_map(|part| {
                geometry
                    .get_body_part_item(GEOMETRY_KIND, self.id(), part.part_type())
                    .map(|item| (part, item.radius))
            })
            .collect();

        with_radius.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        with_radius.into_iter().map(|(part, _)| part).collect()
    }
}

/// All regions of one composition, ascending by depth.
#[derive(Debug)]
pub struct AvatarBodyPartList {
    body_parts: Vec<AvatarBodyPart>,
}

impl AvatarBodyPartList {
    /// Bind the resolved parts to their regions. Regions without a geometry
    /// record are dropped.
    pub fn new(geometry: &GeometryData, mut part_list: AvatarPartList, has_item: bool) -> Self {
        let mut region_ids: Vec<&str> =
            geometry.get_body_parts(AVATAR_SET).iter().map(String::as_str).collect();
        if has_item {
            region_ids.push(RIGHT_ITEM_REGION);
        }

        let mut body_parts: Vec<AvatarBodyPart> = region_ids
            .into_iter()
            .filter_map(|id| geometry.get_body_part(GEOMETRY_KIND, id).cloned())
            .map(|record| {
                let parts = part_list.take_parts_for_body_part(&record);
                AvatarBodyPart { record, parts }
            })
            .collect();

        body_parts.sort_by(|a, b| a.z().partial_cmp(&b.z()).unwrap_or(Ordering::Equal));

        Self { body_parts }
    }

    pub fn get(&self, id: &str) -> Option<&AvatarBodyPart> {
        self.body_parts.iter().find(|body_part| body_part.id() == id)
    }

    pub fn body_parts(&self) -> &[AvatarBodyPart] {
        &self.body_parts
    }

    /// Propagate the precedence-sorted actions to member parts; within each
    /// part the first action whose active set covers it wins.
    pub fn apply_actions(&mut self, actions: &[AvatarActionInfo], part_sets: &PartSetsData) {
        for action in actions {
            for body_part in &mut self.body_parts {
                body_part.set_active_action(action, part_sets);
            }
        }
    }

    /// The head region faces the head direction; every other region faces
    /// the body direction.
    pub fn set_body_part_direction(&mut self, direction: i32, head_direction: i32) {
        for body_part in &mut self.body_parts {
            if body_part.id() == "head" {
                body_part.set_direction(head_direction);
            } else {
                body_part.set_direction(direction);
            }
        }
    }
}
