//! Part resolution: from a parsed look to concrete, colored avatar parts
//!
//! Each look entry contributes the figure parts of its selected set, colored
//! positionally from the resolved palette colors. The four base types (left
//! hand, right hand, body, head) are guaranteed a part even when the look
//! omits them, so a minimal or malformed look still renders a figure.

use std::collections::{HashMap, HashSet};

use crate::asset::{AssetError, AvatarAsset};
use crate::data::{
    AnimationData, AvatarActionInfo, BodyPart, FigureData, FigurePart, PartSetsData,
};
use crate::definition::{AvatarDrawPart, DrawMode};
use crate::direction::normalize_direction;
use crate::library::AssetLibraryCollection;
use crate::look::Look;

/// Set types that always have at least one part, injected when absent.
const BASE_PART_SET: &[&str] = &["lh", "rh", "bd", "hd"];

/// A figure part bound to its resolved color and, once assembly has run,
/// its active action and facing direction.
#[derive(Debug, Clone)]
pub struct AvatarPart {
    part: FigurePart,
    color: Option<u32>,
    action: Option<AvatarActionInfo>,
    direction: Option<u8>,
}

impl AvatarPart {
    fn new(part: FigurePart, color: Option<u32>) -> Self {
        Self { part, color, action: None, direction: None }
    }

    pub fn part_type(&self) -> &str {
        &self.part.part_type
    }

    pub fn id(&self) -> i32 {
        self.part.id
    }

    pub fn index(&self) -> usize {
        self.part.index
    }

    pub fn color(&self) -> Option<u32> {
        self.color
    }

    pub fn action(&self) -> Option<&AvatarActionInfo> {
        self.action.as_ref()
    }

    pub fn direction(&self) -> Option<u8> {
        self.direction
    }

    pub(crate) fn set_active_action(&mut self, action: &AvatarActionInfo) {
        self.action = Some(action.clone());
    }

    pub(crate) fn set_direction(&mut self, direction: i32) {
        self.direction = Some(normalize_direction(direction));
    }

    /// Expand the part's animation frames and resolve each to a sprite.
    ///
    /// Actions without declared frames for this part type get a single
    /// synthetic frame; declared frames repeat themselves `repeats` times.
    /// Unresolvable frames are dropped; a part without an action or a
    /// direction contributes nothing.
    pub fn resolve_assets(
        &self,
        animation: &AnimationData,
        part_sets: &PartSetsData,
        libraries: &AssetLibraryCollection,
    ) -> Result<Vec<AvatarAsset>, AssetError> {
        let (Some(action), Some(direction)) = (self.action.as_ref(), self.direction) else {
            return Ok(Vec::new());
        };

        let flipped_part_type = part_sets
            .get_part_info(self.part_type())
            .and_then(|info| info.flipped_set_type.as_deref());

        let frames = animation.get_animation_frames(&action.id, self.part_type());

        let expanded: Vec<Option<&_>> = if frames.is_empty() {
            vec![None]
        } else {
            frames
                .iter()
                .flat_map(|frame| std::iter::repeat(Some(frame)).take(frame.repeats as usize))
                .collect()
        };

        let mut assets = Vec::new();
        for frame in expanded {
            let asset = AvatarAsset::for_frame(
                action,
                direction,
                self.part.id,
                self.part_type(),
                frame,
                flipped_part_type,
                (0.0, 0.0),
                libraries,
            )?;

            if let Some(asset) = asset {
                assets.push(asset);
            }
        }

        Ok(assets)
    }

    /// The part's draw-order entry, or `None` when no frame resolved.
    pub fn draw_part(
        &self,
        animation: &AnimationData,
        part_sets: &PartSetsData,
        libraries: &AssetLibraryCollection,
    ) -> Result<Option<AvatarDrawPart>, AssetError> {
        let assets = self.resolve_assets(animation, part_sets, libraries)?;
        if assets.is_empty() {
            return Ok(None);
        }

        let colored = self.part.colorable && self.part.part_type != "ey";

        Ok(Some(AvatarDrawPart {
            part_type: self.part.part_type.clone(),
            index: self.part.index,
            mode: if colored { DrawMode::Colored } else { DrawMode::JustImage },
            color: if self.part.colorable { self.color } else { None },
            assets,
            z: 0.0,
        }))
    }
}

/// Every resolved part of one composition, grouped by part type, plus the
/// hidden-layer set the look's selections declared.
#[derive(Debug)]
pub struct AvatarPartList {
    parts_by_type: HashMap<String, Vec<AvatarPart>>,
    hidden_layers: HashSet<String>,
}

impl AvatarPartList {
    /// Resolve a parsed look against the figure table.
    pub fn from_look(look: &Look, figure: &FigureData, item: Option<i32>) -> Self {
        let mut parts_by_type: HashMap<String, Vec<AvatarPart>> = HashMap::new();
        let mut hidden_layers = HashSet::new();

        let register = |parts_by_type: &mut HashMap<String, Vec<AvatarPart>>,
                        part: AvatarPart| {
            parts_by_type
                .entry(part.part_type().to_string())
                .or_default()
                .push(part);
        };

        for (set_type, entry) in look {
            for layer in figure.get_hidden_layers(set_type, entry.set_id) {
                hidden_layers.insert(layer.clone());
            }

            let parts = figure.get_parts(set_type, entry.set_id);
            if parts.is_empty() {
                continue;
            }

            // Unresolvable color ids drop out; the first resolved color is
            // the fallback for part indices beyond the supplied list.
            let colors: Vec<u32> = entry
                .color_ids
                .iter()
                .filter_map(|id| figure.get_color(set_type, *id))
                .collect();

            for part in parts {
                let color = colors.get(part.index).or(colors.first()).copied();
                register(&mut parts_by_type, AvatarPart::new(part.clone(), color));
            }
        }

        // A held item draws as a right-hand item part with the item's id.
        if let Some(item_id) = item {
            register(
                &mut parts_by_type,
                AvatarPart::new(
                    FigurePart {
                        id: item_id,
                        part_type: "ri".to_string(),
                        colorable: false,
                        color_index: 0,
                        index: 0,
                    },
                    None,
                ),
            );
        }

        for base_type in BASE_PART_SET {
            if parts_by_type.get(*base_type).is_some_and(|parts| !parts.is_empty()) {
                continue;
            }

            register(
                &mut parts_by_type,
                AvatarPart::new(
                    FigurePart {
                        id: 1,
                        part_type: base_type.to_string(),
                        colorable: false,
                        color_index: 0,
                        index: 0,
                    },
                    None,
                ),
            );
        }

        Self { parts_by_type, hidden_layers }
    }

    /// Move the parts belonging to a body region out of the list, in the
    /// region's item order, excluding hidden-layer types. Each part is owned
    /// by exactly one region.
    pub fn take_parts_for_body_part(&mut self, body_part: &BodyPart) -> Vec<AvatarPart> {
        let mut members = Vec::new();

        for item in &body_part.items {
            if self.hidden_layers.contains(&item.id) {
                continue;
            }
            if let Some(parts) = self.parts_by_type.remove(&item.id) {
                members.extend(parts);
            }
        }

        members
    }

    /// All remaining parts, for inspection.
    pub fn parts(&self) -> impl Iterator<Item = &AvatarPart> {
        self.parts_by_type.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BodyPartItem;
    use crate::look::parse_look;

    fn figure() -> FigureData {
        FigureData::from_str(
            r#"{
                palettes: [
                    { id: 1, colors: [ { id: 1, color: "ffcb98" }, { id: 45, color: "2d2d2d" } ] },
                ],
                set_types: [
                    {
                        type: "hd",
                        palette_id: 1,
                        sets: [
                            {
                                id: 180,
                                colorable: true,
                                parts: [ { id: 1, type: "hd", colorable: true, index: 0 } ],
                            },
                        ],
                    },
                    {
                        type: "ch",
                        palette_id: 1,
                        sets: [
                            {
                                id: 210,
                                colorable: true,
                                parts: [
                                    { id: 210, type: "ch", colorable: true, index: 0 },
                                    { id: 210, type: "ls", colorable: true, index: 1 },
                                    { id: 210, type: "rs", colorable: true, index: 2 },
                                ],
                            },
                        ],
                    },
                    {
                        type: "ha",
                        palette_id: 1,
                        sets: [
                            {
                                id: 1001,
                                hidden_layers: ["hr"],
                                parts: [ { id: 9, type: "ha", index: 0 } ],
                            },
                        ],
                    },
                ],
            }"#,
        )
        .unwrap()
    }

    fn count(list: &AvatarPartList, part_type: &str) -> usize {
        list.parts().filter(|p| p.part_type() == part_type).count()
    }

    #[test]
    fn test_base_parts_injected_for_empty_look() {
        let list = AvatarPartList::from_look(&parse_look(""), &figure(), None);

        for base in ["lh", "rh", "bd", "hd"] {
            assert_eq!(count(&list, base), 1, "missing base part {base}");
        }

        let head = list.parts().find(|p| p.part_type() == "hd").unwrap();
        assert_eq!(head.id(), 1);
        assert_eq!(head.index(), 0);
        assert_eq!(head.color(), None);
    }

    #[test]
    fn test_look_part_replaces_backstop() {
        let list = AvatarPartList::from_look(&parse_look("hd-180-1"), &figure(), None);
        assert_eq!(count(&list, "hd"), 1);

        let head = list.parts().find(|p| p.part_type() == "hd").unwrap();
        assert_eq!(head.color(), Some(0xffcb98));
    }

    #[test]
    fn test_unknown_set_falls_back_to_backstop() {
        let list = AvatarPartList::from_look(&parse_look("hd-99999-99999"), &figure(), None);
        let head = list.parts().find(|p| p.part_type() == "hd").unwrap();
        assert_eq!(head.id(), 1);
        assert_eq!(head.color(), None);
    }

    #[test]
    fn test_positional_colors_with_first_as_fallback() {
        let list = AvatarPartList::from_look(&parse_look("ch-210-1-45"), &figure(), None);

        let color_of = |part_type: &str| {
            list.parts().find(|p| p.part_type() == part_type).unwrap().color()
        };

        assert_eq!(color_of("ch"), Some(0xffcb98)); // index 0
        assert_eq!(color_of("ls"), Some(0x2d2d2d)); // index 1
        assert_eq!(color_of("rs"), Some(0xffcb98)); // index 2 -> fallback to first
    }

    #[test]
    fn test_unresolvable_colors_dropped() {
        // color 99 doesn't resolve; only color 45 remains, at position 0
        let list = AvatarPartList::from_look(&parse_look("ch-210-99-45"), &figure(), None);
        let chest = list.parts().find(|p| p.part_type() == "ch").unwrap();
        assert_eq!(chest.color(), Some(0x2d2d2d));
    }

    #[test]
    fn test_hidden_layers_excluded_from_regions() {
        let mut list =
            AvatarPartList::from_look(&parse_look("ha-1001-1.hd-180-1"), &figure(), None);

        let head_region = BodyPart {
            id: "head".to_string(),
            z: 1.0,
            items: vec![
                BodyPartItem { id: "hd".to_string(), z: 0.0, radius: 0.5 },
                BodyPartItem { id: "hr".to_string(), z: 0.0, radius: 0.7 },
                BodyPartItem { id: "ha".to_string(), z: 0.0, radius: 0.9 },
            ],
        };

        let members = list.take_parts_for_body_part(&head_region);
        let types: Vec<_> = members.iter().map(|p| p.part_type()).collect();

        // hr is hidden by the hat set; hd and ha remain
        assert_eq!(types, ["hd", "ha"]);
    }

    #[test]
    fn test_take_parts_moves_ownership() {
        let mut list = AvatarPartList::from_look(&parse_look("hd-180-1"), &figure(), None);
        let region = BodyPart {
            id: "head".to_string(),
            z: 1.0,
            items: vec![BodyPartItem { id: "hd".to_string(), z: 0.0, radius: 0.5 }],
        };

        assert_eq!(list.take_parts_for_body_part(&region).len(), 1);
        assert_eq!(list.take_parts_for_body_part(&region).len(), 0);
    }

    #[test]
    fn test_held_item_registers_right_hand_item_part() {
        let list = AvatarPartList::from_look(&parse_look(""), &figure(), Some(55));
        let item = list.parts().find(|p| p.part_type() == "ri").unwrap();
        assert_eq!(item.id(), 55);
        assert_eq!(item.color(), None);
    }
}
