//! Per-frame sprite resolution: mirroring algebra, asset naming and offsets
//!
//! For a mirrored octant most part types remap to the matching unmirrored
//! octant and flip, optionally swapping to their flipped counterpart type
//! (a left sleeve drawn from the right sleeve's asset). A fixed exception
//! table keeps certain gesture/hand/item/print combinations on their own
//! asset, flipped in place.

use serde::Serialize;
use thiserror::Error;

use crate::data::{AvatarActionInfo, AvatarAnimationFrame};
use crate::direction::{basic_flipped_direction, is_direction_flipped};
use crate::library::AssetLibraryCollection;

/// Error resolving a frame's sprite.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// Offset arithmetic produced a non-finite coordinate - a data
    /// integrity bug, not a recoverable condition.
    #[error("invalid {axis} offset for asset '{asset_id}'")]
    InvalidOffset { asset_id: String, axis: char },
}

/// A positioned, possibly mirrored sprite reference - the terminal,
/// renderer-facing unit of a composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvatarAsset {
    pub file_id: String,
    pub x: f32,
    pub y: f32,
    pub mirrored: bool,
}

#[derive(Debug, PartialEq, Eq)]
struct FlippedMeta<'a> {
    direction: u8,
    part_type: &'a str,
    flip: bool,
    swapped: bool,
}

/// Asset-part-definition + part-type combinations that flip in place on
/// mirrored octants: the pose keeps its own asset and direction, rendered
/// flipped, with no left/right type swap.
const FLIP_IN_PLACE: &[(&str, &[&str])] = &[
    ("wav", &["lh", "ls", "lc"]),
    ("drk", &["rh", "rs", "rc"]),
    ("blw", &["rh"]),
    ("sig", &["lh"]),
    ("respect", &["lh"]),
];

/// Part types that always flip in place, whatever the definition.
const FLIP_IN_PLACE_TYPES: &[&str] = &["ri", "li", "cp"];

fn flipped_meta<'a>(
    definition: &str,
    direction: u8,
    part_type: &'a str,
    flipped_part_type: Option<&'a str>,
) -> FlippedMeta<'a> {
    if !is_direction_flipped(direction) {
        return FlippedMeta { direction, part_type, flip: false, swapped: false };
    }

    let in_place = FLIP_IN_PLACE
        .iter()
        .any(|(def, types)| *def == definition && types.contains(&part_type))
        || FLIP_IN_PLACE_TYPES.contains(&part_type);

    if in_place {
        return FlippedMeta { direction, part_type, flip: true, swapped: false };
    }

    let (direction, flip) = basic_flipped_direction(direction);
    match flipped_part_type {
        Some(flipped) if flipped != part_type => {
            FlippedMeta { direction, part_type: flipped, flip, swapped: true }
        }
        _ => FlippedMeta { direction, part_type, flip, swapped: false },
    }
}

fn asset_name(
    definition: &str,
    part_type: &str,
    part_id: i32,
    direction: u8,
    frame: i32,
) -> String {
    format!("h_{definition}_{part_type}_{part_id}_{direction}_{frame}")
}

/// Turn a manifest offset into a screen position.
///
/// Manifest offsets are stored inverted; the vertical bias recenters the
/// sprite on the avatar canvas. Mirrored sprites reflect about the canvas
/// pivot, and the lying pose shifts sideways by a fixed amount.
pub(crate) fn apply_offsets(
    offsets: (f32, f32),
    custom: (f32, f32),
    flipped: bool,
    lay: bool,
    asset_id: &str,
) -> Result<(f32, f32), AssetError> {
    let mut x = -offsets.0 - custom.0;
    let y = -offsets.1 - custom.1 + 16.0;

    if flipped {
        x = 64.0 - x;
    }
    if lay {
        x = if flipped { x - 52.0 } else { x + 52.0 };
    }

    if !x.is_finite() {
        return Err(AssetError::InvalidOffset { asset_id: asset_id.to_string(), axis: 'x' });
    }
    if !y.is_finite() {
        return Err(AssetError::InvalidOffset { asset_id: asset_id.to_string(), axis: 'y' });
    }

    Ok((x, y))
}

impl AvatarAsset {
    /// Resolve the sprite for one expanded animation frame of a part.
    ///
    /// Returns `Ok(None)` when neither the action-specific asset id nor the
    /// `std` fallback has offset metadata - that frame is simply omitted.
    pub fn for_frame(
        action: &AvatarActionInfo,
        direction: u8,
        part_id: i32,
        part_type: &str,
        animation_frame: Option<&AvatarAnimationFrame>,
        flipped_part_type: Option<&str>,
        custom_offset: (f32, f32),
        libraries: &AssetLibraryCollection,
    ) -> Result<Option<Self>, AssetError> {
        let mut definition = action.asset_part_definition.as_str();
        let mut frame_number = 0;

        if let Some(frame) = animation_frame {
            frame_number = frame.number;
            if let Some(over) = frame.asset_part_definition.as_deref() {
                if !over.is_empty() {
                    definition = over;
                }
            }
        }

        let flipped = flipped_meta(definition, direction, part_type, flipped_part_type);

        let mut asset_id =
            asset_name(definition, flipped.part_type, part_id, flipped.direction, frame_number);
        let mut offsets = libraries.get_offsets(&asset_id);

        if offsets.is_none() {
            asset_id = asset_name("std", flipped.part_type, part_id, flipped.direction, 0);
            offsets = libraries.get_offsets(&asset_id);
        }

        let Some(offsets) = offsets else {
            return Ok(None);
        };

        let (x, y) =
            apply_offsets(offsets, custom_offset, flipped.flip, definition == "lay", &asset_id)?;

        Ok(Some(Self { file_id: asset_id, x, y, mirrored: flipped.flip }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::FigureBundle;
    use crate::data::ManifestData;
    use std::collections::HashMap;

    fn action(definition: &str) -> AvatarActionInfo {
        AvatarActionInfo {
            id: "Test".to_string(),
            state: "std".to_string(),
            precedence: 0,
            geometry_type: "vertical".to_string(),
            active_part_set: None,
            asset_part_definition: definition.to_string(),
            prevents: vec![],
            is_animation: false,
            is_main: false,
            is_default: false,
        }
    }

    fn collection(manifest: &str) -> AssetLibraryCollection {
        let mut collection = AssetLibraryCollection::new();
        collection.open(FigureBundle::from_parts(
            "test",
            ManifestData::from_str(manifest).unwrap(),
            HashMap::new(),
        ));
        collection
    }

    #[test]
    fn test_unmirrored_octant_passes_through() {
        let meta = flipped_meta("std", 2, "bd", None);
        assert_eq!(
            meta,
            FlippedMeta { direction: 2, part_type: "bd", flip: false, swapped: false }
        );
    }

    #[test]
    fn test_mirrored_octant_remaps_and_flips() {
        assert_eq!(flipped_meta("std", 4, "bd", None).direction, 2);
        assert_eq!(flipped_meta("std", 5, "bd", None).direction, 1);
        assert_eq!(flipped_meta("std", 6, "bd", None).direction, 0);
        assert!(flipped_meta("std", 4, "bd", None).flip);
    }

    #[test]
    fn test_flipped_type_swap() {
        let meta = flipped_meta("std", 4, "ls", Some("rs"));
        assert_eq!(meta.part_type, "rs");
        assert!(meta.swapped);
        assert!(meta.flip);
        assert_eq!(meta.direction, 2);
    }

    #[test]
    fn test_same_flipped_type_is_not_a_swap() {
        let meta = flipped_meta("std", 4, "bd", Some("bd"));
        assert!(!meta.swapped);
        assert_eq!(meta.part_type, "bd");
    }

    #[test]
    fn test_wave_left_hand_flips_in_place() {
        let meta = flipped_meta("wav", 5, "lh", Some("rh"));
        assert_eq!(
            meta,
            FlippedMeta { direction: 5, part_type: "lh", flip: true, swapped: false }
        );
    }

    #[test]
    fn test_item_and_chest_print_flip_in_place() {
        for part_type in ["ri", "li", "cp"] {
            let meta = flipped_meta("std", 6, part_type, None);
            assert_eq!(meta.direction, 6);
            assert!(meta.flip);
            assert!(!meta.swapped);
        }
    }

    #[test]
    fn test_for_frame_resolves_action_asset() {
        let libraries =
            collection(r#"{ assets: [ { name: "h_wav_lh_1_2_0", x: 10, y: 20 } ] }"#);

        let asset = AvatarAsset::for_frame(
            &action("wav"),
            2,
            1,
            "lh",
            None,
            None,
            (0.0, 0.0),
            &libraries,
        )
        .unwrap()
        .unwrap();

        assert_eq!(asset.file_id, "h_wav_lh_1_2_0");
        assert_eq!(asset.x, -10.0);
        assert_eq!(asset.y, -20.0 + 16.0);
        assert!(!asset.mirrored);
    }

    #[test]
    fn test_for_frame_falls_back_to_std() {
        let libraries = collection(r#"{ assets: [ { name: "h_std_bd_1_0_0", x: 6, y: 67 } ] }"#);

        let asset = AvatarAsset::for_frame(
            &action("wlk"),
            0,
            1,
            "bd",
            Some(&AvatarAnimationFrame {
                number: 3,
                asset_part_definition: None,
                repeats: 1,
            }),
            None,
            (0.0, 0.0),
            &libraries,
        )
        .unwrap()
        .unwrap();

        assert_eq!(asset.file_id, "h_std_bd_1_0_0");
    }

    #[test]
    fn test_for_frame_unresolved_yields_none() {
        let libraries = collection(r#"{ assets: [] }"#);
        let asset = AvatarAsset::for_frame(
            &action("std"),
            0,
            1,
            "bd",
            None,
            None,
            (0.0, 0.0),
            &libraries,
        )
        .unwrap();
        assert!(asset.is_none());
    }

    #[test]
    fn test_frame_definition_override() {
        let libraries =
            collection(r#"{ assets: [ { name: "h_spk_hd_1_2_1", x: 0, y: 0 } ] }"#);

        let asset = AvatarAsset::for_frame(
            &action("std"),
            2,
            1,
            "hd",
            Some(&AvatarAnimationFrame {
                number: 1,
                asset_part_definition: Some("spk".to_string()),
                repeats: 1,
            }),
            None,
            (0.0, 0.0),
            &libraries,
        )
        .unwrap()
        .unwrap();

        assert_eq!(asset.file_id, "h_spk_hd_1_2_1");
    }

    #[test]
    fn test_mirrored_asset_reflects_about_pivot() {
        let libraries = collection(r#"{ assets: [ { name: "h_std_bd_1_2_0", x: 9, y: 67 } ] }"#);

        let asset = AvatarAsset::for_frame(
            &action("std"),
            4,
            1,
            "bd",
            None,
            None,
            (0.0, 0.0),
            &libraries,
        )
        .unwrap()
        .unwrap();

        assert!(asset.mirrored);
        // x = 64 - (-9) = 73
        assert_eq!(asset.x, 73.0);
    }

    #[test]
    fn test_lay_shift() {
        assert_eq!(apply_offsets((0.0, 0.0), (0.0, 0.0), false, true, "a").unwrap().0, 52.0);
        assert_eq!(
            apply_offsets((0.0, 0.0), (0.0, 0.0), true, true, "a").unwrap().0,
            64.0 - 52.0
        );
    }

    #[test]
    fn test_non_finite_offset_is_fatal() {
        let err = apply_offsets((f32::NAN, 0.0), (0.0, 0.0), false, false, "bad").unwrap_err();
        assert_eq!(err, AssetError::InvalidOffset { asset_id: "bad".to_string(), axis: 'x' });
    }
}
