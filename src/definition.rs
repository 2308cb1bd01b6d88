//! The draw definition: a composed, memoized paint list for one avatar state
//!
//! Built once per (look, actions, direction, head direction, item, effect)
//! signature. The draw-part list is pure given those inputs and computed at
//! most once per instance.

use std::cell::OnceCell;
use std::collections::HashSet;

use serde::Serialize;

use crate::asset::{apply_offsets, AssetError, AvatarAsset};
use crate::body::AvatarBodyPartList;
use crate::bundle::EffectSprite;
use crate::data::AvatarData;
use crate::direction::normalize_direction;
use crate::draw_order::{region_sequence, select_order};
use crate::library::AssetLibraryCollection;
use crate::look::Look;
use crate::parts::AvatarPartList;

/// How the renderer treats an avatar draw part's pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrawMode {
    /// Tint the sprite with the part's color.
    #[serde(rename = "colored")]
    Colored,
    /// Draw the sprite as-is.
    #[serde(rename = "just-image")]
    JustImage,
}

/// One figure part's entry in the paint sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvatarDrawPart {
    pub part_type: String,
    pub index: usize,
    pub mode: DrawMode,
    pub color: Option<u32>,
    pub assets: Vec<AvatarAsset>,
    pub z: f32,
}

/// One effect sprite's entry in the paint sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectDrawPart {
    pub assets: Vec<AvatarAsset>,
    pub z: f32,
    pub ink: Option<i32>,
    pub addition: bool,
}

/// A paint-order entry. The renderer/view layer is the single place that
/// matches on this exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum DrawPart {
    #[serde(rename = "AVATAR_DRAW_PART")]
    Avatar(AvatarDrawPart),
    #[serde(rename = "EFFECT_DRAW_PART")]
    Effect(EffectDrawPart),
}

impl DrawPart {
    pub fn assets(&self) -> &[AvatarAsset] {
        match self {
            DrawPart::Avatar(part) => &part.assets,
            DrawPart::Effect(part) => &part.assets,
        }
    }
}

/// The immutable result of resolving a look plus dynamic state.
#[derive(Debug)]
pub struct AvatarDrawDefinition {
    direction: i32,
    head_direction: i32,
    item: Option<i32>,
    active_actions: Vec<crate::data::AvatarActionInfo>,
    body_parts: AvatarBodyPartList,
    effect_sprites: Vec<EffectSprite>,
    draw_parts: OnceCell<Vec<DrawPart>>,
}

impl AvatarDrawDefinition {
    /// Assemble a composition: resolve parts, bind them to regions, then
    /// propagate actions and directions. No assets are resolved yet.
    pub fn new(
        data: &AvatarData,
        look: &Look,
        actions: &HashSet<String>,
        direction: i32,
        head_direction: i32,
        item: Option<i32>,
        effect_sprites: Vec<EffectSprite>,
    ) -> Self {
        let part_list = AvatarPartList::from_look(look, &data.figure, item);

        let mut active_actions: Vec<_> = data
            .actions
            .get_actions()
            .iter()
            .filter(|info| actions.contains(&info.id))
            .cloned()
            .collect();
        active_actions.sort_by(|a, b| b.precedence.cmp(&a.precedence));

        let mut body_parts = AvatarBodyPartList::new(&data.geometry, part_list, item.is_some());
        body_parts.apply_actions(&active_actions, &data.part_sets);
        body_parts.set_body_part_direction(direction, head_direction);

        Self {
            direction,
            head_direction,
            item,
            active_actions,
            body_parts,
            effect_sprites,
            draw_parts: OnceCell::new(),
        }
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    pub fn head_direction(&self) -> i32 {
        self.head_direction
    }

    /// The composition's actions, descending by precedence.
    pub fn active_actions(&self) -> &[crate::data::AvatarActionInfo] {
        &self.active_actions
    }

    fn draw_order(&self) -> crate::draw_order::DrawOrder {
        let mut active_part_sets: Vec<&str> = self
            .active_actions
            .iter()
            .filter_map(|info| info.active_part_set.as_deref())
            .collect();

        if self.item.is_some() {
            active_part_sets.push("itemRight");
        }

        select_order(active_part_sets)
    }

    fn compute_draw_parts(
        &self,
        data: &AvatarData,
        libraries: &AssetLibraryCollection,
    ) -> Result<Vec<DrawPart>, AssetError> {
        let direction = normalize_direction(self.direction);
        let order = region_sequence(self.draw_order(), direction);

        let mut parts = Vec::new();

        for &region_id in order {
            let Some(body_part) = self.body_parts.get(region_id) else {
                continue;
            };

            for part in body_part.sorted_parts(&data.geometry) {
                if let Some(draw_part) =
                    part.draw_part(&data.animation, &data.part_sets, libraries)?
                {
                    parts.push(DrawPart::Avatar(draw_part));
                }
            }
        }

        for sprite in &self.effect_sprites {
            let Some(asset_ids) = sprite.assets.get(&direction.to_string()) else {
                continue;
            };

            let mut assets = Vec::new();
            for asset_id in asset_ids {
                // Missing offsets omit the asset, same as avatar frames.
                let Some(offsets) = libraries.get_offsets(asset_id) else {
                    continue;
                };
                let (x, y) = apply_offsets(offsets, (0.0, 0.0), false, false, asset_id)?;
                assets.push(AvatarAsset { file_id: asset_id.clone(), x, y, mirrored: false });
            }

            if assets.is_empty() {
                continue;
            }

            parts.push(DrawPart::Effect(EffectDrawPart {
                assets,
                z: sprite.z,
                ink: sprite.ink,
                addition: sprite.addition,
            }));
        }

        Ok(parts)
    }

    /// The ordered paint list. Computed on first call, memoized afterwards;
    /// later calls return the cached list regardless of arguments.
    pub fn draw_parts(
        &self,
        data: &AvatarData,
        libraries: &AssetLibraryCollection,
    ) -> Result<&[DrawPart], AssetError> {
        if let Some(parts) = self.draw_parts.get() {
            return Ok(parts);
        }

        let parts = self.compute_draw_parts(data, libraries)?;
        Ok(self.draw_parts.get_or_init(|| parts))
    }
}
