//! Animation table: per-action, per-part-type frame sequences
//!
//! Frames may override the action's asset-part-definition and repeat
//! themselves a declared number of times. The table also carries per-frame
//! body-part pixel offsets keyed by direction.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{read_table, DataError};

/// One declared animation frame for a (action, part type) pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AvatarAnimationFrame {
    pub number: i32,
    /// Overrides the action's asset-part-definition when present.
    #[serde(default)]
    pub asset_part_definition: Option<String>,
    #[serde(default = "default_repeats")]
    pub repeats: u32,
}

fn default_repeats() -> u32 {
    2
}

#[derive(Debug, Deserialize)]
struct AnimationPartDoc {
    set_type: String,
    #[serde(default)]
    frames: Vec<AvatarAnimationFrame>,
}

#[derive(Debug, Deserialize)]
struct OffsetBodyPartDoc {
    id: String,
    #[serde(default)]
    dx: f32,
    #[serde(default)]
    dy: f32,
}

#[derive(Debug, Deserialize)]
struct OffsetDirectionDoc {
    direction: u8,
    #[serde(default)]
    body_parts: Vec<OffsetBodyPartDoc>,
}

#[derive(Debug, Deserialize)]
struct OffsetFrameDoc {
    frame: i32,
    #[serde(default)]
    directions: Vec<OffsetDirectionDoc>,
}

#[derive(Debug, Deserialize)]
struct AnimationActionDoc {
    id: String,
    #[serde(default)]
    parts: Vec<AnimationPartDoc>,
    #[serde(default)]
    offsets: Vec<OffsetFrameDoc>,
}

#[derive(Debug, Deserialize)]
struct AnimationDoc {
    #[serde(default)]
    actions: Vec<AnimationActionDoc>,
}

/// The loaded animation table.
#[derive(Debug)]
pub struct AnimationData {
    frames: HashMap<(String, String), Vec<AvatarAnimationFrame>>,
    frame_counts: HashMap<String, usize>,
    offsets: HashMap<(String, i32, u8, String), (f32, f32)>,
}

impl AnimationData {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        Ok(Self::from_doc(read_table(path)?))
    }

    pub fn from_str(text: &str) -> Result<Self, DataError> {
        let doc = json5::from_str(text).map_err(|e| DataError::Parse {
            path: "<inline animation table>".into(),
            message: e.to_string(),
        })?;
        Ok(Self::from_doc(doc))
    }

    fn from_doc(doc: AnimationDoc) -> Self {
        let mut frames = HashMap::new();
        let mut frame_counts = HashMap::new();
        let mut offsets = HashMap::new();

        for action in doc.actions {
            let part_frame_count = action.parts.first().map(|p| p.frames.len()).unwrap_or(0);
            frame_counts.insert(
                action.id.clone(),
                part_frame_count.max(action.offsets.len()),
            );

            for part in action.parts {
                frames.insert((action.id.clone(), part.set_type), part.frames);
            }

            for offset_frame in action.offsets {
                for direction in offset_frame.directions {
                    for body_part in direction.body_parts {
                        offsets.insert(
                            (
                                action.id.clone(),
                                offset_frame.frame,
                                direction.direction,
                                body_part.id,
                            ),
                            (body_part.dx, body_part.dy),
                        );
                    }
                }
            }
        }

        Self { frames, frame_counts, offsets }
    }

    /// Declared frames for a (action, part type) pair; empty when the table
    /// has none.
    pub fn get_animation_frames(
        &self,
        action_id: &str,
        part_type: &str,
    ) -> &[AvatarAnimationFrame] {
        self.frames
            .get(&(action_id.to_string(), part_type.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get_animation_frame(
        &self,
        action_id: &str,
        part_type: &str,
        frame: usize,
    ) -> Option<&AvatarAnimationFrame> {
        self.get_animation_frames(action_id, part_type).get(frame)
    }

    /// Number of frames an action animates through (the longer of its first
    /// part sequence and its offset sequence).
    pub fn get_animation_frames_count(&self, action_id: &str) -> usize {
        self.frame_counts.get(action_id).copied().unwrap_or(0)
    }

    /// Per-frame pixel offset of a body part; zero when the table has none.
    pub fn get_animation_offset(
        &self,
        action_id: &str,
        frame: i32,
        direction: u8,
        body_part_id: &str,
    ) -> (f32, f32) {
        self.offsets
            .get(&(action_id.to_string(), frame, direction, body_part_id.to_string()))
            .copied()
            .unwrap_or((0.0, 0.0))
    }
}
