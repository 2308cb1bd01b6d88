//! Part-sets table: per-part-type flip metadata and the named active sets
//!
//! `flipped_set_type` names the part type whose assets depict this type when
//! the avatar faces a mirrored octant (a left sleeve drawn as a flipped
//! right sleeve). Active part sets are the named groups of part types an
//! action applies to.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use super::{read_table, DataError};

/// Flip metadata for one part type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AvatarPartInfo {
    #[serde(default)]
    pub flipped_set_type: Option<String>,
    #[serde(default)]
    pub remove_set_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PartSetDoc {
    set_type: String,
    #[serde(flatten)]
    info: AvatarPartInfo,
}

#[derive(Debug, Deserialize)]
struct ActivePartSetDoc {
    id: String,
    #[serde(default)]
    parts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PartSetsDoc {
    #[serde(default)]
    part_sets: Vec<PartSetDoc>,
    #[serde(default)]
    active_part_sets: Vec<ActivePartSetDoc>,
}

/// The loaded part-sets table.
#[derive(Debug)]
pub struct PartSetsData {
    part_info: HashMap<String, AvatarPartInfo>,
    active_part_sets: HashMap<String, HashSet<String>>,
}

impl PartSetsData {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        Ok(Self::from_doc(read_table(path)?))
    }

    pub fn from_str(text: &str) -> Result<Self, DataError> {
        let doc = json5::from_str(text).map_err(|e| DataError::Parse {
            path: "<inline part sets table>".into(),
            message: e.to_string(),
        })?;
        Ok(Self::from_doc(doc))
    }

    fn from_doc(doc: PartSetsDoc) -> Self {
        Self {
            part_info: doc
                .part_sets
                .into_iter()
                .map(|p| (p.set_type, p.info))
                .collect(),
            active_part_sets: doc
                .active_part_sets
                .into_iter()
                .map(|s| (s.id, s.parts.into_iter().collect()))
                .collect(),
        }
    }

    pub fn get_part_info(&self, part_type: &str) -> Option<&AvatarPartInfo> {
        self.part_info.get(part_type)
    }

    /// The part types belonging to a named active part set.
    pub fn get_active_part_set(&self, id: &str) -> Option<&HashSet<String>> {
        self.active_part_sets.get(id)
    }
}
