//! Geometry table: avatar silhouettes, body-part regions and their members
//!
//! An avatar set (silhouette) lists region ids; a geometry kind (e.g.
//! `vertical`) carries each region's draw depth and the part types it may
//! contain, each with a radius hint used to sort members within the region.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{read_table, DataError};

/// One part-type slot inside a body-part region.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BodyPartItem {
    pub id: String,
    #[serde(default)]
    pub z: f32,
    pub radius: f32,
}

/// A named depth-ordered region grouping part types.
#[derive(Debug, Clone, Deserialize)]
pub struct BodyPart {
    pub id: String,
    pub z: f32,
    #[serde(default)]
    pub items: Vec<BodyPartItem>,
}

#[derive(Debug, Deserialize)]
struct AvatarSetDoc {
    id: String,
    #[serde(default)]
    body_parts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GeometryKindDoc {
    id: String,
    #[serde(default)]
    body_parts: Vec<BodyPart>,
}

#[derive(Debug, Deserialize)]
struct GeometryDoc {
    #[serde(default)]
    avatar_sets: Vec<AvatarSetDoc>,
    #[serde(default)]
    types: Vec<GeometryKindDoc>,
}

/// The loaded geometry table.
#[derive(Debug)]
pub struct GeometryData {
    avatar_sets: HashMap<String, Vec<String>>,
    body_parts: HashMap<(String, String), BodyPart>,
}

impl GeometryData {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        Ok(Self::from_doc(read_table(path)?))
    }

    pub fn from_str(text: &str) -> Result<Self, DataError> {
        let doc = json5::from_str(text).map_err(|e| DataError::Parse {
            path: "<inline geometry table>".into(),
            message: e.to_string(),
        })?;
        Ok(Self::from_doc(doc))
    }

    fn from_doc(doc: GeometryDoc) -> Self {
        let avatar_sets = doc
            .avatar_sets
            .into_iter()
            .map(|set| (set.id, set.body_parts))
            .collect();

        let mut body_parts = HashMap::new();
        for kind in doc.types {
            for body_part in kind.body_parts {
                body_parts.insert((kind.id.clone(), body_part.id.clone()), body_part);
            }
        }

        Self { avatar_sets, body_parts }
    }

    /// Region ids of a silhouette, in declaration order; empty when unknown.
    pub fn get_body_parts(&self, avatar_set: &str) -> &[String] {
        self.avatar_sets.get(avatar_set).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_body_part(&self, kind: &str, body_part_id: &str) -> Option<&BodyPart> {
        self.body_parts.get(&(kind.to_string(), body_part_id.to_string()))
    }

    /// The item record for a part type within a region, carrying the draw
    /// radius hint. `None` when the region does not list the type.
    pub fn get_body_part_item(
        &self,
        kind: &str,
        body_part_id: &str,
        item_type: &str,
    ) -> Option<&BodyPartItem> {
        self.get_body_part(kind, body_part_id)?
            .items
            .iter()
            .find(|item| item.id == item_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        avatar_sets: [ { id: "full", body_parts: ["top", "head", "torso"] } ],
        types: [
            {
                id: "vertical",
                body_parts: [
                    {
                        id: "head",
                        z: 1.0,
                        items: [
                            { id: "hd", z: 0.0, radius: 0.5 },
                            { id: "hr", z: 0.0, radius: 0.75 },
                        ],
                    },
                    { id: "torso", z: 0.0, items: [ { id: "ch", z: 0.0, radius: 0.6 } ] },
                ],
            },
        ],
    }"#;

    #[test]
    fn test_avatar_set_regions() {
        let data = GeometryData::from_str(TABLE).unwrap();
        assert_eq!(data.get_body_parts("full"), ["top", "head", "torso"]);
        assert!(data.get_body_parts("sitting").is_empty());
    }

    #[test]
    fn test_body_part_lookup() {
        let data = GeometryData::from_str(TABLE).unwrap();
        let head = data.get_body_part("vertical", "head").unwrap();
        assert_eq!(head.z, 1.0);
        assert_eq!(head.items.len(), 2);
        assert!(data.get_body_part("vertical", "feet").is_none());
        assert!(data.get_body_part("sitting", "head").is_none());
    }

    #[test]
    fn test_body_part_item_lookup() {
        let data = GeometryData::from_str(TABLE).unwrap();
        let item = data.get_body_part_item("vertical", "head", "hr").unwrap();
        assert_eq!(item.radius, 0.75);
        assert!(data.get_body_part_item("vertical", "head", "ch").is_none());
    }
}
