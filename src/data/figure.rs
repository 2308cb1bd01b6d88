//! Figure table: set types, sets, figure parts and color palettes
//!
//! This is the table the look selects against: every `hd-180-1` segment
//! resolves through a set type (`hd`), one of its sets (`180`) and the set
//! type's palette (`1`).

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{read_table, DataError};

/// A static, data-table-defined drawable component of a set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FigurePart {
    pub id: i32,
    #[serde(rename = "type")]
    pub part_type: String,
    #[serde(default)]
    pub colorable: bool,
    #[serde(default)]
    pub color_index: i32,
    #[serde(default)]
    pub index: usize,
}

/// One selectable set within a set type.
#[derive(Debug, Clone, Deserialize)]
pub struct FigureDataSet {
    pub id: i32,
    #[serde(default = "default_gender")]
    pub gender: String,
    #[serde(default)]
    pub colorable: bool,
    #[serde(default = "default_true")]
    pub selectable: bool,
    /// Part types this set suppresses across the whole figure.
    #[serde(default)]
    pub hidden_layers: Vec<String>,
    #[serde(default)]
    pub parts: Vec<FigurePart>,
}

fn default_gender() -> String {
    "U".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct PaletteColorDoc {
    id: i32,
    /// RGB value as a hex string, e.g. `"ffcb98"`.
    color: String,
}

#[derive(Debug, Deserialize)]
struct PaletteDoc {
    id: i32,
    colors: Vec<PaletteColorDoc>,
}

#[derive(Debug, Deserialize)]
struct SetTypeDoc {
    #[serde(rename = "type")]
    set_type: String,
    palette_id: i32,
    sets: Vec<FigureDataSet>,
}

#[derive(Debug, Deserialize)]
struct FigureDoc {
    #[serde(default)]
    palettes: Vec<PaletteDoc>,
    #[serde(default)]
    set_types: Vec<SetTypeDoc>,
}

#[derive(Debug)]
struct SetType {
    palette_id: i32,
    sets: HashMap<i32, FigureDataSet>,
}

/// The loaded figure table.
#[derive(Debug)]
pub struct FigureData {
    palettes: HashMap<i32, HashMap<i32, u32>>,
    set_types: HashMap<String, SetType>,
}

impl FigureData {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        Ok(Self::from_doc(read_table(path)?))
    }

    pub fn from_str(text: &str) -> Result<Self, DataError> {
        let doc = json5::from_str(text).map_err(|e| DataError::Parse {
            path: "<inline figure table>".into(),
            message: e.to_string(),
        })?;
        Ok(Self::from_doc(doc))
    }

    fn from_doc(doc: FigureDoc) -> Self {
        let mut palettes = HashMap::new();
        for palette in doc.palettes {
            let mut colors = HashMap::new();
            for entry in palette.colors {
                match u32::from_str_radix(entry.color.trim_start_matches('#'), 16) {
                    Ok(value) => {
                        colors.insert(entry.id, value);
                    }
                    Err(_) => {
                        log::warn!(
                            "palette {}: color {} has invalid value '{}', skipping",
                            palette.id,
                            entry.id,
                            entry.color
                        );
                    }
                }
            }
            palettes.insert(palette.id, colors);
        }

        let mut set_types = HashMap::new();
        for set_type in doc.set_types {
            set_types.insert(
                set_type.set_type,
                SetType {
                    palette_id: set_type.palette_id,
                    sets: set_type.sets.into_iter().map(|s| (s.id, s)).collect(),
                },
            );
        }

        Self { palettes, set_types }
    }

    fn set(&self, set_type: &str, set_id: Option<i32>) -> Option<&FigureDataSet> {
        self.set_types.get(set_type)?.sets.get(&set_id?)
    }

    /// The figure parts of a set; empty when the set type or set is unknown.
    pub fn get_parts(&self, set_type: &str, set_id: Option<i32>) -> &[FigurePart] {
        self.set(set_type, set_id).map(|s| s.parts.as_slice()).unwrap_or(&[])
    }

    /// Resolve a color id through the set type's palette.
    pub fn get_color(&self, set_type: &str, color_id: Option<i32>) -> Option<u32> {
        let palette_id = self.set_types.get(set_type)?.palette_id;
        self.palettes.get(&palette_id)?.get(&color_id?).copied()
    }

    /// Part types this selection suppresses; empty when unknown.
    pub fn get_hidden_layers(&self, set_type: &str, set_id: Option<i32>) -> &[String] {
        self.set(set_type, set_id).map(|s| s.hidden_layers.as_slice()).unwrap_or(&[])
    }

    /// All sets of a set type.
    pub fn get_sets(&self, set_type: &str) -> Vec<&FigureDataSet> {
        self.set_types
            .get(set_type)
            .map(|st| st.sets.values().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        palettes: [
            { id: 1, colors: [ { id: 1, color: "ffcb98" }, { id: 45, color: "b87560" } ] },
        ],
        set_types: [
            {
                type: "hd",
                palette_id: 1,
                sets: [
                    {
                        id: 180,
                        gender: "M",
                        colorable: true,
                        parts: [ { id: 1, type: "hd", colorable: true, index: 0, color_index: 1 } ],
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
    }"#;

    #[test]
    fn test_get_parts() {
        let data = FigureData::from_str(TABLE).unwrap();
        let parts = data.get_parts("hd", Some(180));

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].id, 1);
        assert_eq!(parts[0].part_type, "hd");
        assert!(parts[0].colorable);
    }

    #[test]
    fn test_get_parts_unknown_is_empty() {
        let data = FigureData::from_str(TABLE).unwrap();
        assert!(data.get_parts("hd", Some(99999)).is_empty());
        assert!(data.get_parts("zz", Some(180)).is_empty());
        assert!(data.get_parts("hd", None).is_empty());
    }

    #[test]
    fn test_get_color() {
        let data = FigureData::from_str(TABLE).unwrap();
        assert_eq!(data.get_color("hd", Some(1)), Some(0xffcb98));
        assert_eq!(data.get_color("hd", Some(45)), Some(0xb87560));
        assert_eq!(data.get_color("hd", Some(99)), None);
        assert_eq!(data.get_color("hd", None), None);
    }

    #[test]
    fn test_get_hidden_layers() {
        let data = FigureData::from_str(TABLE).unwrap();
        assert_eq!(data.get_hidden_layers("ha", Some(1001)), ["hr"]);
        assert!(data.get_hidden_layers("hd", Some(180)).is_empty());
    }

    #[test]
    fn test_invalid_palette_color_skipped() {
        let data = FigureData::from_str(
            r#"{
                palettes: [ { id: 1, colors: [ { id: 1, color: "nothex" } ] } ],
                set_types: [ { type: "hd", palette_id: 1, sets: [] } ],
            }"#,
        )
        .unwrap();

        assert_eq!(data.get_color("hd", Some(1)), None);
    }
}
