//! Figure map table: which asset library owns each figure part

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{read_table, DataError};

#[derive(Debug, Deserialize)]
struct LibraryPartDoc {
    id: i32,
    #[serde(rename = "type")]
    part_type: String,
}

#[derive(Debug, Deserialize)]
struct LibraryDoc {
    id: String,
    #[serde(default)]
    parts: Vec<LibraryPartDoc>,
}

#[derive(Debug, Deserialize)]
struct FigureMapDoc {
    #[serde(default)]
    libraries: Vec<LibraryDoc>,
}

/// The loaded figure map.
#[derive(Debug)]
pub struct FigureMapData {
    library_for_part: HashMap<(i32, String), String>,
    all_libraries: Vec<String>,
}

impl FigureMapData {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        Ok(Self::from_doc(read_table(path)?))
    }

    pub fn from_str(text: &str) -> Result<Self, DataError> {
        let doc = json5::from_str(text).map_err(|e| DataError::Parse {
            path: "<inline figure map>".into(),
            message: e.to_string(),
        })?;
        Ok(Self::from_doc(doc))
    }

    fn from_doc(doc: FigureMapDoc) -> Self {
        let mut library_for_part = HashMap::new();
        let mut all_libraries = Vec::new();

        for library in doc.libraries {
            for part in library.parts {
                library_for_part.insert((part.id, part.part_type), library.id.clone());
            }
            all_libraries.push(library.id);
        }

        Self { library_for_part, all_libraries }
    }

    /// The library owning a part. Big hair (`hrb`) shares the plain hair
    /// libraries, so its lookups alias to `hr`.
    pub fn get_library_of_part(&self, part_id: i32, part_type: &str) -> Option<&str> {
        let part_type = if part_type == "hrb" { "hr" } else { part_type };
        self.library_for_part
            .get(&(part_id, part_type.to_string()))
            .map(String::as_str)
    }

    /// Every known library id, in table order.
    pub fn libraries(&self) -> &[String] {
        &self.all_libraries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        libraries: [
            { id: "hh_human_hair", parts: [ { id: 828, type: "hr" } ] },
            { id: "hh_human_shirts", parts: [ { id: 210, type: "ch" }, { id: 210, type: "ls" } ] },
        ],
    }"#;

    #[test]
    fn test_library_lookup() {
        let map = FigureMapData::from_str(TABLE).unwrap();
        assert_eq!(map.get_library_of_part(828, "hr"), Some("hh_human_hair"));
        assert_eq!(map.get_library_of_part(210, "ls"), Some("hh_human_shirts"));
        assert_eq!(map.get_library_of_part(999, "hr"), None);
    }

    #[test]
    fn test_big_hair_aliases_to_hair() {
        let map = FigureMapData::from_str(TABLE).unwrap();
        assert_eq!(map.get_library_of_part(828, "hrb"), Some("hh_human_hair"));
    }

    #[test]
    fn test_libraries_in_table_order() {
        let map = FigureMapData::from_str(TABLE).unwrap();
        assert_eq!(map.libraries(), ["hh_human_hair", "hh_human_shirts"]);
    }
}
