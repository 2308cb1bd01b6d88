//! Effect map table: effect id to library and kind

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{read_table, DataError};

/// One registered visual effect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AvatarEffect {
    pub id: String,
    pub lib: String,
    #[serde(rename = "type")]
    pub effect_type: String,
}

#[derive(Debug, Deserialize)]
struct EffectMapDoc {
    #[serde(default)]
    effects: Vec<AvatarEffect>,
}

/// The loaded effect map.
#[derive(Debug)]
pub struct EffectMapData {
    effects: HashMap<String, AvatarEffect>,
}

impl EffectMapData {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        Ok(Self::from_doc(read_table(path)?))
    }

    pub fn from_str(text: &str) -> Result<Self, DataError> {
        let doc = json5::from_str(text).map_err(|e| DataError::Parse {
            path: "<inline effect map>".into(),
            message: e.to_string(),
        })?;
        Ok(Self::from_doc(doc))
    }

    fn from_doc(doc: EffectMapDoc) -> Self {
        Self {
            effects: doc.effects.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }

    pub fn get_effect_info(&self, id: &str) -> Option<&AvatarEffect> {
        self.effects.get(id)
    }
}
