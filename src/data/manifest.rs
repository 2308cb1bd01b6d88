//! Library manifest: the assets a bundle ships and their pixel offsets
//!
//! Aliases let a library expose one image under several asset ids, with
//! optional flips; they inherit the link target's offsets.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{read_table, DataError};

/// One asset in a library manifest with its pixel offset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManifestAsset {
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
}

/// An alias pointing at another asset in the same manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestAlias {
    pub name: String,
    pub link: String,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
}

#[derive(Debug, Deserialize)]
struct ManifestDoc {
    #[serde(default)]
    assets: Vec<ManifestAsset>,
    #[serde(default)]
    aliases: Vec<ManifestAlias>,
}

/// The loaded manifest of one asset library.
#[derive(Debug)]
pub struct ManifestData {
    assets: Vec<ManifestAsset>,
    by_name: HashMap<String, usize>,
    aliases: Vec<ManifestAlias>,
}

impl ManifestData {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        Ok(Self::from_doc(read_table(path)?))
    }

    pub fn from_str(text: &str) -> Result<Self, DataError> {
        let doc = json5::from_str(text).map_err(|e| DataError::Parse {
            path: "<inline manifest>".into(),
            message: e.to_string(),
        })?;
        Ok(Self::from_doc(doc))
    }

    fn from_doc(doc: ManifestDoc) -> Self {
        let by_name = doc
            .assets
            .iter()
            .enumerate()
            .map(|(i, asset)| (asset.name.clone(), i))
            .collect();

        Self { assets: doc.assets, by_name, aliases: doc.aliases }
    }

    pub fn get_assets(&self) -> &[ManifestAsset] {
        &self.assets
    }

    pub fn get_asset(&self, name: &str) -> Option<&ManifestAsset> {
        self.by_name.get(name).map(|&i| &self.assets[i])
    }

    pub fn get_aliases(&self) -> &[ManifestAlias] {
        &self.aliases
    }
}
