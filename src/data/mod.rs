//! Data providers: the immutable lookup tables the composition engine reads
//!
//! Each provider is a serde model loaded once from a JSON5 document in the
//! resource directory and queried through pure lookup methods. Lookups never
//! fail; absence is `None` or an empty slice. A provider only exists fully
//! loaded, so "accessed before initialization" is unrepresentable.

mod actions;
mod animation;
mod effect_map;
mod figure;
mod figure_map;
mod geometry;
mod manifest;
mod part_sets;

pub use actions::{ActionsData, AvatarActionInfo};
pub use animation::{AnimationData, AvatarAnimationFrame};
pub use effect_map::{AvatarEffect, EffectMapData};
pub use figure::{FigureData, FigureDataSet, FigurePart};
pub use figure_map::FigureMapData;
pub use geometry::{BodyPart, BodyPartItem, GeometryData};
pub use manifest::{ManifestAlias, ManifestAsset, ManifestData};
pub use part_sets::{AvatarPartInfo, PartSetsData};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error loading a data table from disk.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read table '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed table '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Read and deserialize a JSON5 table document.
pub(crate) fn read_table<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let text = fs::read_to_string(path)
        .map_err(|source| DataError::Io { path: path.to_path_buf(), source })?;

    json5::from_str(&text)
        .map_err(|e| DataError::Parse { path: path.to_path_buf(), message: e.to_string() })
}

/// The full set of loaded avatar tables, threaded through the engine as an
/// explicit context instead of a manager-graph singleton.
#[derive(Debug)]
pub struct AvatarData {
    pub figure: FigureData,
    pub figure_map: FigureMapData,
    pub geometry: GeometryData,
    pub actions: ActionsData,
    pub animation: AnimationData,
    pub part_sets: PartSetsData,
    pub effect_map: EffectMapData,
}

impl AvatarData {
    /// Load every table from its well-known file in the resource directory.
    pub fn load(resource_dir: &Path) -> Result<Self, DataError> {
        Ok(Self {
            figure: FigureData::from_path(&resource_dir.join("figuredata.json"))?,
            figure_map: FigureMapData::from_path(&resource_dir.join("figuremap.json"))?,
            geometry: GeometryData::from_path(&resource_dir.join("geometry.json"))?,
            actions: ActionsData::from_path(&resource_dir.join("actions.json"))?,
            animation: AnimationData::from_path(&resource_dir.join("animations.json"))?,
            part_sets: PartSetsData::from_path(&resource_dir.join("partsets.json"))?,
            effect_map: EffectMapData::from_path(&resource_dir.join("effectmap.json"))?,
        })
    }
}
