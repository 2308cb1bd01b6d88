//! Asset bundles: a library's manifest plus its texture files
//!
//! A bundle is a directory named `<library>.figure` holding `manifest.json`
//! and one image file per asset. Texture bytes are read on demand and never
//! decoded - the engine only passes them through to the renderer.
//!
//! Effect bundles additionally declare their sprites in `effect.json`:
//! direction-keyed asset lists with a z offset, optional ink mode and an
//! additive-blend flag.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::{DataError, ManifestData};

/// Error loading a bundle from disk.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("cannot read bundle '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Manifest(#[from] DataError),
}

/// An opaque, undecoded texture payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture(Vec<u8>);

impl Texture {
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

/// One sprite layer declared by an effect bundle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EffectSprite {
    pub id: String,
    #[serde(default)]
    pub z: f32,
    #[serde(default)]
    pub ink: Option<i32>,
    #[serde(default)]
    pub addition: bool,
    /// Asset ids to draw, keyed by normalized direction octant (as the
    /// string form JSON object keys take).
    #[serde(default)]
    pub assets: HashMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct EffectDoc {
    #[serde(default)]
    sprites: Vec<EffectSprite>,
}

/// A loaded asset library bundle.
#[derive(Debug)]
pub struct FigureBundle {
    name: String,
    dir: Option<PathBuf>,
    manifest: ManifestData,
    files: HashMap<String, Vec<u8>>,
    effect_sprites: Vec<EffectSprite>,
}

impl FigureBundle {
    /// Load a bundle from its `<name>.figure` directory. A missing directory
    /// or manifest is fatal and carries the path.
    pub fn from_dir(name: &str, dir: &Path) -> Result<Self, BundleError> {
        if !dir.is_dir() {
            return Err(BundleError::Io {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such bundle"),
            });
        }

        let manifest = ManifestData::from_path(&dir.join("manifest.json"))?;

        let effect_path = dir.join("effect.json");
        let effect_sprites = if effect_path.is_file() {
            let doc: EffectDoc = crate::data::read_table(&effect_path)?;
            doc.sprites
        } else {
            Vec::new()
        };

        log::debug!("loaded bundle '{}' from {}", name, dir.display());

        Ok(Self {
            name: name.to_string(),
            dir: Some(dir.to_path_buf()),
            manifest,
            files: HashMap::new(),
            effect_sprites,
        })
    }

    /// Build an in-memory bundle, used by tests and embedded consumers.
    pub fn from_parts(
        name: &str,
        manifest: ManifestData,
        files: HashMap<String, Vec<u8>>,
    ) -> Self {
        Self {
            name: name.to_string(),
            dir: None,
            manifest,
            files,
            effect_sprites: Vec::new(),
        }
    }

    /// Attach effect sprites to an in-memory bundle.
    pub fn with_effect_sprites(mut self, sprites: Vec<EffectSprite>) -> Self {
        self.effect_sprites = sprites;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manifest(&self) -> &ManifestData {
        &self.manifest
    }

    pub fn effect_sprites(&self) -> &[EffectSprite] {
        &self.effect_sprites
    }

    /// Read an asset's texture bytes. `None` when the bundle has no file for
    /// it - the caller records the gap and moves on.
    pub fn get_texture(&self, asset_name: &str) -> Option<Texture> {
        let file_name = format!("{asset_name}.png");

        if let Some(bytes) = self.files.get(&file_name) {
            return Some(Texture(bytes.clone()));
        }

        let dir = self.dir.as_ref()?;
        match fs::read(dir.join(&file_name)) {
            Ok(bytes) => Some(Texture(bytes)),
            Err(_) => {
                log::warn!("bundle '{}' has no texture file {}", self.name, file_name);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> ManifestData {
        ManifestData::from_str(
            r#"{ assets: [ { name: "h_std_bd_1_0_0", x: 6, y: 67 } ] }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_in_memory_texture() {
        let files =
            HashMap::from([("h_std_bd_1_0_0.png".to_string(), vec![0x89, 0x50, 0x4e, 0x47])]);
        let bundle = FigureBundle::from_parts("hh_human_body", manifest(), files);

        let texture = bundle.get_texture("h_std_bd_1_0_0").unwrap();
        assert_eq!(texture.bytes(), [0x89, 0x50, 0x4e, 0x47]);
        assert!(bundle.get_texture("h_std_bd_1_2_0").is_none());
    }

    #[test]
    fn test_missing_dir_is_fatal() {
        let err = FigureBundle::from_dir("nope", Path::new("/definitely/not/here.figure"))
            .unwrap_err();
        assert!(matches!(err, BundleError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.figure"));
    }

    #[test]
    fn test_effect_sprites_default_empty() {
        let bundle = FigureBundle::from_parts("dance.1", manifest(), HashMap::new());
        assert!(bundle.effect_sprites().is_empty());
    }
}
