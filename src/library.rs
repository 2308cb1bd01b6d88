//! The asset library collection: every opened bundle's manifest in one index
//!
//! Opening a bundle registers its assets (and alias-resolved assets) into
//! append-only maps keyed by asset id; the maps live for the collection's
//! lifetime and are bounded by the resource set on disk. Texture loading is
//! a separate pre-load batch: a missing texture file records a tombstone so
//! the batch stays idempotent, while an asset id no opened library owns is
//! a fatal error.

use std::collections::HashMap;

use thiserror::Error;

use crate::bundle::{FigureBundle, Texture};
use crate::data::ManifestAsset;

/// Error raised by the texture pre-load batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// No opened library owns the asset id.
    #[error("couldn't find library for {0}")]
    LibraryNotFound(String),
}

/// Texture slot: loaded bytes, or a tombstone for a known-missing file.
#[derive(Debug)]
enum TextureSlot {
    Loaded(Texture),
    Missing,
}

/// Index over every opened asset library.
#[derive(Debug, Default)]
pub struct AssetLibraryCollection {
    assets: HashMap<String, ManifestAsset>,
    owners: HashMap<String, String>,
    bundles: HashMap<String, FigureBundle>,
    textures: HashMap<String, TextureSlot>,
}

impl AssetLibraryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a bundle with this name has been opened.
    pub fn is_open(&self, name: &str) -> bool {
        self.bundles.contains_key(name)
    }

    /// Open a bundle: register its manifest assets and aliases. Idempotent
    /// per bundle name.
    pub fn open(&mut self, bundle: FigureBundle) {
        if self.is_open(bundle.name()) {
            return;
        }

        let name = bundle.name().to_string();
        let manifest = bundle.manifest();

        for asset in manifest.get_assets() {
            self.assets.insert(asset.name.clone(), asset.clone());
            self.owners.insert(asset.name.clone(), name.clone());
        }

        // Aliases inherit the link target's offsets (and file) with the
        // alias's own flip flags.
        for alias in manifest.get_aliases() {
            let Some(base) = manifest.get_asset(&alias.link) else {
                continue;
            };

            self.assets.insert(
                alias.name.clone(),
                ManifestAsset {
                    name: base.name.clone(),
                    x: base.x,
                    y: base.y,
                    flip_h: alias.flip_h,
                    flip_v: alias.flip_v,
                },
            );
            self.owners.insert(alias.name.clone(), name.clone());
        }

        log::debug!("opened library '{}' ({} assets)", name, manifest.get_assets().len());
        self.bundles.insert(name, bundle);
    }

    /// Manifest pixel offset of an asset id, across all opened libraries.
    pub fn get_offsets(&self, asset_id: &str) -> Option<(f32, f32)> {
        self.assets.get(asset_id).map(|asset| (asset.x, asset.y))
    }

    /// Pre-load the textures for a batch of asset ids. An id without an
    /// owning library is fatal; an owned id whose file is missing records a
    /// tombstone and is skipped on later batches.
    pub fn load_textures<I, S>(&mut self, ids: I) -> Result<(), LibraryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in ids {
            let id = id.as_ref();
            if self.textures.contains_key(id) {
                continue;
            }

            let owner = self
                .owners
                .get(id)
                .ok_or_else(|| LibraryError::LibraryNotFound(id.to_string()))?;
            let bundle = &self.bundles[owner];

            // Aliases store the link target's file name in `name`.
            let file_name = self.assets.get(id).map(|a| a.name.as_str()).unwrap_or(id);

            let slot = match bundle.get_texture(file_name) {
                Some(texture) => TextureSlot::Loaded(texture),
                None => TextureSlot::Missing,
            };
            self.textures.insert(id.to_string(), slot);
        }

        Ok(())
    }

    /// A pre-loaded texture; `None` when never loaded or tombstoned.
    pub fn get_texture(&self, asset_id: &str) -> Option<&Texture> {
        match self.textures.get(asset_id) {
            Some(TextureSlot::Loaded(texture)) => Some(texture),
            _ => None,
        }
    }
}
