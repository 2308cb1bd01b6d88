//! The avatars manager: loaded tables, opened libraries, composition cache
//!
//! One manager owns everything a consumer needs to turn look options into a
//! draw definition. Build order within one request is fixed: the effect
//! bundle and every required clothes library open first, then the
//! composition resolves its draw parts, then the referenced textures are
//! pre-loaded as a batch.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::asset::AssetError;
use crate::bundle::{BundleError, EffectSprite, FigureBundle};
use crate::cache::BoundedCache;
use crate::data::{AvatarData, DataError};
use crate::definition::AvatarDrawDefinition;
use crate::library::{AssetLibraryCollection, LibraryError};
use crate::look::{parse_look, Look};

/// The action implicitly included in every composition.
pub const DEFAULT_ACTION: &str = "Default";

/// Libraries opened for every look, whatever it selects.
const BASE_LIBRARIES: &[&str] = &["hh_human_face", "hh_human_item", "hh_human_body"];

const COMPOSITION_CACHE_CAPACITY: usize = 256;

/// Any failure surfaced by a composition request. No retries happen
/// anywhere; every failure reaches the caller synchronously.
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("unknown effect id '{0}'")]
    UnknownEffect(String),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Bundle(#[from] BundleError),
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// A composition request: the look plus the avatar's dynamic state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LookOptions {
    pub look: String,
    pub actions: Vec<String>,
    pub direction: i32,
    pub head_direction: i32,
    pub item: Option<i32>,
    pub effect: Option<String>,
}

/// Owns the data tables, the asset library collection and the caches.
#[derive(Debug)]
pub struct AvatarsManager {
    resource_dir: PathBuf,
    data: AvatarData,
    libraries: AssetLibraryCollection,
    /// Effect sprites per effect library, populated when the bundle opens.
    effect_sprites: HashMap<String, Vec<EffectSprite>>,
    compositions: BoundedCache<String, Rc<AvatarDrawDefinition>>,
}

impl AvatarsManager {
    /// Wrap already-loaded tables. `resource_dir` is where bundles live
    /// (`clothes/<lib>.figure`, `effects/<lib>.figure`).
    pub fn new(resource_dir: &Path, data: AvatarData) -> Self {
        Self {
            resource_dir: resource_dir.to_path_buf(),
            data,
            libraries: AssetLibraryCollection::new(),
            effect_sprites: HashMap::new(),
            compositions: BoundedCache::new(COMPOSITION_CACHE_CAPACITY),
        }
    }

    /// Load every table from the resource directory and wrap it.
    pub fn from_dir(resource_dir: &Path) -> Result<Self, AvatarError> {
        let data = AvatarData::load(resource_dir)?;
        Ok(Self::new(resource_dir, data))
    }

    pub fn data(&self) -> &AvatarData {
        &self.data
    }

    pub fn libraries(&self) -> &AssetLibraryCollection {
        &self.libraries
    }

    /// Ids of the actions that drive animations.
    pub fn available_animations(&self) -> Vec<&str> {
        self.data.actions.animation_actions()
    }

    /// Canonical cache signature: deduplicated sorted actions with the
    /// default injected, plus every other request field.
    fn signature(options: &LookOptions) -> String {
        let mut actions: Vec<&str> = options
            .actions
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(DEFAULT_ACTION))
            .collect();
        actions.sort_unstable();
        actions.dedup();

        let mut parts = vec![
            format!("actions({})", actions.join(",")),
            format!("direction({})", options.direction),
            format!("head-direction({})", options.head_direction),
        ];

        if let Some(item) = options.item {
            parts.push(format!("item({item})"));
        }
        parts.push(format!("look({})", options.look));
        if let Some(effect) = &options.effect {
            parts.push(format!("effect({effect})"));
        }

        parts.join(",")
    }

    /// The asset libraries a look needs opened before it can resolve.
    ///
    /// Always includes the base libraries. Parts without their own library
    /// mapping borrow the first mapping found among their set's parts -
    /// multi-part sets often carry library metadata on only one part.
    pub fn libraries_for_look(&self, look: &Look) -> HashSet<String> {
        let mut libraries: HashSet<String> =
            BASE_LIBRARIES.iter().map(|s| s.to_string()).collect();

        for (set_type, entry) in look {
            let parts = self.data.figure.get_parts(set_type, entry.set_id);

            for part in parts {
                let library = self
                    .data
                    .figure_map
                    .get_library_of_part(part.id, &part.part_type)
                    .or_else(|| {
                        parts.iter().find_map(|candidate| {
                            self.data
                                .figure_map
                                .get_library_of_part(candidate.id, &candidate.part_type)
                        })
                    });

                match library {
                    Some(library) => {
                        libraries.insert(library.to_string());
                    }
                    None => {
                        log::warn!(
                            "no library found for part {} ({}) of set {}-{:?}",
                            part.id,
                            part.part_type,
                            set_type,
                            entry.set_id
                        );
                    }
                }
            }
        }

        libraries
    }

    fn open_clothes_library(&mut self, name: &str) -> Result<(), AvatarError> {
        if self.libraries.is_open(name) {
            return Ok(());
        }

        let dir = self.resource_dir.join("clothes").join(format!("{name}.figure"));
        self.libraries.open(FigureBundle::from_dir(name, &dir)?);
        Ok(())
    }

    /// Open the effect's library and return its declared sprites. An effect
    /// id missing from the effect map is fatal.
    fn open_effect(&mut self, effect_id: &str) -> Result<Vec<EffectSprite>, AvatarError> {
        let effect = self
            .data
            .effect_map
            .get_effect_info(effect_id)
            .ok_or_else(|| AvatarError::UnknownEffect(effect_id.to_string()))?;
        let lib = effect.lib.clone();

        if !self.libraries.is_open(&lib) {
            let dir = self.resource_dir.join("effects").join(format!("{lib}.figure"));
            let bundle = FigureBundle::from_dir(&lib, &dir)?;
            self.effect_sprites.insert(lib.clone(), bundle.effect_sprites().to_vec());
            self.libraries.open(bundle);
        }

        Ok(self.effect_sprites.get(&lib).cloned().unwrap_or_default())
    }

    /// Resolve look options into a draw definition, reusing the cached
    /// composition when the canonical signature matches.
    pub fn get_draw_definition(
        &mut self,
        options: &LookOptions,
    ) -> Result<Rc<AvatarDrawDefinition>, AvatarError> {
        let signature = Self::signature(options);

        if let Some(cached) = self.compositions.get(&signature) {
            log::debug!("composition cache hit: {signature}");
            return Ok(Rc::clone(cached));
        }
        log::debug!("composition cache miss: {signature}");

        let effect_sprites = match &options.effect {
            Some(effect_id) => self.open_effect(effect_id)?,
            None => Vec::new(),
        };

        let look = parse_look(&options.look);

        let required: Vec<String> = self.libraries_for_look(&look).into_iter().collect();
        for library in &required {
            self.open_clothes_library(library)?;
        }

        let mut action_set: HashSet<String> = options.actions.iter().cloned().collect();
        action_set.insert(DEFAULT_ACTION.to_string());

        let definition = AvatarDrawDefinition::new(
            &self.data,
            &look,
            &action_set,
            options.direction,
            options.head_direction,
            options.item,
            effect_sprites,
        );

        // Draw parts resolve strictly after the libraries opened, and the
        // texture batch runs strictly after the full list exists.
        let asset_ids: HashSet<String> = definition
            .draw_parts(&self.data, &self.libraries)?
            .iter()
            .flat_map(|part| part.assets())
            .map(|asset| asset.file_id.clone())
            .collect();
        self.libraries.load_textures(&asset_ids)?;

        let definition = Rc::new(definition);
        self.compositions.insert(signature, Rc::clone(&definition));

        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_injects_and_sorts_actions() {
        let options = LookOptions {
            look: "hd-180-1".to_string(),
            actions: vec!["Wave".to_string(), "Sit".to_string(), "Wave".to_string()],
            direction: 2,
            head_direction: 3,
            item: None,
            effect: None,
        };

        let signature = AvatarsManager::signature(&options);
        assert_eq!(
            signature,
            "actions(Default,Sit,Wave),direction(2),head-direction(3),look(hd-180-1)"
        );
    }

    #[test]
    fn test_signature_includes_item_and_effect() {
        let options = LookOptions {
            look: "hd-180-1".to_string(),
            actions: vec![],
            direction: 0,
            head_direction: 0,
            item: Some(55),
            effect: Some("6".to_string()),
        };

        let signature = AvatarsManager::signature(&options);
        assert!(signature.contains("item(55)"));
        assert!(signature.contains("effect(6)"));
    }

    #[test]
    fn test_signature_action_order_is_canonical() {
        let a = LookOptions {
            actions: vec!["Wave".to_string(), "Sit".to_string()],
            ..Default::default()
        };
        let b = LookOptions {
            actions: vec!["Sit".to_string(), "Wave".to_string()],
            ..Default::default()
        };

        assert_eq!(AvatarsManager::signature(&a), AvatarsManager::signature(&b));
    }

    #[test]
    fn test_explicit_default_action_is_deduplicated() {
        let with_default =
            LookOptions { actions: vec!["Default".to_string()], ..Default::default() };
        let without = LookOptions { actions: vec![], ..Default::default() };

        assert_eq!(
            AvatarsManager::signature(&with_default),
            AvatarsManager::signature(&without)
        );
    }
}
