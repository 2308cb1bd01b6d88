//! Figura - library for composing virtual-world avatars
//!
//! This library turns a compact textual "look" descriptor plus dynamic
//! state (direction, actions, held item, effect) into an ordered list of
//! positioned, tinted, mirrored, frame-correct sprite references:
//! - Parse look strings into per-set-type selections
//! - Resolve figure parts, palette colors and required asset libraries
//! - Assemble depth-ordered body regions with action/direction propagation
//! - Resolve per-frame sprites under the octant mirroring rules
//! - Flatten everything in an action-dependent draw order, memoized per
//!   composition signature

pub mod asset;
pub mod body;
pub mod bundle;
pub mod cache;
pub mod cli;
pub mod data;
pub mod definition;
pub mod direction;
pub mod draw_order;
pub mod generation;
pub mod library;
pub mod look;
pub mod manager;
pub mod parts;

pub use asset::AvatarAsset;
pub use definition::{AvatarDrawDefinition, AvatarDrawPart, DrawMode, DrawPart, EffectDrawPart};
pub use generation::{Generation, GenerationCounter};
pub use look::{parse_look, Look, LookEntry};
pub use manager::{AvatarError, AvatarsManager, LookOptions};
