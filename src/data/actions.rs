//! Actions table: every gesture/pose/state an avatar can carry
//!
//! Actions are static records; a composition holds a precedence-sorted
//! subset of them. The table also carries per-action hand-item parameters
//! (which carried-item id a `cri`/`usei` state maps to).

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{read_table, DataError};

/// A gesture/pose/state applied to the avatar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AvatarActionInfo {
    pub id: String,
    pub state: String,
    pub precedence: i32,
    pub geometry_type: String,
    #[serde(default)]
    pub active_part_set: Option<String>,
    pub asset_part_definition: String,
    #[serde(default)]
    pub prevents: Vec<String>,
    #[serde(default)]
    pub is_animation: bool,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize)]
struct ActionParamDoc {
    id: String,
    value: i32,
}

#[derive(Debug, Deserialize)]
struct ActionDoc {
    #[serde(flatten)]
    info: AvatarActionInfo,
    #[serde(default)]
    params: Vec<ActionParamDoc>,
}

#[derive(Debug, Deserialize)]
struct ActionsDoc {
    #[serde(default)]
    actions: Vec<ActionDoc>,
}

/// The loaded actions table.
#[derive(Debug)]
pub struct ActionsData {
    actions: Vec<AvatarActionInfo>,
    by_id: HashMap<String, usize>,
    hand_items: HashMap<(String, String), i32>,
}

impl ActionsData {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        Ok(Self::from_doc(read_table(path)?))
    }

    pub fn from_str(text: &str) -> Result<Self, DataError> {
        let doc = json5::from_str(text).map_err(|e| DataError::Parse {
            path: "<inline actions table>".into(),
            message: e.to_string(),
        })?;
        Ok(Self::from_doc(doc))
    }

    fn from_doc(doc: ActionsDoc) -> Self {
        let mut actions = Vec::new();
        let mut by_id = HashMap::new();
        let mut hand_items = HashMap::new();

        for action in doc.actions {
            for param in action.params {
                hand_items.insert((action.info.id.clone(), param.id), param.value);
            }
            by_id.insert(action.info.id.clone(), actions.len());
            actions.push(action.info);
        }

        Self { actions, by_id, hand_items }
    }

    /// All actions, in table order.
    pub fn get_actions(&self) -> &[AvatarActionInfo] {
        &self.actions
    }

    pub fn get_action(&self, id: &str) -> Option<&AvatarActionInfo> {
        self.by_id.get(id).map(|&i| &self.actions[i])
    }

    /// Hand-item parameter declared on an action, e.g. which item id a
    /// carry state's `param` maps to.
    pub fn get_hand_item(&self, action_id: &str, param_id: &str) -> Option<i32> {
        self.hand_items
            .get(&(action_id.to_string(), param_id.to_string()))
            .copied()
    }

    /// Ids of the actions that drive animations - the query surface a
    /// consumer uses to enumerate what an avatar can play.
    pub fn animation_actions(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|a| a.is_animation)
            .map(|a| a.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        actions: [
            {
                id: "Default",
                state: "std",
                precedence: 0,
                geometry_type: "vertical",
                active_part_set: "figure",
                asset_part_definition: "std",
                is_default: true,
            },
            {
                id: "Wave",
                state: "wave",
                precedence: 10,
                geometry_type: "vertical",
                active_part_set: "handLeft",
                asset_part_definition: "wav",
                is_animation: true,
            },
            {
                id: "CarryItem",
                state: "cri",
                precedence: 6,
                geometry_type: "vertical",
                active_part_set: "itemRight",
                asset_part_definition: "crr",
                prevents: ["Lay"],
                params: [ { id: "1", value: 2 } ],
            },
        ],
    }"#;

    #[test]
    fn test_actions_in_table_order() {
        let data = ActionsData::from_str(TABLE).unwrap();
        let ids: Vec<_> = data.get_actions().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["Default", "Wave", "CarryItem"]);
    }

    #[test]
    fn test_get_action() {
        let data = ActionsData::from_str(TABLE).unwrap();
        let wave = data.get_action("Wave").unwrap();

        assert_eq!(wave.precedence, 10);
        assert_eq!(wave.active_part_set.as_deref(), Some("handLeft"));
        assert!(wave.is_animation);
        assert!(data.get_action("Moonwalk").is_none());
    }

    #[test]
    fn test_prevents_list() {
        let data = ActionsData::from_str(TABLE).unwrap();
        assert_eq!(data.get_action("CarryItem").unwrap().prevents, ["Lay"]);
    }

    #[test]
    fn test_hand_items() {
        let data = ActionsData::from_str(TABLE).unwrap();
        assert_eq!(data.get_hand_item("CarryItem", "1"), Some(2));
        assert_eq!(data.get_hand_item("CarryItem", "2"), None);
    }

    #[test]
    fn test_animation_actions() {
        let data = ActionsData::from_str(TABLE).unwrap();
        assert_eq!(data.animation_actions(), ["Wave"]);
    }
}
