//! Direction-indexed draw-order tables
//!
//! Paint order over the nine region ids, per octant. The standard table
//! covers most poses; raising a hand relocates that arm (and its item)
//! later in paint order for the octants where it would otherwise vanish
//! behind the torso.

/// Which draw-order table a composition paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOrder {
    Standard,
    LeftHandActive,
    RightHandActive,
}

type OrderTable = [[&'static str; 9]; 8];

const DEFAULT_DRAW_ORDER: OrderTable = [
    // 0
    ["behind", "bottom", "leftitem", "leftarm", "torso", "rightitem", "rightarm", "head", "top"],
    // 1
    ["behind", "bottom", "leftitem", "leftarm", "torso", "rightitem", "rightarm", "head", "top"],
    // 2
    ["behind", "bottom", "leftitem", "leftarm", "torso", "rightitem", "rightarm", "head", "top"],
    // 3
    ["behind", "bottom", "torso", "leftitem", "leftarm", "rightitem", "rightarm", "head", "top"],
    // 4
    ["behind", "bottom", "rightarm", "rightitem", "torso", "leftitem", "leftarm", "head", "top"],
    // 5
    ["behind", "bottom", "rightarm", "rightitem", "torso", "leftitem", "leftarm", "head", "top"],
    // 6
    ["bottom", "rightarm", "rightitem", "torso", "leftitem", "leftarm", "head", "behind", "top"],
    // 7
    ["bottom", "rightarm", "rightitem", "leftitem", "leftarm", "torso", "head", "behind", "top"],
];

const RIGHT_HAND_ACTIVE_DRAW_ORDER: OrderTable = {
    let mut table = DEFAULT_DRAW_ORDER;
    table[2] =
        ["behind", "bottom", "leftitem", "leftarm", "torso", "head", "rightitem", "rightarm", "top"];
    table[3] =
        ["behind", "bottom", "leftitem", "leftarm", "torso", "head", "rightitem", "rightarm", "top"];
    table[4] =
        ["behind", "bottom", "rightarm", "torso", "leftitem", "leftarm", "head", "rightitem", "top"];
    table
};

const LEFT_HAND_ACTIVE_DRAW_ORDER: OrderTable = {
    let mut table = DEFAULT_DRAW_ORDER;
    table[5] =
        ["behind", "bottom", "rightarm", "rightitem", "torso", "head", "leftitem", "leftarm", "top"];
    table[6] =
        ["behind", "bottom", "rightarm", "rightitem", "torso", "head", "leftitem", "leftarm", "top"];
    table
};

/// The region paint sequence for a table and normalized octant.
pub fn region_sequence(order: DrawOrder, direction: u8) -> &'static [&'static str; 9] {
    let table = match order {
        DrawOrder::Standard => &DEFAULT_DRAW_ORDER,
        DrawOrder::RightHandActive => &RIGHT_HAND_ACTIVE_DRAW_ORDER,
        DrawOrder::LeftHandActive => &LEFT_HAND_ACTIVE_DRAW_ORDER,
    };
    &table[direction as usize % 8]
}

/// Select the table from the active part sets the composition's actions
/// declare (plus `itemRight` when an item is held).
pub fn select_order<'a, I: IntoIterator<Item = &'a str>>(active_part_sets: I) -> DrawOrder {
    let mut left = false;
    let mut right = false;

    for set in active_part_sets {
        match set {
            "handLeft" => left = true,
            "handRight" | "handRightAndHead" => right = true,
            _ => {}
        }
    }

    if left {
        DrawOrder::LeftHandActive
    } else if right {
        DrawOrder::RightHandActive
    } else {
        DrawOrder::Standard
    }
}
