//! Presentation mapping — status and overlay flags to display tokens.
//!
//! Pure table lookup; the rendering layer decides what to do with the hex
//! values. Past-due overrides the status color. ESI and material shortage
//! are badges, never row backgrounds, so they cannot conflict with the
//! status color.

use serde::Serialize;

use crate::status::Status;

/// Row background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    PastDue,
    Unengineered,
    InWork,
    CanShip,
    PartialInventory,
    NotStarted,
}

impl ColorToken {
    pub fn hex(self) -> &'static str {
        match self {
            ColorToken::PastDue => "#FF6B6B",
            ColorToken::Unengineered => "#ADD8E6",
            ColorToken::InWork => "#90EE90",
            ColorToken::CanShip => "#90EE90",
            ColorToken::PartialInventory => "#FFD93D",
            ColorToken::NotStarted => "#FFFFFF",
        }
    }
}

/// Supplemental badge rendered next to the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Esi,
    MaterialShortage,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::Esi => "ESI",
            Badge::MaterialShortage => "Material",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            Badge::Esi => "#87CEEB",
            Badge::MaterialShortage => "#FFB6C1",
        }
    }
}

/// Row color for a status, with the past-due override applied.
pub fn color_for(status: Status, is_past_due: bool) -> ColorToken {
    if is_past_due {
        return ColorToken::PastDue;
    }
    match status {
        Status::Unengineered => ColorToken::Unengineered,
        Status::InWork => ColorToken::InWork,
        Status::CanShip => ColorToken::CanShip,
        Status::PartialInventory => ColorToken::PartialInventory,
        Status::NotStarted => ColorToken::NotStarted,
    }
}

pub fn badges_for(is_esi: bool, has_material_shortage: bool) -> Vec<Badge> {
    let mut badges = Vec::new();
    if is_esi {
        badges.push(Badge::Esi);
    }
    if has_material_shortage {
        badges.push(Badge::MaterialShortage);
    }
    badges
}
