//! Status derivation.
//!
//! The status waterfall is an ordered rule table evaluated top-to-bottom,
//! first match wins. The engineering gate dominates every downstream state:
//! an unengineered job is Unengineered no matter what else is true of it.
//! Past-due, can-ship, and material-shortage are overlays, not states.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::CanonicalJobRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Unengineered,
    InWork,
    CanShip,
    PartialInventory,
    NotStarted,
}

impl Status {
    pub fn display_name(self) -> &'static str {
        match self {
            Status::Unengineered => "Unengineered",
            Status::InWork => "In-Work",
            Status::CanShip => "Can Ship",
            Status::PartialInventory => "Partial",
            Status::NotStarted => "Not Started",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One row of the waterfall.
pub struct StatusRule {
    pub name: &'static str,
    pub status: Status,
    pub applies: fn(&CanonicalJobRecord) -> bool,
}

/// The waterfall, in evaluation order. The final rule is a catch-all.
pub static STATUS_RULES: [StatusRule; 5] = [
    StatusRule {
        name: "unengineered",
        status: Status::Unengineered,
        applies: |r| !r.is_engineered,
    },
    StatusRule {
        name: "in_work",
        status: Status::InWork,
        applies: |r| r.qty_completed > 0.0,
    },
    StatusRule {
        name: "can_ship",
        status: Status::CanShip,
        applies: |r| r.inventory_on_hand.is_some_and(|on_hand| on_hand >= r.order_qty),
    },
    StatusRule {
        name: "partial_inventory",
        status: Status::PartialInventory,
        applies: |r| r.inventory_on_hand.is_some_and(|on_hand| on_hand > 0.0),
    },
    StatusRule {
        name: "not_started",
        status: Status::NotStarted,
        applies: |_| true,
    },
];

/// First matching rule wins. Total: the catch-all guarantees a status.
pub fn derive_status(record: &CanonicalJobRecord) -> Status {
    STATUS_RULES
        .iter()
        .find(|rule| (rule.applies)(record))
        .map(|rule| rule.status)
        .unwrap_or(Status::NotStarted)
}

pub fn is_past_due(record: &CanonicalJobRecord, today: NaiveDate) -> bool {
    record.due_date.is_some_and(|due| due < today)
}

pub fn can_ship(record: &CanonicalJobRecord) -> bool {
    record
        .inventory_on_hand
        .is_some_and(|on_hand| on_hand >= record.order_qty)
}

/// Status plus overlay flags for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusTag {
    pub status: Status,
    pub is_past_due: bool,
    pub can_ship: bool,
}

pub fn tag(record: &CanonicalJobRecord, today: NaiveDate) -> StatusTag {
    StatusTag {
        status: derive_status(record),
        is_past_due: is_past_due(record, today),
        can_ship: can_ship(record),
    }
}
