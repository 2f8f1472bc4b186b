//! Canonical record types produced by the load/enrich pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One job after normalization and enrichment — the unit of truth for the
/// dashboard. Rebuilt wholesale on every refresh; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalJobRecord {
    /// Primary key. Non-empty, unique within one load cycle.
    pub job_id: String,
    pub order_id: String,
    pub part_number: String,
    pub description: String,
    pub customer_name: String,
    /// Defaults to false when the source field is blank or missing.
    pub is_engineered: bool,
    pub order_qty: f64,
    pub qty_completed: f64,
    pub due_date: Option<NaiveDate>,
    pub need_by_date: Option<NaiveDate>,
    /// Most recent labor date across all matching labor rows.
    pub last_labor_date: Option<NaiveDate>,
    /// Sum of hours across all matching labor rows.
    pub total_labor_hours: f64,
    pub is_esi: bool,
    /// Absent when the inventory source is unavailable for the whole load.
    pub inventory_on_hand: Option<f64>,
    /// True when the material-not-issued source reports required > issued
    /// for this job.
    pub has_material_shortage: bool,
}

impl CanonicalJobRecord {
    /// Quantity still to produce. Never negative.
    pub fn remaining_qty(&self) -> f64 {
        (self.order_qty - self.qty_completed).max(0.0)
    }
}
