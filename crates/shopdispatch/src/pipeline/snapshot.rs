//! Snapshot types — the immutable output of one refresh.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::filter::{self, FilterOutcome, FilterSet};
use crate::model::CanonicalJobRecord;
use crate::present::{Badge, ColorToken};
use crate::source::LoadDiagnostics;
use crate::status::Status;

/// One displayable row: canonical record plus everything derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardRow {
    pub record: CanonicalJobRecord,
    pub status: Status,
    pub is_past_due: bool,
    pub can_ship: bool,
    pub remaining_qty: f64,
    pub color: ColorToken,
    pub badges: Vec<Badge>,
    /// Notes on file for this job, merged read-only from the side-store.
    pub note_count: u64,
}

/// A fully-built output set. Built in a scratch area and swapped in whole;
/// consumers never see a partial snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub rows: Vec<DashboardRow>,
    pub diagnostics: LoadDiagnostics,
    pub generated_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    /// Filtered view plus independent per-filter counts.
    pub fn filter(&self, filters: &FilterSet) -> FilterOutcome {
        filter::apply(&self.rows, filters)
    }
}
