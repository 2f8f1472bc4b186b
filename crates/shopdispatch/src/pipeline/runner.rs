use std::collections::HashMap;

use chrono::{Local, NaiveDate, Utc};
use tracing::info_span;

use crate::config::Config;
use crate::db::{note_repo, Database};
use crate::enrich;
use crate::error::Result;
use crate::model::CanonicalJobRecord;
use crate::present;
use crate::source::SourceLoader;
use crate::status;

use super::snapshot::{DashboardRow, DashboardSnapshot};

/// The full load → normalize → enrich → derive pipeline. One synchronous
/// run per refresh; the returned snapshot is complete or the run failed.
pub struct Pipeline {
    loader: SourceLoader,
    db: Option<Database>,
}

impl Pipeline {
    /// Production constructor. `db` is the notes side-store; without it,
    /// note counts are zero.
    pub fn from_config(config: &Config, db: Option<Database>) -> Self {
        Self {
            loader: SourceLoader::new(config.sources.clone()),
            db,
        }
    }

    /// Runs one refresh against today's date.
    pub fn refresh(&self) -> Result<DashboardSnapshot> {
        self.refresh_as_of(Local::now().date_naive())
    }

    /// Runs one refresh with an explicit "today" (testable, deterministic).
    pub fn refresh_as_of(&self, today: NaiveDate) -> Result<DashboardSnapshot> {
        let _refresh_span = info_span!("refresh", %today).entered();

        let (sources, diagnostics) = {
            let _step = info_span!("load_sources").entered();
            self.loader.load_all()?
        };

        let records = {
            let _step = info_span!("enrich").entered();
            enrich::enrich(&sources)
        };

        let note_counts = {
            let _step = info_span!("merge_notes").entered();
            self.note_counts()
        };

        let rows = {
            let _step = info_span!("tag_and_color").entered();
            records
                .into_iter()
                .map(|record| build_row(record, today, &note_counts))
                .collect::<Vec<_>>()
        };

        log::info!(
            "Refresh complete: {} rows, {} optional sources unavailable",
            rows.len(),
            diagnostics.unavailable_sources.len()
        );

        Ok(DashboardSnapshot {
            rows,
            diagnostics,
            generated_at: Utc::now(),
        })
    }

    /// Note counts by job id. Store failures degrade to zero counts; a
    /// broken notes database must not take the dashboard down.
    fn note_counts(&self) -> HashMap<String, u64> {
        match &self.db {
            Some(db) => note_repo::counts_by_job(db).unwrap_or_else(|e| {
                log::warn!("Failed to read note counts, showing zero: {}", e);
                HashMap::new()
            }),
            None => HashMap::new(),
        }
    }
}

fn build_row(
    record: CanonicalJobRecord,
    today: NaiveDate,
    note_counts: &HashMap<String, u64>,
) -> DashboardRow {
    let tag = status::tag(&record, today);
    DashboardRow {
        status: tag.status,
        is_past_due: tag.is_past_due,
        can_ship: tag.can_ship,
        remaining_qty: record.remaining_qty(),
        color: present::color_for(tag.status, tag.is_past_due),
        badges: present::badges_for(record.is_esi, record.has_material_shortage),
        note_count: note_counts.get(&record.job_id).copied().unwrap_or(0),
        record,
    }
}
