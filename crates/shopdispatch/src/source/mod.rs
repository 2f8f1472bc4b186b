//! Source loading — reads each configured export into typed rows.
//!
//! Only the primary job table is required: its absence is a fatal load
//! error. Every other source degrades gracefully, leaving the dependent
//! enrichment fields absent and a diagnostic behind.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::config::SourcesConfig;
use crate::normalize::FieldNormalizer;

pub mod csv;
pub mod material;
pub mod tables;

pub use material::MaterialError;
pub use tables::{InventoryRow, LaborRow, OrderJobRow};

/// Identifies one configured source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    OrderJobs,
    LaborHistory,
    OrderBacklog,
    PartInventory,
    MaterialNotIssued,
}

impl SourceId {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceId::OrderJobs => "order_jobs",
            SourceId::LaborHistory => "labor_history",
            SourceId::OrderBacklog => "order_backlog",
            SourceId::PartInventory => "part_inventory",
            SourceId::MaterialNotIssued => "material_not_issued",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, SourceId::OrderJobs)
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Primary source '{source_id}' unavailable at '{path}': {source}")]
    PrimaryUnavailable {
        source_id: SourceId,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source '{source_id}' is missing required column '{column}'")]
    MissingColumn {
        source_id: SourceId,
        column: &'static str,
    },
}

/// Skipped-row count for one source.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRows {
    pub source: SourceId,
    pub count: usize,
}

/// One field on one row that could not be parsed; its default was applied.
#[derive(Debug, Clone, Serialize)]
pub struct CoercionWarning {
    pub source: SourceId,
    pub row: usize,
    pub column: String,
}

/// Load-cycle diagnostics surfaced alongside the record set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadDiagnostics {
    pub unavailable_sources: Vec<SourceId>,
    pub skipped_rows: Vec<SkippedRows>,
    pub coercion_warnings: Vec<CoercionWarning>,
    /// False when the inventory source was unavailable; callers disable the
    /// Can-Ship filter rather than showing an always-empty result.
    pub can_ship_available: bool,
}

impl LoadDiagnostics {
    pub fn record_unavailable(&mut self, source: SourceId) {
        if !self.unavailable_sources.contains(&source) {
            self.unavailable_sources.push(source);
        }
    }

    pub fn record_skipped(&mut self, source: SourceId) {
        match self.skipped_rows.iter_mut().find(|s| s.source == source) {
            Some(entry) => entry.count += 1,
            None => self.skipped_rows.push(SkippedRows { source, count: 1 }),
        }
    }

    pub fn record_coercion(&mut self, source: SourceId, row: usize, column: &str) {
        log::warn!(
            "Coercion in {} row {}: column '{}' could not be parsed, default applied",
            source,
            row,
            column
        );
        self.coercion_warnings.push(CoercionWarning {
            source,
            row,
            column: column.to_string(),
        });
    }

    pub fn skipped_for(&self, source: SourceId) -> usize {
        self.skipped_rows
            .iter()
            .find(|s| s.source == source)
            .map(|s| s.count)
            .unwrap_or(0)
    }

    pub fn is_unavailable(&self, source: SourceId) -> bool {
        self.unavailable_sources.contains(&source)
    }
}

/// Everything one load cycle read. Optional sources are `None` when
/// unconfigured or unavailable.
#[derive(Debug, Default)]
pub struct SourceSet {
    pub orders: Vec<OrderJobRow>,
    pub labor: Option<Vec<LaborRow>>,
    pub backlog: Option<Vec<String>>,
    pub inventory: Option<Vec<InventoryRow>>,
    pub shortages: Option<HashSet<String>>,
}

pub struct SourceLoader {
    sources: SourcesConfig,
    normalizer: FieldNormalizer,
}

impl SourceLoader {
    pub fn new(sources: SourcesConfig) -> Self {
        Self {
            sources,
            normalizer: FieldNormalizer::new(),
        }
    }

    /// Reads all configured sources fresh from disk.
    pub fn load_all(&self) -> Result<(SourceSet, LoadDiagnostics), LoadError> {
        let mut diag = LoadDiagnostics::default();

        let table = csv::read_table(&self.sources.order_jobs).map_err(|e| {
            LoadError::PrimaryUnavailable {
                source_id: SourceId::OrderJobs,
                path: self.sources.order_jobs.clone(),
                source: e,
            }
        })?;
        let orders = tables::order_job_rows(&table, &self.normalizer, &mut diag)?;
        log::info!(
            "Loaded {} job rows from primary source ({} skipped)",
            orders.len(),
            diag.skipped_for(SourceId::OrderJobs)
        );

        let labor = match &self.sources.labor_history {
            Some(path) => match csv::read_records(path) {
                Ok(records) => Some(tables::labor_rows(&records, &self.normalizer, &mut diag)),
                Err(e) => {
                    log::warn!("Labor history unavailable at '{}': {}", path.display(), e);
                    diag.record_unavailable(SourceId::LaborHistory);
                    None
                }
            },
            None => {
                diag.record_unavailable(SourceId::LaborHistory);
                None
            }
        };

        let backlog = match &self.sources.order_backlog {
            Some(path) => match csv::read_table(path)
                .map_err(LoadFailure::Io)
                .and_then(|t| {
                    tables::backlog_orders(&t, &self.normalizer, &mut diag)
                        .map_err(LoadFailure::Structure)
                }) {
                Ok(orders) => Some(orders),
                Err(e) => {
                    log::warn!("Order backlog unavailable at '{}': {}", path.display(), e);
                    diag.record_unavailable(SourceId::OrderBacklog);
                    None
                }
            },
            None => {
                diag.record_unavailable(SourceId::OrderBacklog);
                None
            }
        };

        let inventory = match &self.sources.part_inventory {
            Some(path) => match csv::read_table(path)
                .map_err(LoadFailure::Io)
                .and_then(|t| {
                    tables::inventory_rows(&t, &self.normalizer, &mut diag)
                        .map_err(LoadFailure::Structure)
                }) {
                Ok(rows) => Some(rows),
                Err(e) => {
                    log::warn!("Part inventory unavailable at '{}': {}", path.display(), e);
                    diag.record_unavailable(SourceId::PartInventory);
                    None
                }
            },
            None => {
                diag.record_unavailable(SourceId::PartInventory);
                None
            }
        };

        let shortages = match &self.sources.material_not_issued {
            Some(path) => match material::read_shortages(path) {
                Ok(set) => Some(set),
                Err(e) => {
                    log::warn!(
                        "Material-not-issued unavailable at '{}': {}",
                        path.display(),
                        e
                    );
                    diag.record_unavailable(SourceId::MaterialNotIssued);
                    None
                }
            },
            None => {
                diag.record_unavailable(SourceId::MaterialNotIssued);
                None
            }
        };

        diag.can_ship_available = inventory.is_some();

        Ok((
            SourceSet {
                orders,
                labor,
                backlog,
                inventory,
                shortages,
            },
            diag,
        ))
    }
}

/// Internal: why an optional source failed to load.
#[derive(Error, Debug)]
enum LoadFailure {
    #[error("{0}")]
    Io(std::io::Error),
    #[error("{0}")]
    Structure(LoadError),
}
