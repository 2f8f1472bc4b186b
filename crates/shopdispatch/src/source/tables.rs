//! Typed row builders for each tabular source.
//!
//! Each builder walks the raw table once, runs every cell through the
//! normalizer, skips malformed rows (counting them), and records coercion
//! warnings with row identity. Builders never fail on data — only on a
//! structurally unusable table (required column missing).

use chrono::NaiveDate;

use crate::normalize::{FieldKind, FieldNormalizer, NormalizedField};

use super::csv::CsvTable;
use super::{LoadDiagnostics, LoadError, SourceId};

/// One row of the primary job table.
#[derive(Debug, Clone)]
pub struct OrderJobRow {
    pub job: String,
    pub order: String,
    pub part: String,
    pub description: String,
    pub customer: String,
    pub engineered: bool,
    pub order_qty: f64,
    pub qty_completed: f64,
    pub due_date: Option<NaiveDate>,
    pub need_by: Option<NaiveDate>,
}

/// One row of the labor history export (headerless).
#[derive(Debug, Clone)]
pub struct LaborRow {
    pub job: String,
    pub date: Option<NaiveDate>,
    pub hours: f64,
}

/// One row of the part inventory export.
#[derive(Debug, Clone)]
pub struct InventoryRow {
    pub part: String,
    pub qty_on_hand: f64,
}

/// Positional columns of the headerless labor export:
/// Employee, Date, Type, Code, Hours, Job, Comment.
const LABOR_DATE: usize = 1;
const LABOR_HOURS: usize = 4;
const LABOR_JOB: usize = 5;
const LABOR_MIN_FIELDS: usize = 6;

fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

struct RowContext<'a> {
    source: SourceId,
    row: usize,
    diag: &'a mut LoadDiagnostics,
}

impl RowContext<'_> {
    fn take(&mut self, field: NormalizedField, column: &str) -> NormalizedField {
        if field.coerced {
            self.diag.record_coercion(self.source, self.row, column);
        }
        field
    }
}

/// Builds primary job rows. The `Job` column is required; every other column
/// degrades to its field default when missing from the export.
pub fn order_job_rows(
    table: &CsvTable,
    normalizer: &FieldNormalizer,
    diag: &mut LoadDiagnostics,
) -> Result<Vec<OrderJobRow>, LoadError> {
    let col_job = table.column("Job").ok_or(LoadError::MissingColumn {
        source_id: SourceId::OrderJobs,
        column: "Job",
    })?;
    let col_order = table.column("Order");
    let col_part = table.column("Part");
    let col_description = table.column("Description");
    let col_customer = table.column("Customer");
    let col_engineered = table.column("Engineered");
    let col_order_qty = table.column("Order Qty");
    let col_qty_completed = table.column("Qty Completed");
    let col_due_date = table.column("Due Date");
    let col_need_by = table.column("Need By");

    let mut rows = Vec::with_capacity(table.rows.len());

    for (i, row) in table.rows.iter().enumerate() {
        // 1-based file line, counting the header.
        let line = i + 2;

        if row.len() != table.header.len() {
            diag.record_skipped(SourceId::OrderJobs);
            continue;
        }

        let job = normalizer
            .normalize(cell(row, Some(col_job)), FieldKind::Text)
            .value
            .into_text();
        if job.is_empty() {
            diag.record_skipped(SourceId::OrderJobs);
            continue;
        }

        let mut ctx = RowContext {
            source: SourceId::OrderJobs,
            row: line,
            diag,
        };
        let engineered = ctx
            .take(
                normalizer.normalize(cell(row, col_engineered), FieldKind::Bool),
                "Engineered",
            )
            .value
            .as_bool();
        let order_qty = ctx
            .take(
                normalizer.normalize(cell(row, col_order_qty), FieldKind::Number),
                "Order Qty",
            )
            .value
            .as_number()
            .unwrap_or(0.0)
            .max(0.0);
        let qty_completed = ctx
            .take(
                normalizer.normalize(cell(row, col_qty_completed), FieldKind::Number),
                "Qty Completed",
            )
            .value
            .as_number()
            .unwrap_or(0.0)
            .max(0.0);
        let due_date = ctx
            .take(
                normalizer.normalize(cell(row, col_due_date), FieldKind::Date),
                "Due Date",
            )
            .value
            .as_date();
        let need_by = ctx
            .take(
                normalizer.normalize(cell(row, col_need_by), FieldKind::Date),
                "Need By",
            )
            .value
            .as_date();

        rows.push(OrderJobRow {
            job,
            order: normalizer
                .normalize(cell(row, col_order), FieldKind::Text)
                .value
                .into_text(),
            part: normalizer
                .normalize(cell(row, col_part), FieldKind::Text)
                .value
                .into_text(),
            description: normalizer
                .normalize(cell(row, col_description), FieldKind::Text)
                .value
                .into_text(),
            customer: normalizer
                .normalize(cell(row, col_customer), FieldKind::Text)
                .value
                .into_text(),
            engineered,
            order_qty,
            qty_completed,
            due_date,
            need_by,
        });
    }

    Ok(rows)
}

/// Builds labor rows from the headerless export. Rows with too few fields,
/// a blank job, or a non-blank unparseable date are skipped as malformed.
pub fn labor_rows(
    records: &[Vec<String>],
    normalizer: &FieldNormalizer,
    diag: &mut LoadDiagnostics,
) -> Vec<LaborRow> {
    let mut rows = Vec::with_capacity(records.len());

    for (i, record) in records.iter().enumerate() {
        let line = i + 1;

        if record.len() < LABOR_MIN_FIELDS {
            diag.record_skipped(SourceId::LaborHistory);
            continue;
        }

        let job = normalizer
            .normalize(cell(record, Some(LABOR_JOB)), FieldKind::Text)
            .value
            .into_text();
        if job.is_empty() {
            diag.record_skipped(SourceId::LaborHistory);
            continue;
        }

        let date_field = normalizer.normalize(cell(record, Some(LABOR_DATE)), FieldKind::Date);
        if date_field.coerced {
            // Covers a stray header row as well as corrupt date cells.
            diag.record_skipped(SourceId::LaborHistory);
            continue;
        }

        let mut ctx = RowContext {
            source: SourceId::LaborHistory,
            row: line,
            diag,
        };
        let hours = ctx
            .take(
                normalizer.normalize(cell(record, Some(LABOR_HOURS)), FieldKind::Number),
                "Hours",
            )
            .value
            .as_number()
            .unwrap_or(0.0)
            .max(0.0);

        rows.push(LaborRow {
            job,
            date: date_field.value.as_date(),
            hours,
        });
    }

    rows
}

/// Builds the backlog order list. Membership only; blank orders are skipped.
pub fn backlog_orders(
    table: &CsvTable,
    normalizer: &FieldNormalizer,
    diag: &mut LoadDiagnostics,
) -> Result<Vec<String>, LoadError> {
    let col_order = table.column("Order").ok_or(LoadError::MissingColumn {
        source_id: SourceId::OrderBacklog,
        column: "Order",
    })?;

    let mut orders = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let order = normalizer
            .normalize(cell(row, Some(col_order)), FieldKind::Text)
            .value
            .into_text();
        if order.is_empty() {
            diag.record_skipped(SourceId::OrderBacklog);
            continue;
        }
        orders.push(order);
    }

    Ok(orders)
}

/// Builds inventory rows from the part cost export.
pub fn inventory_rows(
    table: &CsvTable,
    normalizer: &FieldNormalizer,
    diag: &mut LoadDiagnostics,
) -> Result<Vec<InventoryRow>, LoadError> {
    let col_part = table.column("Part").ok_or(LoadError::MissingColumn {
        source_id: SourceId::PartInventory,
        column: "Part",
    })?;
    let col_qty = table
        .column("Qty On Hand")
        .ok_or(LoadError::MissingColumn {
            source_id: SourceId::PartInventory,
            column: "Qty On Hand",
        })?;

    let mut rows = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let line = i + 2;

        let part = normalizer
            .normalize(cell(row, Some(col_part)), FieldKind::Text)
            .value
            .into_text();
        if part.is_empty() {
            diag.record_skipped(SourceId::PartInventory);
            continue;
        }

        let mut ctx = RowContext {
            source: SourceId::PartInventory,
            row: line,
            diag,
        };
        let qty_on_hand = ctx
            .take(
                normalizer.normalize(cell(row, Some(col_qty)), FieldKind::Number),
                "Qty On Hand",
            )
            .value
            .as_number()
            .unwrap_or(0.0)
            .max(0.0);

        rows.push(InventoryRow { part, qty_on_hand });
    }

    Ok(rows)
}
