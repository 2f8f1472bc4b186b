//! Enrichment join — folds the secondary sources into one canonical record
//! per job.
//!
//! Join keys are compared after trimming and ASCII-uppercasing, since the
//! export tooling is inconsistent about whitespace and case. Every primary
//! record survives the join; missing secondary data degrades to
//! absent/false/zero fields.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::model::CanonicalJobRecord;
use crate::source::{LaborRow, SourceSet};

/// Canonical join key for job, order, and part identifiers.
pub fn join_key(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[derive(Debug, Default)]
struct LaborAgg {
    last_date: Option<NaiveDate>,
    total_hours: f64,
}

fn labor_index(rows: &[LaborRow]) -> HashMap<String, LaborAgg> {
    let mut index: HashMap<String, LaborAgg> = HashMap::new();
    for row in rows {
        let agg = index.entry(join_key(&row.job)).or_default();
        agg.total_hours += row.hours;
        if let Some(date) = row.date {
            agg.last_date = Some(agg.last_date.map_or(date, |prev| prev.max(date)));
        }
    }
    index
}

/// Produces the canonical record set for one load cycle.
///
/// Duplicate primary rows for the same job aggregate last-seen-wins for
/// scalar fields; first-seen order of jobs is preserved.
pub fn enrich(sources: &SourceSet) -> Vec<CanonicalJobRecord> {
    let labor = sources.labor.as_deref().map(labor_index);

    let backlog: Option<HashSet<String>> = sources
        .backlog
        .as_ref()
        .map(|orders| orders.iter().map(|o| join_key(o)).collect());

    // Parts can appear on multiple inventory rows; the largest on-hand
    // quantity wins.
    let inventory: Option<HashMap<String, f64>> = sources.inventory.as_ref().map(|rows| {
        let mut index: HashMap<String, f64> = HashMap::new();
        for row in rows {
            let entry = index.entry(join_key(&row.part)).or_insert(row.qty_on_hand);
            if row.qty_on_hand > *entry {
                *entry = row.qty_on_hand;
            }
        }
        index
    });

    let mut job_order: Vec<String> = Vec::new();
    let mut by_job: HashMap<String, &crate::source::OrderJobRow> = HashMap::new();
    for row in &sources.orders {
        let key = join_key(&row.job);
        if by_job.insert(key.clone(), row).is_none() {
            job_order.push(key);
        }
    }

    let records: Vec<CanonicalJobRecord> = job_order
        .iter()
        .map(|key| {
            let row = &by_job[key];
            let agg = labor.as_ref().and_then(|idx| idx.get(key));

            let in_backlog = backlog
                .as_ref()
                .is_some_and(|orders| !row.order.is_empty() && orders.contains(&join_key(&row.order)));
            let is_esi = in_backlog || key.starts_with("ESI");

            let inventory_on_hand = inventory
                .as_ref()
                .map(|idx| idx.get(&join_key(&row.part)).copied().unwrap_or(0.0));

            let has_material_shortage = sources
                .shortages
                .as_ref()
                .is_some_and(|jobs| jobs.contains(key));

            CanonicalJobRecord {
                job_id: row.job.clone(),
                order_id: row.order.clone(),
                part_number: row.part.clone(),
                description: row.description.clone(),
                customer_name: row.customer.clone(),
                is_engineered: row.engineered,
                order_qty: row.order_qty,
                qty_completed: row.qty_completed,
                due_date: row.due_date,
                need_by_date: row.need_by,
                last_labor_date: agg.and_then(|a| a.last_date),
                total_labor_hours: agg.map(|a| a.total_hours).unwrap_or(0.0),
                is_esi,
                inventory_on_hand,
                has_material_shortage,
            }
        })
        .collect();

    tracing::debug!(
        jobs = records.len(),
        primary_rows = sources.orders.len(),
        "enrichment complete"
    );

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{InventoryRow, OrderJobRow};

    fn order_row(job: &str) -> OrderJobRow {
        OrderJobRow {
            job: job.to_string(),
            order: "1001".to_string(),
            part: "P-1".to_string(),
            description: String::new(),
            customer: "Acme".to_string(),
            engineered: true,
            order_qty: 10.0,
            qty_completed: 0.0,
            due_date: None,
            need_by: None,
        }
    }

    fn labor_row(job: &str, date: Option<&str>, hours: f64) -> LaborRow {
        LaborRow {
            job: job.to_string(),
            date: date.map(|d| d.parse().unwrap()),
            hours,
        }
    }

    #[test]
    fn test_labor_aggregation_sums_hours_and_takes_latest_date() {
        let sources = SourceSet {
            orders: vec![order_row("J2")],
            labor: Some(vec![
                labor_row("J2", Some("2026-03-01"), 3.0),
                labor_row("J2", Some("2026-03-04"), 2.0),
            ]),
            ..Default::default()
        };

        let records = enrich(&sources);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_labor_hours, 5.0);
        assert_eq!(
            records[0].last_labor_date,
            Some("2026-03-04".parse().unwrap())
        );
    }

    #[test]
    fn test_join_is_total_without_secondary_matches() {
        let sources = SourceSet {
            orders: vec![order_row("J1")],
            labor: Some(vec![labor_row("OTHER", Some("2026-01-01"), 8.0)]),
            backlog: Some(vec!["9999".to_string()]),
            ..Default::default()
        };

        let records = enrich(&sources);
        assert_eq!(records.len(), 1);
        assert!(records[0].last_labor_date.is_none());
        assert_eq!(records[0].total_labor_hours, 0.0);
        assert!(!records[0].is_esi);
    }

    #[test]
    fn test_join_keys_ignore_case_and_whitespace() {
        let mut row = order_row("  j5  ");
        row.job = " j5 ".to_string();
        let sources = SourceSet {
            orders: vec![row],
            labor: Some(vec![labor_row("J5", Some("2026-02-01"), 1.5)]),
            ..Default::default()
        };

        let records = enrich(&sources);
        assert_eq!(records[0].total_labor_hours, 1.5);
    }

    #[test]
    fn test_duplicate_primary_rows_last_seen_wins() {
        let mut first = order_row("J1");
        first.order_qty = 10.0;
        let mut second = order_row("j1");
        second.order_qty = 25.0;

        let sources = SourceSet {
            orders: vec![first, second],
            ..Default::default()
        };

        let records = enrich(&sources);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].order_qty, 25.0);
    }

    #[test]
    fn test_esi_membership_via_backlog() {
        let sources = SourceSet {
            orders: vec![order_row("J1")],
            backlog: Some(vec!["1001".to_string()]),
            ..Default::default()
        };

        assert!(enrich(&sources)[0].is_esi);
    }

    #[test]
    fn test_esi_job_prefix() {
        let sources = SourceSet {
            orders: vec![order_row("esi-042")],
            backlog: Some(vec![]),
            ..Default::default()
        };

        assert!(enrich(&sources)[0].is_esi);
    }

    #[test]
    fn test_inventory_takes_max_per_part_and_defaults_zero() {
        let mut other = order_row("J2");
        other.part = "P-MISSING".to_string();

        let sources = SourceSet {
            orders: vec![order_row("J1"), other],
            inventory: Some(vec![
                InventoryRow {
                    part: "P-1".to_string(),
                    qty_on_hand: 4.0,
                },
                InventoryRow {
                    part: "p-1".to_string(),
                    qty_on_hand: 9.0,
                },
            ]),
            ..Default::default()
        };

        let records = enrich(&sources);
        assert_eq!(records[0].inventory_on_hand, Some(9.0));
        // Part absent from an available inventory source reads as zero on
        // hand, not absent.
        assert_eq!(records[1].inventory_on_hand, Some(0.0));
    }

    #[test]
    fn test_inventory_absent_when_source_unavailable() {
        let sources = SourceSet {
            orders: vec![order_row("J1")],
            ..Default::default()
        };

        assert_eq!(enrich(&sources)[0].inventory_on_hand, None);
    }

    #[test]
    fn test_material_shortage_flag() {
        let mut shortages = HashSet::new();
        shortages.insert("J1".to_string());

        let sources = SourceSet {
            orders: vec![order_row("J1"), order_row("J2")],
            shortages: Some(shortages),
            ..Default::default()
        };

        let records = enrich(&sources);
        assert!(records[0].has_material_shortage);
        assert!(!records[1].has_material_shortage);
    }
}
