//! Test harness for isolated pipeline runs.
//!
//! Owns a temporary directory, writes source fixtures into it, and builds a
//! `Pipeline` against them. Optional sources stay unconfigured until a
//! fixture is written for them.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::TempDir;

use shopdispatch::pipeline::DashboardSnapshot;
use shopdispatch::{Config, Database, Pipeline, SourcesConfig};

pub const PRIMARY_HEADER: &str =
    "Job,Order,Part,Description,Engineered,Order Qty,Qty Completed,Due Date,Need By,Customer";

fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fixed "today" so past-due assertions are deterministic.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
}

pub struct TestHarness {
    temp_dir: TempDir,
    sources: SourcesConfig,
    database: Option<Database>,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let sources = SourcesConfig {
            order_jobs: temp_dir.path().join("order_jobs.csv"),
            labor_history: None,
            order_backlog: None,
            part_inventory: None,
            material_not_issued: None,
        };
        Self {
            temp_dir,
            sources,
            database: None,
        }
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut f = std::fs::File::create(&path).expect("create fixture");
        f.write_all(content.as_bytes()).expect("write fixture");
        path
    }

    /// Writes the primary job table from data lines (header added here).
    pub fn write_primary<S: AsRef<str>>(&mut self, rows: &[S]) {
        let content = format!("{}\n{}\n", PRIMARY_HEADER, join_lines(rows));
        self.write("order_jobs.csv", &content);
    }

    /// Removes the primary source file to simulate a missing export.
    pub fn remove_primary(&self) {
        let _ = std::fs::remove_file(&self.sources.order_jobs);
    }

    /// Writes the headerless labor history export.
    pub fn write_labor<S: AsRef<str>>(&mut self, rows: &[S]) {
        let path = self.write("labor_history.csv", &format!("{}\n", join_lines(rows)));
        self.sources.labor_history = Some(path);
    }

    /// Points the labor source at a file that does not exist.
    pub fn configure_missing_labor(&mut self) {
        self.sources.labor_history = Some(self.temp_dir.path().join("no_such_labor.csv"));
    }

    pub fn write_backlog<S: AsRef<str>>(&mut self, orders: &[S]) {
        let path = self.write(
            "order_backlog.csv",
            &format!("Order\n{}\n", join_lines(orders)),
        );
        self.sources.order_backlog = Some(path);
    }

    pub fn write_inventory<S: AsRef<str>>(&mut self, rows: &[S]) {
        let path = self.write(
            "part_inventory.csv",
            &format!("Part,Qty On Hand\n{}\n", join_lines(rows)),
        );
        self.sources.part_inventory = Some(path);
    }

    pub fn write_material(&mut self, xml: &str) {
        let path = self.write("material_not_issued.xml", xml);
        self.sources.material_not_issued = Some(path);
    }

    /// Attaches an in-memory notes store to subsequent pipelines.
    pub fn with_notes_db(&mut self) -> Database {
        let db = Database::open_in_memory().expect("open notes db");
        self.database = Some(db.clone());
        db
    }

    pub fn config(&self) -> Config {
        Config {
            version: "1.0".to_string(),
            sources: self.sources.clone(),
            database_path: None,
            refresh_interval_secs: 300,
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::from_config(&self.config(), self.database.clone())
    }

    /// Runs one refresh with the fixed test date and unwraps the snapshot.
    pub fn refresh(&self) -> DashboardSnapshot {
        self.pipeline()
            .refresh_as_of(today())
            .expect("refresh succeeds")
    }
}
