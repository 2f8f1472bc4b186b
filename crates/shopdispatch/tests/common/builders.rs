//! Fixture builders for primary-table CSV lines.

#![allow(dead_code)]

/// Builds one primary-table data line in header column order.
#[derive(Debug, Clone)]
pub struct JobRowBuilder {
    job: String,
    order: String,
    part: String,
    description: String,
    engineered: bool,
    order_qty: f64,
    qty_completed: f64,
    due_date: String,
    need_by: String,
    customer: String,
}

impl JobRowBuilder {
    pub fn new(job: &str) -> Self {
        Self {
            job: job.to_string(),
            order: "1001".to_string(),
            part: "P-1".to_string(),
            description: "Widget".to_string(),
            engineered: true,
            order_qty: 10.0,
            qty_completed: 0.0,
            due_date: String::new(),
            need_by: String::new(),
            customer: "Acme".to_string(),
        }
    }

    pub fn order(mut self, order: &str) -> Self {
        self.order = order.to_string();
        self
    }

    pub fn part(mut self, part: &str) -> Self {
        self.part = part.to_string();
        self
    }

    pub fn engineered(mut self, engineered: bool) -> Self {
        self.engineered = engineered;
        self
    }

    pub fn order_qty(mut self, qty: f64) -> Self {
        self.order_qty = qty;
        self
    }

    pub fn qty_completed(mut self, qty: f64) -> Self {
        self.qty_completed = qty;
        self
    }

    pub fn due_date(mut self, date: &str) -> Self {
        self.due_date = date.to_string();
        self
    }

    pub fn customer(mut self, customer: &str) -> Self {
        self.customer = customer.to_string();
        self
    }

    pub fn build(self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{}",
            self.job,
            self.order,
            self.part,
            self.description,
            self.engineered,
            self.order_qty,
            self.qty_completed,
            self.due_date,
            self.need_by,
            self.customer
        )
    }
}
