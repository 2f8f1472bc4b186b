//! Filter engine — composable predicates over the status-tagged record set.
//!
//! Composition is strict AND. Per-filter counts are computed against the
//! full record set, independent of every other filter, so the UI can show
//! what a toggle *would* match before it is applied. Invalid filter values
//! are rejected when constructed and never reach `apply`.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::pipeline::DashboardRow;
use crate::status::Status;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("invalid due-date range: {from} is after {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },

    #[error("unparseable filter date '{0}'")]
    BadDate(String),
}

/// ESI tri-state filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EsiFilter {
    #[default]
    All,
    EsiOnly,
    NonEsi,
}

/// Customer name filter; both variants compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerFilter {
    Exact(String),
    Substring(String),
}

impl CustomerFilter {
    fn matches(&self, customer: &str) -> bool {
        match self {
            CustomerFilter::Exact(name) => customer.trim().eq_ignore_ascii_case(name.trim()),
            CustomerFilter::Substring(needle) => customer
                .to_ascii_lowercase()
                .contains(&needle.trim().to_ascii_lowercase()),
        }
    }
}

/// Inclusive due-date range. Constructed through `new`, which rejects
/// inverted bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, FilterError> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(FilterError::InvertedRange { from, to });
            }
        }
        Ok(Self { from, to })
    }

    /// Parses ISO bounds from user input; blank means unbounded.
    pub fn parse(from: &str, to: &str) -> Result<Self, FilterError> {
        let parse_bound = |raw: &str| -> Result<Option<NaiveDate>, FilterError> {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse()
                .map(Some)
                .map_err(|_| FilterError::BadDate(trimmed.to_string()))
        };

        Self::new(parse_bound(from)?, parse_bound(to)?)
    }

    /// Records without a due date never match an active range.
    fn matches(&self, due_date: Option<NaiveDate>) -> bool {
        let Some(date) = due_date else {
            return false;
        };
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// The active filters. Default is everything off (all records match).
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub unengineered: bool,
    pub in_work: bool,
    pub can_ship: bool,
    pub esi: EsiFilter,
    pub customer: Option<CustomerFilter>,
    pub due_range: Option<DateRange>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        !self.unengineered
            && !self.in_work
            && !self.can_ship
            && self.esi == EsiFilter::All
            && self.customer.is_none()
            && self.due_range.is_none()
    }

    fn matches(&self, row: &DashboardRow) -> bool {
        if self.unengineered && row.status != Status::Unengineered {
            return false;
        }
        if self.in_work && row.status != Status::InWork {
            return false;
        }
        if self.can_ship && row.status != Status::CanShip {
            return false;
        }
        match self.esi {
            EsiFilter::All => {}
            EsiFilter::EsiOnly => {
                if !row.record.is_esi {
                    return false;
                }
            }
            EsiFilter::NonEsi => {
                if row.record.is_esi {
                    return false;
                }
            }
        }
        if let Some(customer) = &self.customer {
            if !customer.matches(&row.record.customer_name) {
                return false;
            }
        }
        if let Some(range) = &self.due_range {
            if !range.matches(row.record.due_date) {
                return false;
            }
        }
        true
    }
}

/// Single-filter counts against the full record set. Toggle and ESI counts
/// are always reported; customer and date-range counts only when those
/// filters are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterCounts {
    pub unengineered: usize,
    pub in_work: usize,
    pub can_ship: usize,
    pub esi_only: usize,
    pub non_esi: usize,
    pub customer: Option<usize>,
    pub due_range: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub matched: Vec<DashboardRow>,
    pub counts: FilterCounts,
}

/// Applies the filter set. Pure: same input, same output, no side effects.
pub fn apply(rows: &[DashboardRow], filters: &FilterSet) -> FilterOutcome {
    let count = |pred: &dyn Fn(&DashboardRow) -> bool| rows.iter().filter(|r| pred(r)).count();

    let counts = FilterCounts {
        unengineered: count(&|r| r.status == Status::Unengineered),
        in_work: count(&|r| r.status == Status::InWork),
        can_ship: count(&|r| r.status == Status::CanShip),
        esi_only: count(&|r| r.record.is_esi),
        non_esi: count(&|r| !r.record.is_esi),
        customer: filters
            .customer
            .as_ref()
            .map(|c| count(&|r| c.matches(&r.record.customer_name))),
        due_range: filters
            .due_range
            .as_ref()
            .map(|range| count(&|r| range.matches(r.record.due_date))),
    };

    let matched = rows
        .iter()
        .filter(|row| filters.matches(row))
        .cloned()
        .collect();

    FilterOutcome { matched, counts }
}
