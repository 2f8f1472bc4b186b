pub mod runner;
pub mod snapshot;

pub use runner::Pipeline;
pub use snapshot::{DashboardRow, DashboardSnapshot};
