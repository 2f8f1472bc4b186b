pub mod config;
pub mod db;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod present;
pub mod refresh;
pub mod source;
pub mod status;

pub use config::{load_config, Config, SourcesConfig};
pub use db::{Database, DatabaseError, NoteRow};
pub use error::{ConfigError, DispatchError, Result};
pub use filter::{
    CustomerFilter, DateRange, EsiFilter, FilterCounts, FilterError, FilterOutcome, FilterSet,
};
pub use model::CanonicalJobRecord;
pub use pipeline::{DashboardRow, DashboardSnapshot, Pipeline};
pub use present::{Badge, ColorToken};
pub use refresh::{RefreshScheduler, SnapshotStore, StoreStatus};
pub use source::{LoadDiagnostics, LoadError, SourceId};
pub use status::Status;
