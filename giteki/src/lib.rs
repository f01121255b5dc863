pub mod schema;
pub mod store;
pub mod planner;
pub mod mapper;
pub mod source;
pub mod pipeline;
pub mod error;

pub use error::{GitekiError, Result};
pub use mapper::{map_row, RowMapping, SkipReason};
pub use pipeline::{load, FileOutcome, FileReport, ImportSummary, Pipeline, RowOutcome};
pub use planner::ImportPlanner;
pub use schema::{EquipmentRecord, NewEquipmentRecord, RadioAccessTechnology};
pub use source::{RawRow, RowSource, ScriptRowSource};
pub use store::{InsertOutcome, SeedOutcome, SeedReport, Store};
