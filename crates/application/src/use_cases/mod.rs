//! Application use cases (business logic orchestration).

mod export_variables;
mod import_variables;
mod list_collections;
mod settings;

pub use export_variables::ExportVariables;
pub use import_variables::{ImportOutcome, ImportVariables};
pub use list_collections::{CollectionSummary, ListCollections};
pub use settings::{LoadSettings, SaveSettings};
