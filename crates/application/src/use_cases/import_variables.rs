//! Import variables use case

use varsync_domain::{
    Document, FallbackSubstitution, Settings, StoreIndex, ValidationError, ValidationErrorCode,
};

use crate::import::{
    FlattenError, ImportError, ResolvedEntry, StoreSynchronizer, Validator, flatten, resolve,
};
use crate::ports::VariableStore;

/// Result of an import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportOutcome {
    /// Validation errors, or modes the store refused to add.
    pub errors: Vec<ValidationError>,
    /// References replaced by fallbacks.
    pub substitutions: Vec<FallbackSubstitution>,
    /// Variables written to the store. Empty when validation failed.
    pub entries: Vec<ResolvedEntry>,
    /// Number of alias resolution passes.
    pub passes: usize,
}

impl ImportOutcome {
    /// Returns true if the import finished without errors.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if the store was modified.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !self.entries.is_empty()
    }

    fn rejected(errors: Vec<ValidationError>, substitutions: Vec<FallbackSubstitution>) -> Self {
        Self {
            errors,
            substitutions,
            ..Self::default()
        }
    }
}

/// Imports a document into the variable store.
///
/// The use case owns its store session; `execute` takes `&mut self` so two
/// imports cannot run against the same session at once.
pub struct ImportVariables<S> {
    store: S,
}

impl<S: VariableStore> ImportVariables<S> {
    /// Creates a new `ImportVariables` use case.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Gives back the store session.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Executes the use case.
    ///
    /// Document problems are returned in [`ImportOutcome::errors`] and leave
    /// the store untouched.
    ///
    /// # Arguments
    /// * `document` - The document to import
    /// * `settings` - Import settings
    ///
    /// # Errors
    /// Returns an error if resolution fails or the store rejects an operation.
    pub async fn execute(
        &mut self,
        document: &Document,
        settings: &Settings,
    ) -> Result<ImportOutcome, ImportError> {
        let snapshot = self.store.snapshot().await?;
        let existing = StoreIndex::new(&snapshot);

        let mut flat = match flatten(&document.collections) {
            Ok(flat) => flat,
            Err(FlattenError::DuplicateKeys(keys)) => {
                let errors = keys
                    .into_iter()
                    .map(|key| {
                        ValidationError::new(
                            key.as_str(),
                            format!("Variable '{key}' is declared more than once"),
                            ValidationErrorCode::DuplicateVariableKey,
                        )
                    })
                    .collect::<Vec<_>>();
                tracing::warn!(duplicates = errors.len(), "duplicate variable keys");
                return Ok(ImportOutcome::rejected(errors, Vec::new()));
            }
        };

        let report = Validator::new(settings, &existing).validate(&document.collections, &mut flat);
        if !report.is_valid() {
            tracing::warn!(errors = report.errors.len(), "import rejected by validation");
            return Ok(ImportOutcome::rejected(report.errors, report.substitutions));
        }

        let resolution = resolve(&flat, &existing)?;
        let synced = StoreSynchronizer::new(&mut self.store, settings, &existing)
            .materialize(&document.collections, &resolution)
            .await?;

        Ok(ImportOutcome {
            errors: synced.errors,
            substitutions: report.substitutions,
            entries: synced.entries,
            passes: resolution.passes,
        })
    }
}
