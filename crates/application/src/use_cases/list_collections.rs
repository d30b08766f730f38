//! List collections use case

use crate::ApplicationResult;
use crate::ports::VariableStore;

/// Summary of a store collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    /// Collection name.
    pub name: String,
    /// Mode names, default mode first.
    pub modes: Vec<String>,
    /// Number of variables in the collection.
    pub variable_count: usize,
}

/// Lists the collections held by the store.
pub struct ListCollections<S> {
    store: S,
}

impl<S: VariableStore> ListCollections<S> {
    /// Creates a new `ListCollections` use case.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub async fn execute(&self) -> ApplicationResult<Vec<CollectionSummary>> {
        let snapshot = self.store.snapshot().await?;

        Ok(snapshot
            .collections
            .iter()
            .map(|collection| CollectionSummary {
                name: collection.name.clone(),
                modes: collection.modes.iter().map(|mode| mode.name.clone()).collect(),
                variable_count: snapshot.variables_in(&collection.id).count(),
            })
            .collect())
    }
}
