//! Export variables use case

use varsync_domain::{ColorFormat, Document};

use crate::export::{ExportError, Exporter};
use crate::ports::VariableStore;

/// Exports store collections as a document.
pub struct ExportVariables<S> {
    store: S,
}

impl<S: VariableStore> ExportVariables<S> {
    /// Creates a new `ExportVariables` use case.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Executes the use case.
    ///
    /// # Arguments
    /// * `collection` - Collection to export, or `None` for all of them
    /// * `color_format` - Encoding for color values
    ///
    /// # Errors
    /// Returns `ExportError::CollectionNotFound` if the named collection
    /// doesn't exist.
    pub async fn execute(
        &self,
        collection: Option<&str>,
        color_format: ColorFormat,
    ) -> Result<Document, ExportError> {
        let snapshot = self.store.snapshot().await?;
        let exporter = Exporter::new(color_format);

        match collection {
            Some(name) => Ok(Document::new(vec![
                exporter.export_collection(&snapshot, name)?,
            ])),
            None => Ok(exporter.export_all(&snapshot)),
        }
    }
}
