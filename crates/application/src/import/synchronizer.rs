//! Store synchronization.
//!
//! Writes a resolved document into the host store: collections and modes
//! first, then variables, then literals, then aliases once every target
//! exists.

use indexmap::IndexMap;
use varsync_domain::{
    Collection, FlatKey, Settings, StoreCollection, StoreIndex, StoreMode, ValidationError,
    ValidationErrorCode, VariableId,
};

use super::ImportError;
use super::resolver::{AliasTarget, Resolution, ResolvedValue};
use crate::ports::{StoreError, VariableStore};

/// A document variable and the store variable it was written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Document key.
    pub key: FlatKey,
    /// Store handle.
    pub handle: VariableId,
    /// Whether every declared mode received a value.
    pub complete: bool,
}

/// What the synchronizer did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// One entry per document variable, in document order.
    pub entries: Vec<ResolvedEntry>,
    /// Recoverable problems, such as modes the store refused to add.
    pub errors: Vec<ValidationError>,
    /// Number of collections created.
    pub created_collections: usize,
    /// Number of variables created.
    pub created_variables: usize,
}

/// A collection as the synchronizer uses it.
struct Target {
    collection: StoreCollection,
    reused: bool,
    declared: usize,
}

/// Drives the store port to materialize a resolution.
pub struct StoreSynchronizer<'a, S: ?Sized> {
    store: &'a mut S,
    settings: &'a Settings,
    existing: &'a StoreIndex,
}

impl<'a, S: VariableStore + ?Sized> StoreSynchronizer<'a, S> {
    /// Creates a synchronizer over a store session.
    pub const fn new(store: &'a mut S, settings: &'a Settings, existing: &'a StoreIndex) -> Self {
        Self {
            store,
            settings,
            existing,
        }
    }

    /// Writes every collection, variable, literal and alias.
    ///
    /// # Errors
    ///
    /// Returns an error on any store failure other than the mode cap, and if
    /// an alias target has no store handle.
    pub async fn materialize(
        mut self,
        collections: &[Collection],
        resolution: &Resolution,
    ) -> Result<SyncOutcome, ImportError> {
        let mut outcome = SyncOutcome::default();
        let mut targets: IndexMap<String, Target> = IndexMap::new();

        for collection in collections {
            let name = collection.display_name().into_owned();
            if targets.contains_key(&name) {
                continue;
            }
            let target = self
                .prepare_collection(&name, collection.mode_names(), &mut outcome)
                .await?;
            targets.insert(name, target);
        }

        let mut handles: IndexMap<FlatKey, VariableId> = IndexMap::new();
        for (key, variable) in &resolution.variables {
            let target = targets
                .get(key.collection())
                .ok_or_else(|| ImportError::MissingCollection(key.collection().to_string()))?;

            let reusable = if target.reused {
                self.existing.variable(key.as_str()).cloned()
            } else {
                None
            };
            let handle = if let Some(handle) = reusable {
                handle
            } else {
                outcome.created_variables += 1;
                self.store
                    .create_variable(&target.collection.id, key.path(), variable.var_type.into())
                    .await?
            };
            if let Some(description) = &variable.description {
                self.store.set_description(&handle, description).await?;
            }
            handles.insert(key.clone(), handle);
        }

        let mut assigned: IndexMap<&FlatKey, usize> = IndexMap::new();

        for (key, variable) in &resolution.variables {
            let collection = &targets[key.collection()].collection;
            let handle = &handles[key];
            for (mode, value) in &variable.values {
                let ResolvedValue::Literal(literal) = value else {
                    continue;
                };
                let Some(mode) = collection.mode_named(mode) else {
                    continue;
                };
                self.store
                    .set_value(handle, &mode.id, literal.clone().into())
                    .await?;
                *assigned.entry(key).or_default() += 1;
            }
        }

        for key in &resolution.alias_order {
            let collection = &targets[key.collection()].collection;
            let handle = &handles[key];
            for (mode, value) in &resolution.variables[key].values {
                let ResolvedValue::Alias(target) = value else {
                    continue;
                };
                let Some(mode) = collection.mode_named(mode) else {
                    continue;
                };
                let target = match target {
                    AliasTarget::Declared(target) => handles
                        .get(target)
                        .ok_or_else(|| ImportError::MissingHandle(target.clone()))?,
                    AliasTarget::Existing(id) => id,
                };
                self.store.set_alias(handle, &mode.id, target).await?;
                *assigned.entry(key).or_default() += 1;
            }
        }

        for (key, handle) in handles {
            let declared = targets[key.collection()].declared;
            let complete = assigned.get(&key).copied().unwrap_or_default() >= declared;
            outcome.entries.push(ResolvedEntry {
                key,
                handle,
                complete,
            });
        }

        tracing::info!(
            collections = outcome.created_collections,
            variables = outcome.created_variables,
            errors = outcome.errors.len(),
            "synchronized store"
        );
        Ok(outcome)
    }

    async fn prepare_collection(
        &mut self,
        name: &str,
        modes: &[String],
        outcome: &mut SyncOutcome,
    ) -> Result<Target, ImportError> {
        let existing = if self.settings.extend_existing_collections {
            self.existing.collection(name).cloned()
        } else {
            None
        };

        let (mut collection, reused, pending) = if let Some(collection) = existing {
            tracing::debug!(collection = name, "extending existing collection");
            (collection, true, modes)
        } else {
            let mut collection = self.store.create_collection(name).await?;
            outcome.created_collections += 1;
            let declared = match (modes.split_first(), collection.modes.first_mut()) {
                (Some((first, rest)), Some(default_mode)) => {
                    self.store
                        .rename_mode(&collection.id, &default_mode.id, first)
                        .await?;
                    default_mode.name.clone_from(first);
                    rest
                }
                _ => modes,
            };
            (collection, false, declared)
        };

        for mode in pending {
            if collection.mode_named(mode).is_some() {
                continue;
            }
            match self.store.add_mode(&collection.id, mode).await {
                Ok(id) => collection.modes.push(StoreMode {
                    id,
                    name: mode.clone(),
                }),
                Err(StoreError::ModeLimitReached { limit, .. }) => {
                    tracing::warn!(collection = name, mode = %mode, limit, "unable to add mode");
                    outcome.errors.push(ValidationError::new(
                        name,
                        format!("Unable to add mode '{mode}': the collection allows at most {limit} modes"),
                        ValidationErrorCode::UnableToAddMode,
                    ));
                }
                Err(error) => return Err(error.into()),
            }
        }

        Ok(Target {
            collection,
            reused,
            declared: modes.len(),
        })
    }
}
