//! Alias resolution.
//!
//! Literals are assigned in one pass. Variables with at least one reference
//! go on a worklist that is scanned until it is empty, or until a full scan
//! makes no progress, which means the remaining references form a cycle or
//! point at something that never resolves.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;
use varsync_domain::{FlatKey, ScalarValue, StoreIndex, ValueError, VariableId, VariableType};

use super::flatten::FlatVariables;

/// Where an alias points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasTarget {
    /// A variable declared in the same document.
    Declared(FlatKey),
    /// A variable that already exists in the store.
    Existing(VariableId),
}

/// A mode value after resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    /// A concrete value.
    Literal(ScalarValue),
    /// A pointer to another variable.
    Alias(AliasTarget),
}

/// A variable with every mode value resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVariable {
    /// Declared type.
    pub var_type: VariableType,
    /// Free-text description.
    pub description: Option<String>,
    /// Resolved value per mode, in document order.
    pub values: IndexMap<String, ResolvedValue>,
}

/// Output of a successful resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Every variable, in document order.
    pub variables: IndexMap<FlatKey, ResolvedVariable>,
    /// Keys holding aliases, in the order they became fully resolved.
    pub alias_order: Vec<FlatKey>,
    /// Number of worklist scans.
    pub passes: usize,
}

/// A reference that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedAlias {
    /// Variable holding the reference.
    pub key: FlatKey,
    /// Mode holding the reference.
    pub mode: String,
    /// The reference text.
    pub target: String,
}

impl fmt::Display for UnresolvedAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) -> {}", self.key, self.mode, self.target)
    }
}

/// Internal resolution failures. Validation should have ruled these out.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    /// A variable reached resolution without a valid type.
    #[error("variable '{0}' has no valid type")]
    UntypedVariable(FlatKey),

    /// A literal that passed validation no longer parses.
    #[error("variable '{key}' mode '{mode}': {source}")]
    InvalidLiteral {
        /// Variable holding the literal.
        key: FlatKey,
        /// Mode holding the literal.
        mode: String,
        /// Parse failure.
        source: ValueError,
    },

    /// A scan finished without resolving anything.
    #[error(
        "{} alias(es) could not be resolved after {passes} pass(es): {}",
        unresolved.len(),
        format_unresolved(unresolved)
    )]
    Unresolved {
        /// Every reference still pending.
        unresolved: Vec<UnresolvedAlias>,
        /// Scans performed, including the one without progress.
        passes: usize,
    },
}

fn format_unresolved(unresolved: &[UnresolvedAlias]) -> String {
    unresolved
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

struct Pending {
    key: FlatKey,
    references: Vec<(String, String)>,
}

/// Resolves every value of a validated document.
///
/// A reference binds to a document variable once that variable is fully
/// resolved, including one resolved earlier in the same scan. A reference to
/// a key the document does not declare binds to the existing store variable.
///
/// # Errors
///
/// Returns [`ResolveError::Unresolved`] when a scan makes no progress, and
/// the other variants on inputs validation should have rejected.
pub fn resolve(flat: &FlatVariables, existing: &StoreIndex) -> Result<Resolution, ResolveError> {
    let mut resolution = Resolution::default();
    let mut complete: HashSet<FlatKey> = HashSet::new();
    let mut worklist = Vec::new();

    for (key, value) in &flat.entries {
        let var_type = value
            .declared_type()
            .ok_or_else(|| ResolveError::UntypedVariable(key.clone()))?;
        let mut resolved = ResolvedVariable {
            var_type,
            description: value.description.clone(),
            values: IndexMap::new(),
        };
        let mut references = Vec::new();

        for (mode, raw) in value.values.iter().flatten() {
            if let Some(reference) = raw.as_reference() {
                references.push((mode.clone(), reference.to_string()));
            } else {
                let literal =
                    ScalarValue::parse(var_type, raw).map_err(|source| ResolveError::InvalidLiteral {
                        key: key.clone(),
                        mode: mode.clone(),
                        source,
                    })?;
                resolved
                    .values
                    .insert(mode.clone(), ResolvedValue::Literal(literal));
            }
        }

        if references.is_empty() {
            complete.insert(key.clone());
        } else {
            worklist.push(Pending {
                key: key.clone(),
                references,
            });
        }
        resolution.variables.insert(key.clone(), resolved);
    }

    tracing::debug!(
        literals = complete.len(),
        pending = worklist.len(),
        "assigned literal values"
    );

    while !worklist.is_empty() {
        resolution.passes += 1;
        let mut progress = false;

        for pending in &mut worklist {
            let Some(variable) = resolution.variables.get_mut(&pending.key) else {
                continue;
            };
            pending.references.retain(|(mode, target)| {
                let bound = if flat.entries.contains_key(target.as_str()) {
                    complete
                        .get(target.as_str())
                        .map(|key| AliasTarget::Declared(key.clone()))
                } else {
                    existing
                        .variable(target)
                        .map(|id| AliasTarget::Existing(id.clone()))
                };
                match bound {
                    Some(target) => {
                        variable
                            .values
                            .insert(mode.clone(), ResolvedValue::Alias(target));
                        progress = true;
                        false
                    }
                    None => true,
                }
            });

            if pending.references.is_empty() {
                complete.insert(pending.key.clone());
                resolution.alias_order.push(pending.key.clone());
            }
        }

        worklist.retain(|pending| !pending.references.is_empty());
        tracing::debug!(
            pass = resolution.passes,
            remaining = worklist.len(),
            "alias resolution pass"
        );

        if !progress {
            let unresolved = worklist
                .iter()
                .flat_map(|pending| {
                    pending
                        .references
                        .iter()
                        .map(|(mode, target)| UnresolvedAlias {
                            key: pending.key.clone(),
                            mode: mode.clone(),
                            target: target.clone(),
                        })
                })
                .collect();
            return Err(ResolveError::Unresolved {
                unresolved,
                passes: resolution.passes,
            });
        }
    }

    // Keep each variable's modes in document order.
    for (key, variable) in &mut resolution.variables {
        if let Some(order) = flat.entries.get(key).and_then(|value| value.values.as_ref()) {
            variable
                .values
                .sort_by_cached_key(|mode, _| order.get_index_of(mode.as_str()));
        }
    }

    tracing::info!(
        variables = resolution.variables.len(),
        aliases = resolution.alias_order.len(),
        passes = resolution.passes,
        "resolved aliases"
    );
    Ok(resolution)
}
