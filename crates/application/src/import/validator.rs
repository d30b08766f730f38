//! Document validation.
//!
//! Collects every structural, type and format problem in one pass. Import is
//! gated on an empty error list.

use std::collections::HashSet;

use varsync_domain::{
    Collection, FallbackSubstitution, FlatKey, Lenient, RawValue, Rgba, ScalarValue, Settings,
    StoreIndex, ValidationError, ValidationErrorCode, VariableType, VariableValue,
};

use super::flatten::FlatVariables;

/// Everything the validator found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Problems in document order.
    pub errors: Vec<ValidationError>,
    /// References replaced by fallbacks.
    pub substitutions: Vec<FallbackSubstitution>,
}

impl ValidationReport {
    /// Returns true if no errors were found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates a flattened document against settings and the existing store.
pub struct Validator<'a> {
    settings: &'a Settings,
    existing: &'a StoreIndex,
}

impl<'a> Validator<'a> {
    /// Creates a validator.
    #[must_use]
    pub const fn new(settings: &'a Settings, existing: &'a StoreIndex) -> Self {
        Self { settings, existing }
    }

    /// Validates every collection and variable.
    ///
    /// Unresolvable references are replaced by their fallback inside `flat`
    /// when `failOnNullAlias` is off; the document itself is left untouched.
    pub fn validate(
        &self,
        collections: &[Collection],
        flat: &mut FlatVariables,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();
        let mut seen = HashSet::new();

        for collection in collections {
            let first_declaration = check_collection(collection, &mut seen, &mut report);
            if !first_declaration {
                continue;
            }
            let name = collection.display_name();
            let Some(members) = flat.members.get(name.as_ref()) else {
                continue;
            };
            for key in members {
                if let Some(value) = flat.entries.get(key) {
                    self.check_variable(key, value, flat, &mut report);
                }
            }
        }

        for substitution in &report.substitutions {
            if let Some(values) = flat
                .entries
                .get_mut(&substitution.key)
                .and_then(|value| value.values.as_mut())
            {
                values.insert(substitution.mode.clone(), substitution.fallback.clone());
            }
        }

        tracing::info!(
            errors = report.errors.len(),
            substitutions = report.substitutions.len(),
            "validated document"
        );
        report
    }

    fn check_variable(
        &self,
        key: &FlatKey,
        value: &VariableValue,
        flat: &FlatVariables,
        report: &mut ValidationReport,
    ) {
        let Some(values) = &value.values else {
            report.errors.push(ValidationError::new(
                key.as_str(),
                "Variable has no values",
                ValidationErrorCode::MissingVariableValues,
            ));
            return;
        };

        // Modes without a value are allowed; undeclared modes are not.
        let modes = flat.modes_of(key);
        for mode in values.keys() {
            if !modes.contains(mode) {
                report.errors.push(ValidationError::new(
                    key.as_str(),
                    format!("Mode '{mode}' is not declared by collection '{}'", key.collection()),
                    ValidationErrorCode::InvalidMissingModes,
                ));
            }
        }

        let var_type = match &value.var_type {
            Lenient::Valid(var_type) => *var_type,
            Lenient::Invalid(raw) => {
                report.errors.push(ValidationError::new(
                    key.as_str(),
                    format!("Unknown variable type {raw}"),
                    ValidationErrorCode::InvalidValueType,
                ));
                return;
            }
        };

        // An extended collection keeps its variables, so the store type must match.
        if self.settings.extend_existing_collections
            && let Some(store_type) = self.existing.variable_type(key.as_str())
            && store_type != var_type
        {
            report.errors.push(ValidationError::new(
                key.as_str(),
                format!("Variable already exists as a {store_type}, declared as a {var_type}"),
                ValidationErrorCode::TypeMismatch,
            ));
            return;
        }

        for (mode, raw) in values {
            if let Some(reference) = raw.as_reference() {
                self.check_reference(key, mode, var_type, reference, flat, report);
            } else if let Err(error) = ScalarValue::parse(var_type, raw) {
                report.errors.push(ValidationError::new(
                    key.as_str(),
                    format!("Mode '{mode}': {error}"),
                    (&error).into(),
                ));
            }
        }
    }

    fn check_reference(
        &self,
        key: &FlatKey,
        mode: &str,
        var_type: VariableType,
        reference: &str,
        flat: &FlatVariables,
        report: &mut ValidationReport,
    ) {
        // Declared keys shadow store variables with the same key.
        let target_type = match flat.entries.get(reference) {
            Some(target) => Some(target.declared_type()),
            None => self.existing.variable_type(reference).map(Some),
        };

        match target_type {
            Some(Some(target_type)) if target_type != var_type => {
                report.errors.push(ValidationError::new(
                    key.as_str(),
                    format!(
                        "Mode '{mode}': alias '{reference}' is a {target_type}, expected a {var_type}"
                    ),
                    ValidationErrorCode::TypeMismatch,
                ));
            }
            Some(_) => {}
            None if self.settings.fail_on_null_alias => {
                report.errors.push(ValidationError::new(
                    key.as_str(),
                    format!("Mode '{mode}': alias '{reference}' does not exist"),
                    ValidationErrorCode::MissingVariableAlias,
                ));
            }
            None => self.substitute(key, mode, var_type, reference, report),
        }
    }

    fn substitute(
        &self,
        key: &FlatKey,
        mode: &str,
        var_type: VariableType,
        reference: &str,
        report: &mut ValidationReport,
    ) {
        let fallback = self.settings.fallback_for(var_type);
        if var_type == VariableType::Color
            && let RawValue::String(color) = &fallback
            && let Err(error) = Rgba::parse(color)
        {
            report.errors.push(ValidationError::new(
                key.as_str(),
                format!("Mode '{mode}': fallback color is invalid: {error}"),
                (&error).into(),
            ));
            return;
        }

        tracing::warn!(
            key = %key,
            mode,
            reference,
            fallback = %fallback,
            "alias not found, substituting fallback"
        );
        report.substitutions.push(FallbackSubstitution {
            key: key.clone(),
            mode: mode.to_string(),
            reference: reference.to_string(),
            fallback,
        });
    }
}

/// Returns false if the collection name was already declared.
fn check_collection(
    collection: &Collection,
    seen: &mut HashSet<String>,
    report: &mut ValidationReport,
) -> bool {
    let display = collection.display_name();
    let mut first_declaration = true;

    match &collection.name {
        Lenient::Valid(name) if name.trim().is_empty() => {
            report.errors.push(ValidationError::collection(
                "Collection name must not be empty",
                ValidationErrorCode::InvalidCollectionName,
            ));
        }
        Lenient::Valid(name) => {
            if !seen.insert(name.clone()) {
                first_declaration = false;
                report.errors.push(ValidationError::new(
                    name.as_str(),
                    format!("Collection '{name}' is declared more than once"),
                    ValidationErrorCode::InvalidCollectionName,
                ));
            }
        }
        Lenient::Invalid(raw) => {
            report.errors.push(ValidationError::collection(
                format!("Collection name must be a string, found {raw}"),
                ValidationErrorCode::CollectionNameString,
            ));
        }
    }

    if let Some(Lenient::Invalid(raw)) = &collection.description {
        report.errors.push(ValidationError::new(
            display.as_ref(),
            format!("Collection description must be a string, found {raw}"),
            ValidationErrorCode::CollectionDescriptionString,
        ));
    }

    match &collection.modes {
        Lenient::Invalid(raw) => {
            report.errors.push(ValidationError::new(
                display.as_ref(),
                format!("Collection modes must be an array of strings, found {raw}"),
                ValidationErrorCode::CollectionModesArray,
            ));
        }
        Lenient::Valid(modes) if modes.is_empty() => {
            report.errors.push(ValidationError::new(
                display.as_ref(),
                "Collection must declare at least one mode",
                ValidationErrorCode::CollectionModesArray,
            ));
        }
        Lenient::Valid(modes) => {
            let mut unique = HashSet::new();
            for mode in modes {
                if !unique.insert(mode.as_str()) {
                    report.errors.push(ValidationError::new(
                        display.as_ref(),
                        format!("Mode '{mode}' is declared more than once"),
                        ValidationErrorCode::CollectionModesArray,
                    ));
                }
            }
        }
    }

    first_declaration
}
