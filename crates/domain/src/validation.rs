//! Validation report types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::ColorError;
use crate::document::RawValue;
use crate::reference::FlatKey;
use crate::value::ValueError;

/// Machine-readable code attached to every validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorCode {
    /// Collection name is not a string.
    CollectionNameString,
    /// Collection modes are not a non-empty list of unique strings.
    CollectionModesArray,
    /// Collection description is present but not a string.
    CollectionDescriptionString,
    /// Collection name is empty or already used in the document.
    InvalidCollectionName,
    /// A variable lacks a value for a declared mode, or has one for an
    /// undeclared mode.
    InvalidMissingModes,
    /// Variable type is unknown, or the value's JSON kind does not fit it.
    InvalidValueType,
    /// Color literal matches no supported grammar.
    InvalidColorFormat,
    /// `rgb(...)` literal out of range.
    InvalidRgbValue,
    /// `rgba(...)` literal out of range.
    InvalidRgbaValue,
    /// `hsl(...)` literal out of range.
    InvalidHslValue,
    /// `hsla(...)` literal out of range.
    InvalidHslaValue,
    /// Number literal does not parse.
    InvalidNumberValue,
    /// Boolean literal is not `true` or `false`.
    InvalidBooleanValue,
    /// Value is null, an array or an object, or a reference points at a
    /// variable of a different type.
    TypeMismatch,
    /// A variable has no `values` object.
    MissingVariableValues,
    /// Reference target does not exist and no fallback applies.
    MissingVariableAlias,
    /// Two variables flatten to the same key.
    DuplicateVariableKey,
    /// The store refused to add another mode to a collection.
    UnableToAddMode,
}

impl ValidationErrorCode {
    /// The wire name, e.g. `INVALID_HEX_VALUE`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CollectionNameString => "COLLECTION_NAME_STRING",
            Self::CollectionModesArray => "COLLECTION_MODES_ARRAY",
            Self::CollectionDescriptionString => "COLLECTION_DESCRIPTION_STRING",
            Self::InvalidCollectionName => "INVALID_COLLECTION_NAME",
            Self::InvalidMissingModes => "INVALID_MISSING_MODES",
            Self::InvalidValueType => "INVALID_VALUE_TYPE",
            Self::InvalidColorFormat => "INVALID_COLOR_FORMAT",
            Self::InvalidRgbValue => "INVALID_RGB_VALUE",
            Self::InvalidRgbaValue => "INVALID_RGBA_VALUE",
            Self::InvalidHslValue => "INVALID_HSL_VALUE",
            Self::InvalidHslaValue => "INVALID_HSLA_VALUE",
            Self::InvalidNumberValue => "INVALID_NUMBER_VALUE",
            Self::InvalidBooleanValue => "INVALID_BOOLEAN_VALUE",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::MissingVariableValues => "MISSING_VARIABLE_VALUES",
            Self::MissingVariableAlias => "MISSING_VARIABLE_ALIAS",
            Self::DuplicateVariableKey => "DUPLICATE_VARIABLE_KEY",
            Self::UnableToAddMode => "UNABLE_TO_ADD_MODE",
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&ColorError> for ValidationErrorCode {
    fn from(error: &ColorError) -> Self {
        match error {
            ColorError::UnknownFormat(_) => Self::InvalidColorFormat,
            ColorError::InvalidRgb(_) => Self::InvalidRgbValue,
            ColorError::InvalidRgba(_) => Self::InvalidRgbaValue,
            ColorError::InvalidHsl(_) => Self::InvalidHslValue,
            ColorError::InvalidHsla(_) => Self::InvalidHslaValue,
        }
    }
}

impl From<&ValueError> for ValidationErrorCode {
    fn from(error: &ValueError) -> Self {
        match error {
            ValueError::KindMismatch { .. } => Self::InvalidValueType,
            ValueError::InvalidNumber(_) => Self::InvalidNumberValue,
            ValueError::InvalidBoolean(_) => Self::InvalidBooleanValue,
            ValueError::Unsupported(_) => Self::TypeMismatch,
            ValueError::Color(color) => color.into(),
        }
    }
}

/// One problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Flat key of the variable, or empty for collection-level problems.
    pub variable_name: String,
    /// Human-readable description.
    pub message: String,
    /// Machine-readable code.
    pub error_code: ValidationErrorCode,
}

impl ValidationError {
    /// Creates an error attached to a variable.
    pub fn new(
        variable_name: impl Into<String>,
        message: impl Into<String>,
        error_code: ValidationErrorCode,
    ) -> Self {
        Self {
            variable_name: variable_name.into(),
            message: message.into(),
            error_code,
        }
    }

    /// Creates a collection-level error with no variable name.
    pub fn collection(message: impl Into<String>, error_code: ValidationErrorCode) -> Self {
        Self::new(String::new(), message, error_code)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variable_name.is_empty() {
            write!(f, "[{}] {}", self.error_code, self.message)
        } else {
            write!(
                f,
                "[{}] {}: {}",
                self.error_code, self.variable_name, self.message
            )
        }
    }
}

/// A reference that could not be resolved and was replaced by a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackSubstitution {
    /// Variable whose value was replaced.
    pub key: FlatKey,
    /// Mode whose value was replaced.
    pub mode: String,
    /// The reference that did not resolve.
    pub reference: String,
    /// The literal used instead.
    pub fallback: RawValue,
}

impl fmt::Display for FallbackSubstitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): '{}' not found, using {}",
            self.key, self.mode, self.reference, self.fallback
        )
    }
}
