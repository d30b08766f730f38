//! Typed variable values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{ColorError, ColorFormat, Rgba};
use crate::document::{RawValue, VariableType};

/// Reasons a raw literal cannot be read as its declared type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The JSON kind cannot hold the declared type at all.
    #[error("expected a {expected} value, found a {found}")]
    KindMismatch {
        /// Declared type.
        expected: VariableType,
        /// JSON kind that was found.
        found: &'static str,
    },

    /// A numeric string that does not parse to a finite number.
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    /// A string that is neither `true` nor `false`.
    #[error("'{0}' is not a valid boolean")]
    InvalidBoolean(String),

    /// Null, arrays and objects are never valid values.
    #[error("a {0} is not a supported value")]
    Unsupported(&'static str),

    /// A color literal that does not parse.
    #[error(transparent)]
    Color(#[from] ColorError),
}

/// A literal after it has been checked against its declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ScalarValue {
    /// Boolean flag.
    Boolean(bool),
    /// Finite number.
    Number(f64),
    /// Free text.
    String(String),
    /// Parsed color.
    Color(Rgba),
}

impl ScalarValue {
    /// Reads a raw literal as the given type.
    ///
    /// Numbers accept JSON numbers and numeric strings. Booleans accept JSON
    /// booleans and the exact strings `"true"` and `"false"`. Colors must be
    /// strings in one of the supported color grammars. References are not
    /// handled here; callers check [`RawValue::as_reference`] first.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] describing why the literal does not fit.
    pub fn parse(var_type: VariableType, raw: &RawValue) -> Result<Self, ValueError> {
        match (var_type, raw) {
            (_, RawValue::Unsupported(_)) => Err(ValueError::Unsupported(raw.kind_name())),
            (VariableType::Boolean, RawValue::Boolean(value)) => Ok(Self::Boolean(*value)),
            (VariableType::Boolean, RawValue::String(text)) => match text.as_str() {
                "true" => Ok(Self::Boolean(true)),
                "false" => Ok(Self::Boolean(false)),
                _ => Err(ValueError::InvalidBoolean(text.clone())),
            },
            (VariableType::Number, RawValue::Number(number)) => number
                .as_f64()
                .filter(|value| value.is_finite())
                .map(Self::Number)
                .ok_or_else(|| ValueError::InvalidNumber(number.to_string())),
            (VariableType::Number, RawValue::String(text)) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Self::Number)
                .ok_or_else(|| ValueError::InvalidNumber(text.clone())),
            (VariableType::String, RawValue::String(text)) => Ok(Self::String(text.clone())),
            (VariableType::Color, RawValue::String(text)) => Ok(Self::Color(Rgba::parse(text)?)),
            (expected, raw) => Err(ValueError::KindMismatch {
                expected,
                found: raw.kind_name(),
            }),
        }
    }

    /// The type this value belongs to.
    #[must_use]
    pub const fn variable_type(&self) -> VariableType {
        match self {
            Self::Boolean(_) => VariableType::Boolean,
            Self::Number(_) => VariableType::Number,
            Self::String(_) => VariableType::String,
            Self::Color(_) => VariableType::Color,
        }
    }

    /// Converts back to a document literal, encoding colors in `format`.
    #[must_use]
    pub fn to_raw(&self, format: ColorFormat) -> RawValue {
        match self {
            Self::Boolean(value) => RawValue::Boolean(*value),
            Self::Number(value) => RawValue::number(*value),
            Self::String(value) => RawValue::String(value.clone()),
            Self::Color(color) => RawValue::String(color.encode(format)),
        }
    }
}
