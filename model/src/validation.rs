//! Field-level validation of boundary input.
//!
//! Inputs arrive with every field optional; [`Validate::validate`] turns them
//! into the record they describe or reports every failing field at once.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Field name → message for every field that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Record an error unless `value` holds non-whitespace text.
    pub fn require_text(
        &mut self,
        field: &str,
        value: Option<String>,
        message: &str,
    ) -> Option<String> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.add(field, message);
                None
            }
        }
    }

    /// Record an error if `value` is absent.
    pub fn require<T>(&mut self, field: &str, value: Option<T>, message: &str) -> Option<T> {
        if value.is_none() {
            self.add(field, message);
        }
        value
    }

    /// `Ok(value)` when no error was recorded, otherwise the collected errors.
    pub fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, FieldErrors> {
        if !self.is_empty() {
            return Err(self);
        }
        match value() {
            Some(v) => Ok(v),
            None => Err(self),
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Conversion of a raw input into its validated form.
pub trait Validate {
    type Valid;

    fn validate(self) -> Result<Self::Valid, FieldErrors>;
}
