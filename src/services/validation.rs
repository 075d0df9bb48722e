use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Violations keyed by dotted camelCase field path, e.g. `agentProfile.licenseStates`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Keeps the first message recorded for a field.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` with every path nested under `prefix`.
    pub fn extend_prefixed(&mut self, prefix: &str, other: FieldErrors) {
        for (field, message) in other.0 {
            self.insert(format!("{}.{}", prefix, field), message);
        }
    }

    /// `Ok(())` when empty, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        f.write_str(&parts.join("; "))
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        collect(errors, None, &mut out);
        out
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        FieldErrors::from(&errors)
    }
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, camel_case(field)),
            None => camel_case(field),
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(first) = field_errors.first() {
                    out.insert(path, message(first));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, Some(&format!("{}.{}", path, index)), out);
                }
            }
        }
    }
}

fn message(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("Invalid value ({})", error.code),
    }
}

/// `license_states` -> `licenseStates`; already camelCase names pass through.
fn camel_case(field: &str) -> String {
    if field.starts_with('_') {
        return field.to_string();
    }
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
