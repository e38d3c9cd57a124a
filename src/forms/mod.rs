//! Request bodies accepted by the API and their conversion into typed payloads.
//!
//! Each form derives [`validator::Validate`] for shape checks and converts into
//! a payload with `TryFrom`, which is where value objects get constructed.

use std::collections::BTreeMap;

use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::domain::types::TypeConstraintError;

pub mod address;
pub mod address_lookup;
pub mod category;
pub mod client;
pub mod contact;
pub mod fiscal_year;
pub mod invitation;
pub mod member;
pub mod organization;
pub mod product;
pub mod supplier;
pub mod tag;

/// Field name mapped to every message reported for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid {field}: {source}")]
    Field {
        field: &'static str,
        source: TypeConstraintError,
    },

    #[error("{field}: {message}")]
    Rule {
        field: &'static str,
        message: String,
    },
}

impl FormError {
    /// Adapter for `map_err` that attaches the failing field name.
    pub fn field(field: &'static str) -> impl FnOnce(TypeConstraintError) -> FormError {
        move |source| FormError::Field { field, source }
    }

    pub fn rule(field: &'static str, message: impl Into<String>) -> Self {
        FormError::Rule {
            field,
            message: message.into(),
        }
    }

    /// Flattens the error into the `validationErrors` map of the response.
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match self {
            FormError::Validation(validation) => collect_validation(validation, "", &mut errors),
            FormError::Field { field, source } => {
                errors
                    .entry((*field).to_string())
                    .or_default()
                    .push(source.to_string());
            }
            FormError::Rule { field, message } => {
                errors
                    .entry((*field).to_string())
                    .or_default()
                    .push(message.clone());
            }
        }
        errors
    }
}

fn collect_validation(validation: &ValidationErrors, prefix: &str, into: &mut FieldErrors) {
    for (field, kind) in validation.errors() {
        let field = camel_case(field);
        let name = if prefix.is_empty() {
            field
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errors) => {
                let messages = into.entry(name).or_default();
                for error in errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    messages.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_validation(nested, &name, into),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_validation(nested, &format!("{name}[{index}]"), into);
                }
            }
        }
    }
}

/// Validator reports Rust field names; request bodies are camelCase.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Treats blank strings as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    struct SignupForm {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn validation_errors_are_keyed_by_field() {
        let form = SignupForm {
            name: String::new(),
            email: "nope".to_string(),
        };
        let err = FormError::from(form.validate().unwrap_err());
        let errors = err.field_errors();

        assert_eq!(errors["name"], vec!["name is required".to_string()]);
        assert_eq!(errors["email"], vec!["email".to_string()]);
    }

    #[test]
    fn constraint_errors_name_their_field() {
        let err = FormError::field("slug")(TypeConstraintError::InvalidSlug);
        assert_eq!(
            err.field_errors().get("slug"),
            Some(&vec!["invalid slug".to_string()])
        );
    }

    #[test]
    fn snake_case_fields_are_reported_in_camel_case() {
        assert_eq!(camel_case("vat_rate_bps"), "vatRateBps");
        assert_eq!(camel_case("line1"), "line1");
    }

    #[test]
    fn blank_values_become_none() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" a ".into())), Some("a".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
