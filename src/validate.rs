//! Declarative per-field validation rule tables, evaluated against the
//! JSON request body before any handler logic runs.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required,
    MinLen(usize),
    MaxLen(usize),
    /// Array whose elements are all strings
    StringArray,
    NonEmptyArray,
    Url,
}

#[derive(Debug)]
pub struct FieldRule {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

pub static CREDENTIALS: &[FieldRule] = &[
    FieldRule { field: "username", rules: &[Rule::Required, Rule::MinLen(3)] },
    FieldRule { field: "password", rules: &[Rule::Required, Rule::MinLen(8)] },
];

pub static POST_INPUT: &[FieldRule] = &[
    FieldRule { field: "title", rules: &[Rule::Required] },
    FieldRule { field: "body", rules: &[Rule::Required] },
    FieldRule { field: "tags", rules: &[Rule::StringArray, Rule::NonEmptyArray] },
];

pub static COMMENT_INPUT: &[FieldRule] =
    &[FieldRule { field: "message", rules: &[Rule::Required, Rule::MaxLen(1000)] }];

pub static BIO_INPUT: &[FieldRule] =
    &[FieldRule { field: "bio", rules: &[Rule::Required, Rule::MaxLen(200)] }];

pub static AVATAR_INPUT: &[FieldRule] =
    &[FieldRule { field: "avatar", rules: &[Rule::Required, Rule::Url] }];

/// Field-level failures from evaluating a rule table
#[derive(Debug)]
pub struct ValidationFailure {
    pub field_errors: HashMap<String, String>,
}

impl ValidationFailure {
    /// 400 outcome, used on the credential routes
    pub fn into_bad_request(self) -> ApiError {
        ApiError::validation_error("Validation failed", Some(self.field_errors))
    }

    /// 422 outcome, used on the content routes
    pub fn into_unprocessable(self) -> ApiError {
        ApiError::unprocessable_entity("Validation failed", self.field_errors)
    }
}

/// Evaluate a rule table against a JSON body. First failing rule per
/// field wins.
pub fn check(rules: &[FieldRule], body: &Value) -> Result<(), ValidationFailure> {
    let mut field_errors = HashMap::new();

    for field_rule in rules {
        let value = body.get(field_rule.field);
        if let Some(message) = check_field(field_rule, value) {
            field_errors.insert(field_rule.field.to_string(), message);
        }
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure { field_errors })
    }
}

fn check_field(field_rule: &FieldRule, value: Option<&Value>) -> Option<String> {
    // Absence fails every rule set; all tables treat their fields as required
    let value = match value {
        Some(v) if !v.is_null() => v,
        _ => return Some(format!("{} is required", field_rule.field)),
    };

    for rule in field_rule.rules {
        match rule {
            Rule::Required => {
                let empty = value.as_str().map(|s| s.trim().is_empty()).unwrap_or(false);
                if empty {
                    return Some(format!("{} is required", field_rule.field));
                }
            }
            Rule::MinLen(min) => match value.as_str() {
                Some(s) if s.trim().chars().count() >= *min => {}
                Some(_) => {
                    return Some(format!(
                        "{} must be at least {} characters",
                        field_rule.field, min
                    ))
                }
                None => return Some(format!("{} must be a string", field_rule.field)),
            },
            Rule::MaxLen(max) => match value.as_str() {
                Some(s) if s.chars().count() <= *max => {}
                Some(_) => {
                    return Some(format!(
                        "{} must be at most {} characters",
                        field_rule.field, max
                    ))
                }
                None => return Some(format!("{} must be a string", field_rule.field)),
            },
            Rule::StringArray => match value.as_array() {
                Some(items) if items.iter().all(Value::is_string) => {}
                Some(_) => {
                    return Some(format!("each {} entry must be a string", field_rule.field))
                }
                None => return Some(format!("{} must be an array", field_rule.field)),
            },
            Rule::NonEmptyArray => match value.as_array() {
                Some(items) if !items.is_empty() => {}
                Some(_) => return Some(format!("{} cannot be empty", field_rule.field)),
                None => return Some(format!("{} must be an array", field_rule.field)),
            },
            Rule::Url => match value.as_str() {
                Some(s) if url::Url::parse(s).is_ok() => {}
                _ => return Some(format!("{} must be a valid URL", field_rule.field)),
            },
        }
    }

    None
}
