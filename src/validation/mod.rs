//! Declarative request validation.
//!
//! A [`Schema`] is an ordered list of [`FieldRule`]s, and each rule is an ordered list
//! of `(Check, message)` pairs for one body field. Evaluating a schema runs every check
//! of every field and returns all violations together, so a client sees each problem
//! with its request in a single response.
//!
//! The per-endpoint schemas live in [`rules`]; the [`Validated`] extractor applies them
//! to a JSON body before a handler runs.

pub mod extractor;
pub mod rules;

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::task::parse_due_date;

pub use extractor::Validated;
pub use rules::HasSchema;

/// One violated rule, shaped the way clients of this API already consume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: String,
    /// The offending value. Omitted when the field was not sent at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: String,
    pub path: String,
    pub location: String,
}

impl FieldError {
    pub fn new(path: &str, msg: &str, value: Option<Value>) -> Self {
        Self {
            kind: "field".to_string(),
            value,
            msg: msg.to_string(),
            path: path.to_string(),
            location: "body".to_string(),
        }
    }
}

/// A single predicate over a (possibly absent) JSON field.
///
/// Presence-style checks (`Required`, `MinLength`, `IsDate`, `OneOf`) fail on an
/// absent or null field. Shape checks (`IsString`, `FutureDate`) leave absence and
/// unparseable input to the other checks of the same field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    /// Present, not null, and not an empty string.
    Required,
    /// A string whenever present and non-null.
    IsString,
    /// At least this many characters.
    MinLength(u64),
    /// A calendar date in `YYYY-MM-DD` or `YYYY/MM/DD` form.
    IsDate,
    /// A parseable date strictly after the evaluation day.
    FutureDate,
    /// One of the listed strings, exactly.
    OneOf(&'static [&'static str]),
}

fn as_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

impl Check {
    /// Whether `value` satisfies this check, with "today" taken as `today`.
    pub fn passes(&self, value: Option<&Value>, today: NaiveDate) -> bool {
        match self {
            Check::Required => !as_text(value).is_empty(),
            Check::IsString => matches!(value, None | Some(Value::Null) | Some(Value::String(_))),
            Check::MinLength(min) => {
                validator::validate_length(&*as_text(value), Some(*min), None, None)
            }
            Check::IsDate => match value {
                Some(Value::String(s)) => parse_due_date(s).is_some(),
                _ => false,
            },
            Check::FutureDate => match value {
                Some(Value::String(s)) => parse_due_date(s).map_or(true, |due| due > today),
                _ => true,
            },
            Check::OneOf(allowed) => match value {
                Some(Value::String(s)) => allowed.contains(&s.as_str()),
                _ => false,
            },
        }
    }
}

/// The ordered checks for one body field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: &'static str,
    /// Optional fields are skipped entirely when absent from the body.
    pub optional: bool,
    pub checks: Vec<(Check, &'static str)>,
}

impl FieldRule {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            optional: false,
            checks: Vec::new(),
        }
    }

    pub fn optional(field: &'static str) -> Self {
        Self {
            field,
            optional: true,
            checks: Vec::new(),
        }
    }

    pub fn check(mut self, check: Check, message: &'static str) -> Self {
        self.checks.push((check, message));
        self
    }
}

/// The full rule set for one endpoint's body.
#[derive(Debug, Clone)]
pub struct Schema {
    rules: Vec<FieldRule>,
}

impl Schema {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// Runs every rule against `body` and collects all violations in rule order.
    pub fn evaluate(&self, body: &Value, today: NaiveDate) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for rule in &self.rules {
            let value = body.get(rule.field);
            if rule.optional && value.is_none() {
                continue;
            }
            for (check, message) in &rule.checks {
                if !check.passes(value, today) {
                    errors.push(FieldError::new(rule.field, message, value.cloned()));
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, 15).unwrap()
    }

    #[test]
    fn test_required() {
        let check = Check::Required;
        assert!(check.passes(Some(&json!("x")), today()));
        assert!(check.passes(Some(&json!(5)), today()));
        assert!(!check.passes(Some(&json!("")), today()));
        assert!(!check.passes(Some(&Value::Null), today()));
        assert!(!check.passes(None, today()));
    }

    #[test]
    fn test_min_length_counts_characters() {
        let check = Check::MinLength(5);
        assert!(check.passes(Some(&json!("héllo")), today()));
        assert!(!check.passes(Some(&json!("héll")), today()));
        assert!(!check.passes(None, today()));
    }

    #[test]
    fn test_future_date_is_strict_and_calendar_based() {
        let check = Check::FutureDate;
        assert!(check.passes(Some(&json!("2030-06-16")), today()));
        assert!(!check.passes(Some(&json!("2030-06-15")), today()));
        assert!(!check.passes(Some(&json!("2030/06/14")), today()));
        // Unparseable dates are reported by `IsDate` only.
        assert!(check.passes(Some(&json!("soon")), today()));
        assert!(check.passes(None, today()));
    }

    #[test]
    fn test_one_of() {
        let check = Check::OneOf(&["Pending", "Completed"]);
        assert!(check.passes(Some(&json!("Completed")), today()));
        assert!(!check.passes(Some(&json!("completed")), today()));
        assert!(!check.passes(Some(&json!(1)), today()));
    }

    #[test]
    fn test_schema_collects_every_violation_in_order() {
        let schema = Schema::new(vec![
            FieldRule::required("title").check(Check::Required, "title is required"),
            FieldRule::required("dueDate")
                .check(Check::Required, "dueDate is required")
                .check(Check::IsDate, "dueDate should be a valid date"),
            FieldRule::optional("status").check(Check::OneOf(&["Pending"]), "bad status"),
        ]);

        let errors = schema.evaluate(&json!({ "status": "Nope" }), today());
        let messages: Vec<&str> = errors.iter().map(|e| e.msg.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "title is required",
                "dueDate is required",
                "dueDate should be a valid date",
                "bad status"
            ]
        );
        assert_eq!(errors[3].value, Some(json!("Nope")));
        assert_eq!(errors[0].value, None);
        assert_eq!(errors[0].location, "body");
    }

    #[test]
    fn test_optional_fields_are_skipped_when_absent() {
        let schema = Schema::new(vec![FieldRule::optional("dueDate")
            .check(Check::IsDate, "dueDate should be a valid date")]);
        assert!(schema.evaluate(&json!({}), today()).is_empty());
        assert_eq!(schema.evaluate(&json!({ "dueDate": null }), today()).len(), 1);
    }
}
