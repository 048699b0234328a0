use lazy_static::lazy_static;

use super::{Check, FieldRule, Schema};
use crate::models::{Credentials, NewTask, TaskStatus, TaskUpdate};

lazy_static! {
    static ref CREATE_TASK_SCHEMA: Schema = Schema::new(vec![
        FieldRule::required("title")
            .check(Check::Required, "title is required")
            .check(Check::IsString, "title must be a string"),
        FieldRule::required("description")
            .check(Check::Required, "description is required")
            .check(Check::IsString, "description must be a string"),
        FieldRule::required("dueDate")
            .check(Check::Required, "dueDate is required")
            .check(Check::IsDate, "dueDate should be a valid date")
            .check(Check::FutureDate, "Due date must be in the future"),
        FieldRule::required("category")
            .check(Check::Required, "category is required")
            .check(Check::IsString, "category must be a string"),
        FieldRule::optional("assignedTo")
            .check(Check::IsString, "assignedTo must be a username or null"),
    ]);

    static ref UPDATE_TASK_SCHEMA: Schema = Schema::new(vec![
        FieldRule::optional("title")
            .check(Check::Required, "title cannot be empty")
            .check(Check::IsString, "title must be a string"),
        FieldRule::optional("description")
            .check(Check::Required, "description cannot be empty")
            .check(Check::IsString, "description must be a string"),
        FieldRule::optional("dueDate")
            .check(Check::IsDate, "dueDate should be a valid date")
            .check(Check::FutureDate, "Due date must be in the future"),
        FieldRule::optional("category")
            .check(Check::Required, "category cannot be empty")
            .check(Check::IsString, "category must be a string"),
        FieldRule::optional("assignedTo")
            .check(Check::IsString, "assignedTo must be a username or null"),
        FieldRule::optional("status").check(
            Check::OneOf(TaskStatus::NAMES),
            "Status should be either \"Pending\" or \"Completed\""
        ),
    ]);

    // Signup and signin share one rule set.
    static ref CREDENTIALS_SCHEMA: Schema = Schema::new(vec![
        FieldRule::required("username")
            .check(Check::Required, "Username is required")
            .check(Check::IsString, "Username must be a string")
            .check(Check::MinLength(5), "Username must be at least 5 characters long"),
        FieldRule::required("password")
            .check(Check::Required, "Password is required")
            .check(Check::IsString, "Password must be a string")
            .check(Check::MinLength(6), "Password must be at least 6 characters long"),
    ]);
}

/// Request bodies that carry their own validation rules.
pub trait HasSchema {
    fn schema() -> &'static Schema;
}

impl HasSchema for NewTask {
    fn schema() -> &'static Schema {
        &CREATE_TASK_SCHEMA
    }
}

impl HasSchema for TaskUpdate {
    fn schema() -> &'static Schema {
        &UPDATE_TASK_SCHEMA
    }
}

impl HasSchema for Credentials {
    fn schema() -> &'static Schema {
        &CREDENTIALS_SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, 15).unwrap()
    }

    fn paths(schema: &Schema, body: Value) -> Vec<(String, String)> {
        schema
            .evaluate(&body, today())
            .into_iter()
            .map(|e| (e.path, e.msg))
            .collect()
    }

    #[test]
    fn test_valid_create_body() {
        let body = json!({
            "title": "Task Title",
            "description": "Task Description",
            "dueDate": "2030-12-31",
            "category": "Test",
            "assignedTo": null
        });
        assert!(NewTask::schema().evaluate(&body, today()).is_empty());
    }

    #[test]
    fn test_empty_create_body_reports_every_field() {
        let errors = paths(NewTask::schema(), json!({}));
        let fields: Vec<&str> = errors.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(
            fields,
            vec!["title", "description", "dueDate", "dueDate", "category"]
        );
    }

    #[test]
    fn test_past_due_date_on_create() {
        let body = json!({
            "title": "Task Title",
            "description": "Task Description",
            "dueDate": "2020-12-31",
            "category": "Test"
        });
        assert_eq!(
            paths(NewTask::schema(), body),
            vec![("dueDate".to_string(), "Due date must be in the future".to_string())]
        );
    }

    #[test]
    fn test_update_rules() {
        assert!(TaskUpdate::schema().evaluate(&json!({}), today()).is_empty());
        assert!(TaskUpdate::schema()
            .evaluate(&json!({ "title": "X", "status": "Completed" }), today())
            .is_empty());

        let errors = paths(
            TaskUpdate::schema(),
            json!({ "status": "Done", "dueDate": "2030-06-15", "title": "" }),
        );
        assert_eq!(
            errors,
            vec![
                ("title".to_string(), "title cannot be empty".to_string()),
                ("dueDate".to_string(), "Due date must be in the future".to_string()),
                (
                    "status".to_string(),
                    "Status should be either \"Pending\" or \"Completed\"".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_credentials_rules() {
        assert!(Credentials::schema()
            .evaluate(&json!({ "username": "alice", "password": "secret" }), today())
            .is_empty());

        let errors = paths(
            Credentials::schema(),
            json!({ "username": "bob", "password": "" }),
        );
        assert_eq!(
            errors,
            vec![
                (
                    "username".to_string(),
                    "Username must be at least 5 characters long".to_string()
                ),
                ("password".to_string(), "Password is required".to_string()),
                (
                    "password".to_string(),
                    "Password must be at least 6 characters long".to_string()
                ),
            ]
        );
    }
}
