use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

lazy_static! {
    // Calendar dates only, with a single consistent delimiter.
    static ref DUE_DATE_REGEX: Regex =
        Regex::new(r"^(\d{4}-\d{2}-\d{2}|\d{4}/\d{2}/\d{2})$").expect("valid due date regex");
}

/// Parses a due date written as `YYYY-MM-DD` or `YYYY/MM/DD`.
///
/// Returns `None` for anything else, including well-shaped strings that are not real
/// calendar days such as `2025-02-30`.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    if !DUE_DATE_REGEX.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(&raw.replace('/', "-"), "%Y-%m-%d").ok()
}

/// Represents the status of a task.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task is not done yet. Every task starts here.
    #[default]
    Pending,
    /// Task is done.
    Completed,
}

impl TaskStatus {
    /// The wire names accepted for `status`.
    pub const NAMES: &'static [&'static str] = &["Pending", "Completed"];
}

/// Represents a task entity as held by the store and returned by the API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Calendar day the task is due, serialized as `YYYY-MM-DD`.
    pub due_date: NaiveDate,
    /// Timestamp of when the task was created.
    pub creation_date: DateTime<Utc>,
    /// Username of the assignee, if any. A lookup key, not an owning reference.
    pub assigned_to: Option<String>,
    pub category: String,
    pub status: TaskStatus,
}

/// Body of a create request, deserialized after the create rules have passed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "deserialize_due_date")]
    pub due_date: NaiveDate,
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_assignee")]
    pub assigned_to: Option<String>,
}

/// Body of an update request. `None` means "field not sent"; sent fields overwrite.
///
/// `assigned_to` is doubly optional so that an explicit `null` or `""` (clear the
/// assignee) can be told apart from an absent field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_due_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present_assignee")]
    pub assigned_to: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

/// Query parameters for listing tasks.
///
/// `page` and `limit` stay raw strings so that junk values fall back to their
/// defaults instead of failing the request.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub assigned_to: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// One page of a filtered task listing.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    pub total_tasks: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub tasks: Vec<Task>,
}

impl Task {
    /// Creates a new pending `Task` with a fresh id, stamped with the current time.
    pub fn new(input: NewTask) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            creation_date: Utc::now(),
            assigned_to: input.assigned_to,
            category: input.category,
            status: TaskStatus::Pending,
        }
    }
}

impl TaskUpdate {
    /// Merges every sent field into `task`, leaving the rest untouched.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }

    /// The username this update would assign the task to, if it sets one.
    pub fn new_assignee(&self) -> Option<&str> {
        self.assigned_to.as_ref().and_then(|a| a.as_deref())
    }
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_due_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid due date {:?}", raw)))
}

fn deserialize_optional_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_due_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid due date {:?}", raw))),
        None => Ok(None),
    }
}

// An empty username means "unassigned", same as null.
fn deserialize_assignee<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|name| !name.is_empty()))
}

// Only called when the key is present, so null and "" both become Some(None).
fn deserialize_present_assignee<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_assignee(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn new_task() -> NewTask {
        NewTask {
            title: "Write report".to_string(),
            description: "Quarterly numbers".to_string(),
            due_date: NaiveDate::from_ymd_opt(2099, 1, 31).unwrap(),
            category: "Work".to_string(),
            assigned_to: None,
        }
    }

    #[test]
    fn test_task_creation() {
        let task = Task::new(new_task());
        assert_eq!(task.title, "Write report");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.assigned_to.is_none());
        assert_ne!(Task::new(new_task()).id, task.id);
    }

    #[test]
    fn test_parse_due_date() {
        assert_eq!(parse_due_date("2030-05-01"), NaiveDate::from_ymd_opt(2030, 5, 1));
        assert_eq!(parse_due_date("2030/05/01"), NaiveDate::from_ymd_opt(2030, 5, 1));
        assert_eq!(parse_due_date("2030-02-30"), None);
        assert_eq!(parse_due_date("2030-5-1"), None);
        assert_eq!(parse_due_date("2030/05-01"), None);
        assert_eq!(parse_due_date("2030-05-01T10:00:00Z"), None);
        assert_eq!(parse_due_date("tomorrow"), None);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task::new(new_task());
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "2099-01-31");
        assert_eq!(json["status"], "Pending");
        assert!(json["assignedTo"].is_null());
        assert!(json["creationDate"].is_string());
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let absent: TaskUpdate = serde_json::from_value(json!({ "title": "X" })).unwrap();
        assert!(absent.assigned_to.is_none());

        let cleared: TaskUpdate = serde_json::from_value(json!({ "assignedTo": null })).unwrap();
        assert_eq!(cleared.assigned_to, Some(None));
        assert_eq!(cleared.new_assignee(), None);

        let set: TaskUpdate = serde_json::from_value(json!({ "assignedTo": "alice1" })).unwrap();
        assert_eq!(set.new_assignee(), Some("alice1"));
    }

    #[test]
    fn test_empty_assignee_means_unassigned() {
        let created: NewTask = serde_json::from_value(json!({
            "title": "T",
            "description": "D",
            "dueDate": "2099-01-31",
            "category": "Work",
            "assignedTo": ""
        }))
        .unwrap();
        assert_eq!(created.assigned_to, None);

        let cleared: TaskUpdate = serde_json::from_value(json!({ "assignedTo": "" })).unwrap();
        assert_eq!(cleared.assigned_to, Some(None));
        assert_eq!(cleared.new_assignee(), None);
    }

    #[test]
    fn test_update_merges_only_sent_fields() {
        let mut task = Task::new(new_task());
        let before = task.clone();

        let update: TaskUpdate =
            serde_json::from_value(json!({ "title": "X", "unknownField": 1 })).unwrap();
        update.apply(&mut task);

        assert_eq!(task.title, "X");
        assert_eq!(
            Task {
                title: before.title.clone(),
                ..task.clone()
            },
            before
        );
    }

    #[test]
    fn test_update_status_and_due_date() {
        let mut task = Task::new(new_task());
        let update: TaskUpdate =
            serde_json::from_value(json!({ "status": "Completed", "dueDate": "2100/02/01" }))
                .unwrap();
        update.apply(&mut task);
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2100, 2, 1).unwrap());
    }
}
