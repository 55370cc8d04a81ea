use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned task identifier
pub type TaskId = i64;

/// Display fallback for tasks without a title
pub const UNTITLED: &str = "Untitled";

/// A task as returned by the API (remote-owned, locally cached)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    /// Creation time in local wall-clock time, used for calendar bucketing
    #[serde(default, with = "wire_datetime")]
    pub created_at: Option<NaiveDateTime>,
}

impl Task {
    /// Calendar day the task belongs to (None if the server sent no timestamp)
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at.map(|dt| dt.date())
    }

    /// Title for display, falls back to "Untitled"
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    /// Status badge shown in the list and on map nodes
    pub fn status_badge(&self) -> &'static str {
        if self.completed {
            "✔ Done"
        } else {
            "● In progress"
        }
    }

    /// Request body carrying this task's current fields
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed,
        }
    }
}

/// Request body for create (POST) and update (PUT)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            completed: false,
        }
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Parse a `createdAt` value.
///
/// Accepts RFC 3339 with an offset (converted to local time), a naive ISO
/// date-time with optional fractional seconds, or a bare date.
pub fn parse_created_at(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

mod wire_datetime {
    use super::parse_created_at;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_some(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Unparseable values decode as `None` so one bad row cannot fail a list
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let parsed = parse_created_at(&raw);
        if parsed.is_none() {
            warn!(raw = %raw, "ignoring invalid createdAt");
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_server_task() {
        let json = r#"{"id":7,"title":"Buy milk","description":null,"completed":false,"createdAt":"2024-03-15T10:20:30.123456"}"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.id, 7);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "");
        assert!(!task.completed);
        assert_eq!(task.created_on(), NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_decode_missing_created_at() {
        let task: Task = serde_json::from_str(r#"{"id":1,"title":"x"}"#).unwrap();
        assert_eq!(task.created_at, None);
        assert_eq!(task.created_on(), None);
        assert!(!task.completed);
    }

    #[test]
    fn test_decode_invalid_timestamp_as_none() {
        let task: Task = serde_json::from_str(r#"{"id":1,"title":"x","createdAt":"yesterday"}"#).unwrap();
        assert_eq!(task.created_at, None);
        assert_eq!(task.created_on(), None);
    }

    #[test]
    fn test_bad_timestamp_does_not_fail_list() {
        let tasks: Vec<Task> = serde_json::from_str(
            r#"[{"id":1,"title":"a","createdAt":"not a date"},
                {"id":2,"title":"b","createdAt":"2024-03-15T10:20:30"}]"#,
        )
        .unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].created_at, None);
        assert_eq!(tasks[1].created_on(), NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_parse_created_at_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 20, 30)
            .unwrap();
        assert_eq!(parse_created_at("2024-03-15T10:20:30"), Some(expected));
        assert_eq!(parse_created_at("2024-03-15T10:20:30.5").map(|d| d.date()), Some(expected.date()));
        assert_eq!(
            parse_created_at("2024-03-15").map(|d| d.date()),
            Some(expected.date())
        );
        assert!(parse_created_at("2024-03-15T10:20:30+00:00").is_some());
        assert_eq!(parse_created_at("not a date"), None);
    }

    #[test]
    fn test_draft_serializes_request_body() {
        let draft = TaskDraft::new("Buy milk", "");
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"title": "Buy milk", "description": "", "completed": false})
        );
    }

    #[test]
    fn test_display_title_fallback() {
        let task = Task {
            id: 1,
            title: "   ".to_string(),
            description: String::new(),
            completed: true,
            created_at: None,
        };
        assert_eq!(task.display_title(), UNTITLED);
        assert_eq!(task.status_badge(), "✔ Done");
        assert!(task.to_draft().completed);
    }
}
