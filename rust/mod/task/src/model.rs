use serde::{Deserialize, Serialize};

use taskboard_core::ServiceError;

/// Maximum length of a task title, in characters.
pub const TITLE_MAX: usize = 100;
/// Maximum length of a task description, in characters.
pub const DESCRIPTION_MAX: usize = 500;

/// Format a due date is stored and exchanged in.
const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// TaskStatus / TaskPriority
// ---------------------------------------------------------------------------

/// Workflow state of a task.
///
/// Serialized under the canonical PascalCase name (`"Todo"`, `"InProgress"`,
/// `"Done"`). Clients key off these exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::InProgress => "InProgress",
            Self::Done => "Done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Todo" => Some(Self::Todo),
            "InProgress" => Some(Self::InProgress),
            "Done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a task. Same canonical-name rule as [`TaskStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Task — the core data model
// ---------------------------------------------------------------------------

/// A single task record.
///
/// This is the document persisted in the store's `data` column. The
/// soft-delete flag lives in its own indexed column beside the document,
/// so it does not appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier, assigned at creation. Immutable, never reused.
    pub id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub status: TaskStatus,

    pub priority: TaskPriority,

    /// Calendar date, `YYYY-MM-DD`.
    pub due_date: String,

    /// RFC 3339 creation timestamp. Set once.
    pub created_at: String,

    /// RFC 3339 last update timestamp. Refreshed on every successful
    /// create or update.
    pub updated_at: String,
}

// ---------------------------------------------------------------------------
// API request types
// ---------------------------------------------------------------------------

/// Body for `POST /tasks` — create a new task.
///
/// Every field is optional at the serde level so that validation can report
/// all missing/invalid fields in one pass instead of failing on the first.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub priority: Option<String>,

    #[serde(default)]
    pub due_date: Option<String>,
}

/// Validated fields of a create request, ready to become a [`Task`].
#[derive(Debug)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: String,
}

impl CreateTaskRequest {
    /// Validate the request, accumulating every violation.
    ///
    /// On failure returns `ServiceError::Validation` with all messages
    /// joined, not just the first.
    pub fn validate(self) -> Result<NewTask, ServiceError> {
        let mut errors: Vec<&str> = Vec::new();

        let title = match self.title.as_deref() {
            None | Some("") => {
                errors.push("Title is required.");
                None
            }
            Some(t) if t.chars().count() > TITLE_MAX => {
                errors.push("Title cannot exceed 100 characters.");
                None
            }
            Some(t) => Some(t.to_string()),
        };

        let description = match self.description {
            Some(d) if d.chars().count() > DESCRIPTION_MAX => {
                errors.push("Description cannot exceed 500 characters.");
                None
            }
            other => other,
        };

        let status = match self.status.as_deref() {
            None | Some("") => {
                errors.push("Status is required.");
                None
            }
            Some(s) => match TaskStatus::from_str(s) {
                Some(s) => Some(s),
                None => {
                    errors.push("Invalid status value.");
                    None
                }
            },
        };

        let priority = match self.priority.as_deref() {
            None | Some("") => {
                errors.push("Priority is required.");
                None
            }
            Some(p) => match TaskPriority::from_str(p) {
                Some(p) => Some(p),
                None => {
                    errors.push("Invalid priority value.");
                    None
                }
            },
        };

        let due_date = match self.due_date.as_deref() {
            None | Some("") => {
                errors.push("Due date is required.");
                None
            }
            Some(d) => match parse_date(d) {
                Some(d) => Some(d),
                None => {
                    errors.push("Invalid date format.");
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors.join(", ")));
        }

        // All None arms pushed an error above, so unwrapping here is safe.
        Ok(NewTask {
            title: title.unwrap(),
            description,
            status: status.unwrap(),
            priority: priority.unwrap(),
            due_date: due_date.unwrap(),
        })
    }
}

/// Body for `PUT /tasks/{id}` — partial update.
///
/// Fields absent from the body keep their stored value; present fields are
/// validated with the same rules as create.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub priority: Option<String>,

    #[serde(default)]
    pub due_date: Option<String>,
}

/// Validated present fields of an update request.
#[derive(Debug, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<String>,
}

impl UpdateTaskRequest {
    /// Validate the present fields, accumulating every violation.
    pub fn validate(self) -> Result<TaskPatch, ServiceError> {
        let mut errors: Vec<&str> = Vec::new();
        let mut patch = TaskPatch::default();

        match self.title {
            None => {}
            Some(t) if t.is_empty() => errors.push("Title is required."),
            Some(t) if t.chars().count() > TITLE_MAX => {
                errors.push("Title cannot exceed 100 characters.")
            }
            Some(t) => patch.title = Some(t),
        }

        match self.description {
            None => {}
            Some(d) if d.chars().count() > DESCRIPTION_MAX => {
                errors.push("Description cannot exceed 500 characters.")
            }
            Some(d) => patch.description = Some(d),
        }

        if let Some(s) = self.status.as_deref() {
            match TaskStatus::from_str(s) {
                Some(s) => patch.status = Some(s),
                None => errors.push("Invalid status value."),
            }
        }

        if let Some(p) = self.priority.as_deref() {
            match TaskPriority::from_str(p) {
                Some(p) => patch.priority = Some(p),
                None => errors.push("Invalid priority value."),
            }
        }

        if let Some(d) = self.due_date.as_deref() {
            match parse_date(d) {
                Some(d) => patch.due_date = Some(d),
                None => errors.push("Invalid date format."),
            }
        }

        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors.join(", ")));
        }
        Ok(patch)
    }
}

/// Parse and normalise an ISO calendar date.
fn parse_date(s: &str) -> Option<String> {
    chrono::NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .map(|d| d.format(DATE_FORMAT).to_string())
}

// ---------------------------------------------------------------------------
// API response type
// ---------------------------------------------------------------------------

/// Shape of a task returned to clients.
///
/// Status and priority are emitted as their canonical string names; clients
/// match on these exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub due_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status.as_str().to_string(),
            priority: task.priority.as_str().to_string(),
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
