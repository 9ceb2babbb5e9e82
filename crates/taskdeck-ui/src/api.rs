use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;
use gloo::net::http::{Request, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use taskdeck_core::task::{Task, TaskId, TaskPatch, TaskPriority, TaskStatus, TimeWindow};

/// Cooperative cancellation for fetch-and-apply flows. The issuing
/// effect keeps the guard armed while it is live and disarms it on
/// cleanup; a response that resolves after disarm must be dropped
/// before touching any state.
#[derive(Debug, Clone)]
pub struct AbortGuard {
    armed: Rc<Cell<bool>>,
}

impl AbortGuard {
    pub fn new() -> Self {
        Self {
            armed: Rc::new(Cell::new(true)),
        }
    }

    pub fn disarm(&self) {
        self.armed.set(false);
    }

    pub fn is_armed(&self) -> bool {
        self.armed.get()
    }
}

impl Default for AbortGuard {
    fn default() -> Self {
        Self::new()
    }
}

async fn send_json<R, B>(builder: RequestBuilder, body: &B) -> Result<R, String>
where
    R: DeserializeOwned,
    B: Serialize + ?Sized,
{
    let request = builder
        .json(body)
        .map_err(|e| format!("failed to encode request body: {e}"))?;
    let response = request
        .send()
        .await
        .map_err(|e| format!("network error: {e}"))?;

    if !response.ok() {
        return Err(error_message(&response).await);
    }

    response
        .json::<R>()
        .await
        .map_err(|e| format!("decode error: {e}"))
}

/// Prefers a server-supplied `message`/`error` field, otherwise reports
/// the bare status code.
async fn error_message(response: &Response) -> String {
    let status = response.status();
    if let Ok(body) = response.text().await
        && let Ok(value) = serde_json::from_str::<serde_json::Value>(&body)
    {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    format!("request failed with status {status}")
}

#[derive(Serialize)]
struct TokenBody<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct TaskIdBody<'a> {
    token: &'a str,
    #[serde(rename = "taskId")]
    task_id: &'a TaskId,
}

/// Generic mutation acknowledgment; fields the server may or may not
/// send.
#[derive(Debug, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct TasksPayload {
    #[serde(default)]
    tasks: Vec<Task>,
}

pub async fn fetch_tasks(base: &str, token: &str) -> Result<Vec<Task>, String> {
    let payload: TasksPayload = send_json(
        Request::post(&format!("{base}/api/tasks/get")),
        &TokenBody { token },
    )
    .await?;
    Ok(payload.tasks)
}

/// Fields collected by the add/edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub day: Option<String>,
    pub window: Option<TimeWindow>,
    pub priority: Option<TaskPriority>,
}

#[derive(Serialize)]
struct CreateTaskBody<'a> {
    token: &'a str,
    title: &'a str,
    description: &'a str,
    status: TaskStatus,
    #[serde(rename = "startingDate")]
    starting_date: String,
    #[serde(rename = "dueDate", skip_serializing_if = "Option::is_none")]
    due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    day: Option<&'a str>,
    #[serde(rename = "important", skip_serializing_if = "Option::is_none")]
    important: Option<&'a TimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<TaskPriority>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskAck {
    #[serde(default)]
    task: Option<Task>,
    #[serde(default, rename = "_id")]
    id: Option<String>,
}

impl CreateTaskAck {
    /// Server-assigned identifier for the created task, when the ack
    /// carries one in either shape.
    pub fn remote_id(&self) -> Option<TaskId> {
        if let Some(id) = &self.id {
            return Some(TaskId::Remote(id.clone()));
        }
        match &self.task {
            Some(task) if !task.id.is_local() => Some(task.id.clone()),
            _ => None,
        }
    }
}

pub async fn create_task(
    base: &str,
    token: &str,
    draft: &TaskDraft,
    starting_date: NaiveDate,
) -> Result<CreateTaskAck, String> {
    let body = CreateTaskBody {
        token,
        title: &draft.title,
        description: &draft.description,
        status: TaskStatus::Incomplete,
        starting_date: starting_date.format("%Y-%m-%d").to_string(),
        due_date: draft
            .due_date
            .map(|date| date.format("%Y-%m-%d").to_string()),
        day: draft.day.as_deref(),
        important: draft.window.as_ref(),
        priority: draft.priority,
    };

    send_json(Request::post(&format!("{base}/api/tasks/create")), &body).await
}

#[derive(Serialize)]
struct UpdateTaskBody<'a> {
    token: &'a str,
    #[serde(rename = "taskId")]
    task_id: &'a TaskId,
    #[serde(flatten)]
    fields: &'a TaskPatch,
}

pub async fn update_task(
    base: &str,
    token: &str,
    id: &TaskId,
    patch: &TaskPatch,
) -> Result<Ack, String> {
    send_json(
        Request::put(&format!("{base}/api/tasks/update")),
        &UpdateTaskBody {
            token,
            task_id: id,
            fields: patch,
        },
    )
    .await
}

// Body-carried DELETE, matching the server's route.
pub async fn delete_task(base: &str, token: &str, id: &TaskId) -> Result<Ack, String> {
    send_json(
        Request::delete(&format!("{base}/api/tasks/delete")),
        &TaskIdBody { token, task_id: id },
    )
    .await
}

pub async fn toggle_task_completion(
    base: &str,
    token: &str,
    id: &TaskId,
) -> Result<Ack, String> {
    send_json(
        Request::put(&format!("{base}/api/tasks/toggle-completion")),
        &TaskIdBody { token, task_id: id },
    )
    .await
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<ApiUser>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

pub async fn login(base: &str, email: &str, password: &str) -> Result<AuthResponse, String> {
    send_json(
        Request::post(&format!("{base}/api/users/login")),
        &LoginBody { email, password },
    )
    .await
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    email: &'a str,
    password: &'a str,
    image: Option<&'a str>,
    username: &'a str,
}

pub async fn register(
    base: &str,
    username: &str,
    email: &str,
    password: &str,
    image: Option<&str>,
) -> Result<AuthResponse, String> {
    send_json(
        Request::post(&format!("{base}/api/users/register")),
        &RegisterBody {
            email,
            password,
            image,
            username,
        },
    )
    .await
}

#[derive(Deserialize)]
struct ProfilePayload {
    user: ApiUser,
}

pub async fn fetch_profile(base: &str, token: &str) -> Result<ApiUser, String> {
    let payload: ProfilePayload = send_json(
        Request::post(&format!("{base}/api/users/profile")),
        &TokenBody { token },
    )
    .await?;
    Ok(payload.user)
}

#[derive(Serialize)]
pub struct ProfileUpdate<'a> {
    pub token: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub bio: &'a str,
    pub role: &'a str,
}

pub async fn update_profile(base: &str, update: &ProfileUpdate<'_>) -> Result<Ack, String> {
    send_json(
        Request::put(&format!("{base}/api/users/profile")),
        update,
    )
    .await
}
