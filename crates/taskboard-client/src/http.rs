//! Request/response fallback.
//!
//! Maps each intent onto the REST route that does the same thing, for
//! deployments without the push channel. Only the request description lives
//! here; whatever HTTP client sends it is the caller's choice.
//!
//! | Intent          | Request                                   |
//! |-----------------|-------------------------------------------|
//! | `getTasks`      | `GET /tasks`                              |
//! | `createTask`    | `POST /tasks {title}`                     |
//! | `updateTask`    | `PUT /tasks/:id {title?,status?,order?}`  |
//! | `deleteTask`    | `DELETE /tasks/:id`                       |
//! | `createSubtask` | `POST /tasks/:id/subtasks {title}`        |
//! | `updateSubtask` | `PUT /tasks/:id/subtasks/:sid {title?,order?}` |
//! | `deleteSubtask` | `DELETE /tasks/:id/subtasks/:sid`         |

use serde::Serialize;
use serde_json::{Value, json};
use strum::{AsRefStr, Display, EnumString};

use taskboard_types::{Intent, SubtaskId, TaskId};

use crate::constants::TASKS_PATH;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// One request, relative to the API base.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl HttpRequest {
    fn new(method: Method, path: String, body: Option<Value>) -> Self {
        Self { method, path, body }
    }

    /// Absolute URL under `api_base`.
    pub fn url(&self, api_base: &str) -> String {
        format!("{}{}", api_base.trim_end_matches('/'), self.path)
    }
}

fn task_path(id: &TaskId) -> String {
    format!("{TASKS_PATH}/{id}")
}

fn subtask_path(task_id: &TaskId, subtask_id: Option<&SubtaskId>) -> String {
    match subtask_id {
        Some(subtask_id) => format!("{}/subtasks/{subtask_id}", task_path(task_id)),
        None => format!("{}/subtasks", task_path(task_id)),
    }
}

/// Patches serialize with absent fields omitted.
fn body<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

impl From<&Intent> for HttpRequest {
    fn from(intent: &Intent) -> Self {
        match intent {
            Intent::GetTasks => HttpRequest::new(Method::Get, TASKS_PATH.to_string(), None),
            Intent::CreateTask { title } => {
                HttpRequest::new(Method::Post, TASKS_PATH.to_string(), Some(json!({ "title": title })))
            }
            Intent::UpdateTask { id, update_body } => HttpRequest::new(Method::Put, task_path(id), body(update_body)),
            Intent::DeleteTask { id } => HttpRequest::new(Method::Delete, task_path(id), None),
            Intent::CreateSubtask { task_id, body: new } => {
                HttpRequest::new(Method::Post, subtask_path(task_id, None), body(new))
            }
            Intent::UpdateSubtask { task_id, subtask_id, update_body } => {
                HttpRequest::new(Method::Put, subtask_path(task_id, Some(subtask_id)), body(update_body))
            }
            Intent::DeleteSubtask { task_id, subtask_id } => {
                HttpRequest::new(Method::Delete, subtask_path(task_id, Some(subtask_id)), None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_types::{GroupKey, NewSubtask, SubtaskPatch, TaskPatch};

    #[test]
    fn test_task_routes() {
        let get = HttpRequest::from(&Intent::GetTasks);
        assert_eq!((get.method, get.path.as_str(), get.body), (Method::Get, "/tasks", None));

        let create = HttpRequest::from(&Intent::CreateTask { title: "Write".into() });
        assert_eq!(create.method, Method::Post);
        assert_eq!(create.body, Some(json!({ "title": "Write" })));

        let update = HttpRequest::from(&Intent::UpdateTask {
            id: TaskId::new("t1"),
            update_body: TaskPatch::moved(GroupKey::Completed, 0),
        });
        assert_eq!(update.method, Method::Put);
        assert_eq!(update.path, "/tasks/t1");
        assert_eq!(update.body, Some(json!({ "status": "completed", "order": 0 })));

        let delete = HttpRequest::from(&Intent::DeleteTask { id: TaskId::new("t1") });
        assert_eq!((delete.method, delete.body), (Method::Delete, None));
    }

    #[test]
    fn test_subtask_routes() {
        let create = HttpRequest::from(&Intent::CreateSubtask {
            task_id: TaskId::new("t1"),
            body: NewSubtask { title: "step".into() },
        });
        assert_eq!(create.path, "/tasks/t1/subtasks");
        assert_eq!(create.body, Some(json!({ "title": "step" })));

        let update = HttpRequest::from(&Intent::UpdateSubtask {
            task_id: TaskId::new("t1"),
            subtask_id: SubtaskId::new("s9"),
            update_body: SubtaskPatch::title("renamed"),
        });
        assert_eq!(update.path, "/tasks/t1/subtasks/s9");
        assert_eq!(update.body, Some(json!({ "title": "renamed" })));

        let delete = HttpRequest::from(&Intent::DeleteSubtask {
            task_id: TaskId::new("t1"),
            subtask_id: SubtaskId::new("s9"),
        });
        assert_eq!(delete.method.as_ref(), "DELETE");
    }

    #[test]
    fn test_url_joins_base() {
        let request = HttpRequest::from(&Intent::DeleteTask { id: TaskId::new("x") });
        assert_eq!(request.url("http://localhost:5000/v1/"), "http://localhost:5000/v1/tasks/x");
        assert_eq!(request.url(crate::constants::DEFAULT_API_BASE), "http://localhost:5000/v1/tasks/x");
    }
}
