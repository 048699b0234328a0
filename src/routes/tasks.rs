use crate::{
    auth::{AuthMiddleware, AuthenticatedUser},
    error::AppError,
    models::{NewTask, TaskQuery, TaskUpdate},
    services::tasks as service,
    store::DataStore,
    validation::Validated,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;

/// Creates a new task.
///
/// ## Request Body:
/// - `title`, `description`, `category`: non-empty strings (required).
/// - `dueDate`: a calendar date after today, `YYYY-MM-DD` (required).
/// - `assignedTo` (optional): username of an existing user, or `null`.
///
/// ## Responses:
/// - `201 Created`: the new task, with `status` set to `Pending`.
/// - `400 Bad Request`: validation failed; every violation is listed.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: `assignedTo` names an unknown user.
#[post("", wrap = "AuthMiddleware")]
pub async fn create_task(
    store: web::Data<DataStore>,
    user: AuthenticatedUser,
    task_data: Validated<NewTask>,
) -> Result<impl Responder, AppError> {
    let task = service::create_task(&store, &user, task_data.into_inner())?;
    Ok(HttpResponse::Created().json(task))
}

/// Lists tasks, optionally filtered by `assignedTo` and `category`.
///
/// ## Query Parameters:
/// - `assignedTo`, `category` (optional): exact-match filters, combined with AND.
/// - `page` (default 1), `limit` (default 10): pagination over the filtered list.
///
/// ## Responses:
/// - `200 OK`: `{ totalTasks, totalPages, currentPage, tasks }`.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("", wrap = "AuthMiddleware")]
pub async fn list_tasks(
    store: web::Data<DataStore>,
    user: AuthenticatedUser,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let page = service::list_tasks(&store, &user, &query_params);
    Ok(HttpResponse::Ok().json(page))
}

/// Retrieves a task by id. `404` if there is no such task.
#[get("/{id}", wrap = "AuthMiddleware")]
pub async fn get_task(
    store: web::Data<DataStore>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = service::get_task(&store, &user, &task_id)?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task.
///
/// Only the fields present in the body change. `assignedTo` is checked against the
/// registered users as on create, and `null` clears it.
///
/// ## Responses:
/// - `200 OK`: the merged task.
/// - `400 Bad Request`: validation failed (past `dueDate`, unknown `status`, ...).
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: unknown task, or `assignedTo` names an unknown user.
#[put("/{id}", wrap = "AuthMiddleware")]
pub async fn update_task(
    store: web::Data<DataStore>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
    task_data: Validated<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let task = service::update_task(&store, &user, &task_id, task_data.into_inner())?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by id.
#[delete("/{id}", wrap = "AuthMiddleware")]
pub async fn delete_task(
    store: web::Data<DataStore>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    service::delete_task(&store, &user, &task_id)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
