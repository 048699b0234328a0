//! Task operations behind the `/task` and `/tasks` routes.
//!
//! Every function takes the store and the caller's identity explicitly. Input has
//! already passed its validation rules by the time it gets here; what remains is the
//! checks that need the store, such as whether `assignedTo` names a real user.

use log::{debug, info};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{NewTask, Task, TaskPage, TaskQuery, TaskUpdate};
use crate::store::DataStore;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

// Ids that are not UUIDs cannot name a stored task.
fn parse_task_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| task_not_found())
}

fn ensure_assignee_exists(store: &DataStore, username: &str) -> Result<(), AppError> {
    if store.user_exists(username) {
        Ok(())
    } else {
        Err(AppError::AssignedUserNotFound)
    }
}

pub fn create_task(
    store: &DataStore,
    actor: &AuthenticatedUser,
    input: NewTask,
) -> Result<Task, AppError> {
    if let Some(username) = input.assigned_to.as_deref() {
        ensure_assignee_exists(store, username)?;
    }

    let task = store.insert_task(Task::new(input))?;
    info!("{} created task {}", actor.username, task.id);
    Ok(task)
}

pub fn get_task(store: &DataStore, actor: &AuthenticatedUser, id: &str) -> Result<Task, AppError> {
    debug!("{} fetching task {}", actor.username, id);
    let id = parse_task_id(id)?;
    store.find_task(id).ok_or_else(task_not_found)
}

pub fn update_task(
    store: &DataStore,
    actor: &AuthenticatedUser,
    id: &str,
    update: TaskUpdate,
) -> Result<Task, AppError> {
    let id = parse_task_id(id)?;
    if store.find_task(id).is_none() {
        return Err(task_not_found());
    }
    if let Some(username) = update.new_assignee() {
        ensure_assignee_exists(store, username)?;
    }

    let task = store.update_task(id, |task| update.apply(task))?;
    info!("{} updated task {}", actor.username, task.id);
    Ok(task)
}

pub fn delete_task(store: &DataStore, actor: &AuthenticatedUser, id: &str) -> Result<(), AppError> {
    let id = parse_task_id(id)?;
    store.delete_task(id)?;
    info!("{} deleted task {}", actor.username, id);
    Ok(())
}

/// Resolves `page`/`limit` query values, falling back to the defaults for anything
/// missing, non-numeric or below 1.
pub fn page_params(query: &TaskQuery) -> (usize, usize) {
    fn positive(raw: Option<&str>) -> Option<usize> {
        raw.and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
    }

    (
        positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE),
        positive(query.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
    )
}

/// Cuts one page out of an already filtered list. Pages past the end are empty.
pub fn paginate(tasks: Vec<Task>, page: usize, limit: usize) -> TaskPage {
    let total_tasks = tasks.len();
    let start = page.saturating_sub(1).saturating_mul(limit);
    let tasks = tasks.into_iter().skip(start).take(limit).collect();

    TaskPage {
        total_tasks,
        total_pages: total_tasks.div_ceil(limit),
        current_page: page,
        tasks,
    }
}

/// Lists tasks filtered by exact `assignedTo` and `category`, then paginated.
pub fn list_tasks(store: &DataStore, actor: &AuthenticatedUser, query: &TaskQuery) -> TaskPage {
    let (page, limit) = page_params(query);
    let assigned_to = query.assigned_to.as_deref();
    let category = query.category.as_deref();

    let filtered = store.find_tasks(|task| {
        assigned_to.map_or(true, |a| task.assigned_to.as_deref() == Some(a))
            && category.map_or(true, |c| task.category == c)
    });

    debug!(
        "{} listed tasks: {} match, page {} of size {}",
        actor.username,
        filtered.len(),
        page,
        limit
    );
    paginate(filtered, page, limit)
}
