//! In-memory storage for users and tasks.
//!
//! `DataStore` is the only owner of the collections. Handlers reach it through
//! `web::Data<DataStore>` and only ever see clones of the records. Every operation
//! takes the single internal lock exactly once, which makes each call atomic with
//! respect to every other call.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::models::{Task, User};

#[derive(Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No record with the requested id.
    NotFound,
    /// A record with this id is already stored.
    DuplicateId(Uuid),
    /// A user with this username is already stored.
    UsernameTaken,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "record not found"),
            StoreError::DuplicateId(id) => write!(f, "duplicate record id {}", id),
            StoreError::UsernameTaken => write!(f, "username already taken"),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    tasks: Vec<Task>,
}

/// Process-lifetime collections of users and tasks behind one mutex.
#[derive(Default)]
pub struct DataStore {
    inner: Mutex<Collections>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Mutations finish under the lock before it is released, so a poisoned
    // lock still guards consistent collections.
    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores a new user. The id is supplied by the caller.
    pub fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::DuplicateId(user.id));
        }
        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::UsernameTaken);
        }
        inner.users.push(user.clone());
        Ok(user)
    }

    pub fn find_user(&self, id: Uuid) -> Option<User> {
        self.lock().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    pub fn user_exists(&self, username: &str) -> bool {
        self.lock().users.iter().any(|u| u.username == username)
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    /// Stores a new task. The id is supplied by the caller.
    pub fn insert_task(&self, task: Task) -> Result<Task, StoreError> {
        let mut inner = self.lock();
        if inner.tasks.iter().any(|t| t.id == task.id) {
            return Err(StoreError::DuplicateId(task.id));
        }
        inner.tasks.push(task.clone());
        Ok(task)
    }

    pub fn find_task(&self, id: Uuid) -> Option<Task> {
        self.lock().tasks.iter().find(|t| t.id == id).cloned()
    }

    /// Applies `change` to the stored task in place and returns the result.
    pub fn update_task<F>(&self, id: Uuid, change: F) -> Result<Task, StoreError>
    where
        F: FnOnce(&mut Task),
    {
        let mut inner = self.lock();
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        change(task);
        Ok(task.clone())
    }

    /// Removes a task, returning what was stored.
    pub fn delete_task(&self, id: Uuid) -> Result<Task, StoreError> {
        let mut inner = self.lock();
        let index = inner
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        Ok(inner.tasks.remove(index))
    }

    /// All tasks matching `predicate`, in insertion order.
    pub fn find_tasks<P>(&self, predicate: P) -> Vec<Task>
    where
        P: Fn(&Task) -> bool,
    {
        self.lock()
            .tasks
            .iter()
            .filter(|t| predicate(t))
            .cloned()
            .collect()
    }

    pub fn task_count(&self) -> usize {
        self.lock().tasks.len()
    }
}
