pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskPage, TaskQuery, TaskStatus, TaskUpdate};
pub use user::{Credentials, SigninResponse, SignupResponse, User};
