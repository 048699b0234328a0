//! Request handling logic, kept free of HTTP types so it can be exercised directly.

pub mod tasks;
pub mod users;
