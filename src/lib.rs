#![doc = "The `taskdesk` library crate."]
#![doc = ""]
#![doc = "A small task management API: task CRUD with filtering and pagination, username"]
#![doc = "and password signup/signin issuing bearer tokens, request validation and token"]
#![doc = "checking middleware, all over an in-memory store. The binary (`main.rs`) wires"]
#![doc = "these pieces into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod validation;

pub use crate::error::AppError;
pub use crate::store::DataStore;
