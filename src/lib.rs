#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Role-scoped task management: two roles (admin, member) authenticate with"]
#![doc = "bearer tokens; admins create, assign, edit, and delete tasks, while members"]
#![doc = "view and progress only the tasks assigned to them. This crate holds the"]
#![doc = "domain models, the authentication / authorization core, the task engine,"]
#![doc = "routing configuration, and error handling; the binary (`main.rs`) wires"]
#![doc = "them into a running server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod tasks;
