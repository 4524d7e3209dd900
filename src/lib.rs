//! The `todovault` library crate.
//!
//! A multi-user todo-list backend: users sign up, log in, and manage a
//! private collection of tasks. Every task is scoped to its owner, enforced
//! by the ownership guard in [`auth::guard`]. The binary (`main.rs`) wires
//! these modules into an actix-web server.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
