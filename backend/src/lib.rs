//! Auth Server Library
//!
//! Email/password registration, credential verification and JWT session
//! tokens, served over HTTP with axum.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
