//! Narrafied Core - client library for the Narrafied audiobook platform.
//!
//! This crate contains everything a front end needs to talk to the
//! Narrafied backend:
//! - `api`: the session-aware `ApiClient` and its error taxonomy
//! - `auth`: the `Session` and the `TokenStore` backends that persist it
//! - `models`: request and response types for every endpoint
//! - `config`: environment selection and the on-disk configuration
//! - `dashboard`: concurrent page-level data loads

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod models;

pub use api::{ApiClient, ApiError, RequestError};
pub use auth::{Session, TokenStore};
pub use config::{Config, Environment, TokenStorage};
pub use dashboard::{Dashboard, Library};
