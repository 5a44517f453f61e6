//! REST API client module for the Narrafied backend.
//!
//! This module provides the `ApiClient` for signing up, logging in and
//! reading profile, library, subscription and listening-stat data.
//!
//! The API uses bearer token authentication. The token is issued by
//! `/login` and held by the client's `Session`.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, RequestError};
pub use reqwest::StatusCode;
