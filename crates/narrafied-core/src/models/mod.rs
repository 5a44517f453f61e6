//! Data models for Narrafied entities.
//!
//! This module contains the request and response types for every backend
//! endpoint:
//!
//! - `user`: signup, login, profile, account type and account deletion
//! - `library`: books and listening progress
//! - `subscription`: subscription status and cancellation
//! - `stats`: most-played and per-genre listening statistics
//!
//! The backend speaks snake_case JSON; camelCase spellings are accepted
//! as aliases when decoding.

pub mod library;
pub mod stats;
pub mod subscription;
pub mod user;

pub use library::{Book, ListeningProgress};
pub use stats::{GenreStat, GenreStats, MostPlayedStats, PlayStat};
pub use subscription::{CancelSubscriptionResponse, SubscriptionStatus};
pub use user::{
    AccountTypeResponse, DeleteAccountRequest, LogInRequest, LogInResponse, MessageResponse,
    SignUpRequest, SignUpResponse, UserProfile,
};
