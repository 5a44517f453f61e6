//! Account models: signup, login, profile and deletion.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Region code, sent to the backend as `state`
    #[serde(rename = "state")]
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SignUpResponse {
    pub message: String,
    #[serde(alias = "userId")]
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LogInRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LogInResponse {
    pub token: String,
}

/// The signed-in user's profile, as shown on the profile dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    #[serde(alias = "accountType")]
    pub account_type: String,
    #[serde(alias = "isPublic", default)]
    pub is_public: bool,
    // Signup sends the region as `state`. A body carrying both keys is
    // rejected by serde as a duplicate field.
    #[serde(alias = "state", default)]
    pub region: Option<String>,
    #[serde(alias = "booksRead", default)]
    pub books_read: u32,
    #[serde(alias = "createdAt", default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AccountTypeResponse {
    #[serde(alias = "accountType")]
    pub account_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DeleteAccountRequest {
    pub password: String,
    pub reason: String,
}

/// Generic `{message}` confirmation returned by mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
