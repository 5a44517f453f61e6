//! Subscription models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SubscriptionStatus {
    #[serde(alias = "accountType")]
    pub account_type: String,
    #[serde(alias = "hasSubscription", default)]
    pub has_subscription: bool,
    #[serde(default)]
    pub status: String,
    #[serde(alias = "planName", default)]
    pub plan_name: Option<String>,
    #[serde(alias = "currentPeriodStart", default)]
    pub current_period_start: Option<String>,
    #[serde(alias = "currentPeriodEnd", default)]
    pub current_period_end: Option<String>,
    #[serde(alias = "cancelAtPeriodEnd", default)]
    pub cancel_at_period_end: Option<bool>,
}

impl SubscriptionStatus {
    /// Active subscription that will not renew at the end of the period
    pub fn is_ending(&self) -> bool {
        self.has_subscription && self.cancel_at_period_end == Some(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CancelSubscriptionResponse {
    pub message: String,
    #[serde(alias = "cancelAtPeriodEnd")]
    pub cancel_at_period_end: bool,
    #[serde(alias = "periodEnd", default)]
    pub period_end: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_active_subscription() {
        let json = r#"{
            "account_type": "premium",
            "has_subscription": true,
            "status": "active",
            "plan_name": "Premium Monthly",
            "current_period_start": "2024-05-01T00:00:00Z",
            "current_period_end": "2024-06-01T00:00:00Z",
            "cancel_at_period_end": true
        }"#;
        let status: SubscriptionStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.plan_name.as_deref(), Some("Premium Monthly"));
        assert!(status.is_ending());
    }

    #[test]
    fn test_parse_free_account() {
        let json = r#"{"accountType":"free","hasSubscription":false,"status":"none"}"#;
        let status: SubscriptionStatus = serde_json::from_str(json).unwrap();
        assert!(!status.has_subscription);
        assert!(status.cancel_at_period_end.is_none());
        assert!(!status.is_ending());
    }
}
