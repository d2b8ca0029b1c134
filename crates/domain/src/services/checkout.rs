//! Checkout decision for the storefront host.
//!
//! The host renders whatever this value says: notices to show, and which
//! checkout sections to hide so the order cannot be placed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shared::money::PriceFormat;

use crate::services::spend_window::{Evaluation, EvaluationResult};

/// Message shown when the spend cap could not be checked and the host fails closed.
pub const VERIFICATION_UNAVAILABLE_MESSAGE: &str =
    "We are unable to verify your spending limit right now. Please try again shortly.";

/// Severity of a checkout notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Error,
    Notice,
}

/// A message the host displays on the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Checkout page sections the host hides while checkout is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutSection {
    CustomerDetails,
    OrderReviewHeading,
    OrderReview,
    Payment,
}

/// Sections hidden when checkout is blocked.
pub const BLOCKED_SECTIONS: [CheckoutSection; 4] = [
    CheckoutSection::CustomerDetails,
    CheckoutSection::OrderReviewHeading,
    CheckoutSection::OrderReview,
    CheckoutSection::Payment,
];

/// What the host does when the spend cap cannot be evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFailurePolicy {
    /// Let the customer check out.
    #[default]
    FailOpen,
    /// Block checkout until the cap can be verified.
    FailClosed,
}

impl QueryFailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryFailurePolicy::FailOpen => "fail_open",
            QueryFailurePolicy::FailClosed => "fail_closed",
        }
    }
}

/// Plain decision value consumed by the checkout renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDecision {
    pub block_checkout: bool,
    /// Drop notices queued earlier in the request before showing ours.
    pub clear_existing_notices: bool,
    pub notices: Vec<Notice>,
    pub hidden_sections: Vec<CheckoutSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationResult>,
}

impl CheckoutDecision {
    /// Checkout proceeds untouched.
    pub fn allow() -> Self {
        Self {
            block_checkout: false,
            clear_existing_notices: false,
            notices: Vec::new(),
            hidden_sections: Vec::new(),
            evaluation: None,
        }
    }

    pub fn from_evaluation(evaluation: &Evaluation, format: &PriceFormat) -> Self {
        let Some(result) = evaluation.result() else {
            return Self::allow();
        };

        if !result.is_over_limit {
            return Self {
                evaluation: Some(result.clone()),
                ..Self::allow()
            };
        }

        Self {
            block_checkout: true,
            clear_existing_notices: true,
            notices: vec![
                Notice {
                    level: NoticeLevel::Error,
                    message: over_limit_message(result.total_spent, result.window_days, format),
                },
                Notice {
                    level: NoticeLevel::Notice,
                    message: cap_message(result.limit, format),
                },
            ],
            hidden_sections: BLOCKED_SECTIONS.to_vec(),
            evaluation: Some(result.clone()),
        }
    }

    /// Decision when the evaluation itself failed.
    pub fn on_failure(policy: QueryFailurePolicy) -> Self {
        match policy {
            QueryFailurePolicy::FailOpen => Self::allow(),
            QueryFailurePolicy::FailClosed => Self {
                block_checkout: true,
                clear_existing_notices: true,
                notices: vec![Notice {
                    level: NoticeLevel::Error,
                    message: VERIFICATION_UNAVAILABLE_MESSAGE.to_string(),
                }],
                hidden_sections: BLOCKED_SECTIONS.to_vec(),
                evaluation: None,
            },
        }
    }
}

/// Error notice explaining the breach.
pub fn over_limit_message(total_spent: Decimal, window_days: u32, format: &PriceFormat) -> String {
    format!(
        "You have spent a total of {} over the past {} days. You have now reached or surpassed \
         the maximum spend limit allowed for {} days period. If you wish to extend your limit, \
         kindly contact us for further assistance. Alternatively, please revisit our website in \
         a few days to see if your limit has been reset.",
        format.format(total_spent),
        window_days,
        window_days
    )
}

/// Secondary notice stating the configured cap.
pub fn cap_message(limit: Decimal, format: &PriceFormat) -> String {
    format!("Your Maximum Spend Amount Cap: {}", format.format(limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::spend_window::TimeRemaining;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn result(total: i64, limit: i64) -> EvaluationResult {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        EvaluationResult {
            customer_id: Uuid::new_v4(),
            is_over_limit: total >= limit,
            total_spent: Decimal::from(total),
            limit: Decimal::from(limit),
            window_days: 7,
            window_start: Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap(),
            reset_at: now,
            remaining: TimeRemaining { days: 0, hours: 0 },
            qualifying_orders: 2,
            oldest_order_expires_at: None,
        }
    }

    #[test]
    fn test_inactive_allows_checkout() {
        let decision = CheckoutDecision::from_evaluation(&Evaluation::Inactive, &PriceFormat::default());
        assert_eq!(decision, CheckoutDecision::allow());
    }

    #[test]
    fn test_within_limit_allows_checkout_with_evaluation() {
        let evaluation = Evaluation::Evaluated(result(50, 100));
        let decision = CheckoutDecision::from_evaluation(&evaluation, &PriceFormat::default());
        assert!(!decision.block_checkout);
        assert!(decision.notices.is_empty());
        assert!(decision.hidden_sections.is_empty());
        assert_eq!(decision.evaluation.unwrap().total_spent, Decimal::from(50));
    }

    #[test]
    fn test_over_limit_blocks_with_notices() {
        let evaluation = Evaluation::Evaluated(result(110, 100));
        let decision = CheckoutDecision::from_evaluation(&evaluation, &PriceFormat::default());

        assert!(decision.block_checkout);
        assert!(decision.clear_existing_notices);
        assert_eq!(decision.hidden_sections, BLOCKED_SECTIONS.to_vec());
        assert_eq!(decision.notices.len(), 2);
        assert_eq!(decision.notices[0].level, NoticeLevel::Error);
        assert!(decision.notices[0]
            .message
            .starts_with("You have spent a total of $110.00 over the past 7 days."));
        assert!(decision.notices[0]
            .message
            .contains("maximum spend limit allowed for 7 days period"));
        assert_eq!(decision.notices[1].level, NoticeLevel::Notice);
        assert_eq!(decision.notices[1].message, "Your Maximum Spend Amount Cap: $100.00");
    }

    #[test]
    fn test_failure_policy() {
        assert_eq!(
            CheckoutDecision::on_failure(QueryFailurePolicy::FailOpen),
            CheckoutDecision::allow()
        );

        let closed = CheckoutDecision::on_failure(QueryFailurePolicy::FailClosed);
        assert!(closed.block_checkout);
        assert_eq!(closed.notices[0].message, VERIFICATION_UNAVAILABLE_MESSAGE);
        assert!(closed.evaluation.is_none());
    }

    #[test]
    fn test_failure_policy_deserialize() {
        let policy: QueryFailurePolicy = serde_json::from_str(r#""fail_closed""#).unwrap();
        assert_eq!(policy, QueryFailurePolicy::FailClosed);
        assert_eq!(QueryFailurePolicy::default(), QueryFailurePolicy::FailOpen);
        assert_eq!(QueryFailurePolicy::FailClosed.as_str(), "fail_closed");
    }

    #[test]
    fn test_decision_serialization_shape() {
        let evaluation = Evaluation::Evaluated(result(110, 100));
        let decision = CheckoutDecision::from_evaluation(&evaluation, &PriceFormat::default());
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["blockCheckout"], true);
        assert_eq!(json["hiddenSections"][3], "payment");
        assert_eq!(json["notices"][0]["level"], "error");
        assert_eq!(json["evaluation"]["windowDays"], 7);
    }
}
