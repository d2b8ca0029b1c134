//! Spend cap configuration models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{parse_spend_amount, parse_window_days};

/// User attribute holding the maximum spend amount (free text).
pub const MAXIMUM_SPEND_AMOUNT_KEY: &str = "maximum_spend_amount";

/// User attribute holding the spend limit period in days (free text).
pub const SPEND_LIMIT_PERIOD_KEY: &str = "spend_limit_period";

/// An active spend cap for one customer.
///
/// Only exists when both attributes are present and well formed; every other
/// combination means the customer has no cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendCapConfig {
    pub customer_id: Uuid,
    pub max_amount: Decimal,
    pub window_days: u32,
}

impl SpendCapConfig {
    /// Builds a config from the raw stored attribute values.
    ///
    /// Returns `None` for an absent/empty/non-numeric/negative amount or a
    /// window that is not a positive whole number of days.
    pub fn from_attributes(
        customer_id: Uuid,
        max_amount: Option<&str>,
        window_days: Option<&str>,
    ) -> Option<Self> {
        let max_amount = parse_spend_amount(max_amount?)?;
        let window_days = parse_window_days(window_days?)?;
        Some(Self {
            customer_id,
            max_amount,
            window_days,
        })
    }
}

/// Spend limit fields as shown on the customer's admin profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendLimitProfile {
    pub customer_id: Uuid,
    /// Stored text, empty when unset.
    pub maximum_spend_amount: String,
    /// Stored period, zero when unset or unreadable.
    pub spend_limit_period: i64,
    /// Whether the stored values activate enforcement.
    pub active: bool,
}

impl SpendLimitProfile {
    pub fn from_attributes(
        customer_id: Uuid,
        max_amount: Option<String>,
        window_days: Option<String>,
    ) -> Self {
        let active = SpendCapConfig::from_attributes(
            customer_id,
            max_amount.as_deref(),
            window_days.as_deref(),
        )
        .is_some();

        Self {
            customer_id,
            maximum_spend_amount: max_amount.unwrap_or_default(),
            spend_limit_period: window_days
                .and_then(|d| d.trim().parse::<i64>().ok())
                .unwrap_or(0),
            active,
        }
    }
}

/// Request to update a customer's spend limit fields.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpendLimitRequest {
    /// Empty string clears the cap.
    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_spend_amount"))]
    pub maximum_spend_amount: String,

    /// Zero disables the cap.
    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_window_days"))]
    pub spend_limit_period: i64,
}

impl UpdateSpendLimitRequest {
    /// Attribute values to persist, normalized the way they are stored.
    pub fn attribute_values(&self) -> [(&'static str, String); 2] {
        [
            (
                MAXIMUM_SPEND_AMOUNT_KEY,
                self.maximum_spend_amount.trim().to_string(),
            ),
            (SPEND_LIMIT_PERIOD_KEY, self.spend_limit_period.to_string()),
        ]
    }
}
