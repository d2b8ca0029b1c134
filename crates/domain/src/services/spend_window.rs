//! Rolling spend window evaluator.
//!
//! Decides whether a customer's spend over the last `window_days` calendar
//! days has reached their configured cap. Each evaluation is computed fresh
//! from the attribute store and the order history; nothing is persisted.
//!
//! Calendar arithmetic is done in the store's time zone so that the window
//! boundary matches what the order query sees across DST transitions.

use std::sync::Arc;

use chrono::{DateTime, Days, Duration, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::SpendLimitError;
use crate::models::{
    OrderRecord, SpendCapConfig, MAXIMUM_SPEND_AMOUNT_KEY, QUALIFYING_STATUSES,
    SPEND_LIMIT_PERIOD_KEY,
};
use crate::services::attributes::UserAttributeStore;
use crate::services::orders::OrderQuery;

const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Time left until a window resets, in whole days plus whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRemaining {
    pub days: i64,
    /// Always below 24.
    pub hours: i64,
}

impl TimeRemaining {
    /// Decomposes `until - now`, clamped to zero.
    pub fn between(now: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        let seconds = (until - now).num_seconds().max(0);
        Self {
            days: seconds / SECONDS_PER_DAY,
            hours: (seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
        }
    }

    pub fn total_hours(&self) -> i64 {
        self.days * 24 + self.hours
    }
}

/// Outcome of evaluating one customer's spend window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub customer_id: Uuid,
    pub is_over_limit: bool,
    pub total_spent: Decimal,
    pub limit: Decimal,
    pub window_days: u32,
    pub window_start: DateTime<Utc>,
    /// `window_start` shifted forward by `window_days` calendar days.
    pub reset_at: DateTime<Utc>,
    pub remaining: TimeRemaining,
    pub qualifying_orders: usize,
    /// When the oldest counted order leaves the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_order_expires_at: Option<DateTime<Utc>>,
}

/// Either no cap applies, or a cap was evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    Inactive,
    Evaluated(EvaluationResult),
}

impl Evaluation {
    pub fn is_over_limit(&self) -> bool {
        matches!(self, Evaluation::Evaluated(result) if result.is_over_limit)
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        match self {
            Evaluation::Inactive => None,
            Evaluation::Evaluated(result) => Some(result),
        }
    }

    /// Label used for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            Evaluation::Inactive => "inactive",
            Evaluation::Evaluated(result) if result.is_over_limit => "over_limit",
            Evaluation::Evaluated(_) => "within_limit",
        }
    }
}

/// Shifts `at` by `days` calendar days in `tz`.
///
/// Falls back to a fixed 24h-per-day offset when the shifted local time is
/// skipped or repeated by a DST transition. `None` when the result is outside
/// the representable date range.
pub fn shift_days(at: DateTime<Utc>, days: i64, tz: Tz) -> Option<DateTime<Utc>> {
    let local = at.with_timezone(&tz);
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        local.checked_add_days(magnitude)
    } else {
        local.checked_sub_days(magnitude)
    };
    match shifted {
        Some(shifted) => Some(shifted.with_timezone(&Utc)),
        None => Duration::try_days(days).and_then(|offset| at.checked_add_signed(offset)),
    }
}

/// Start of the rolling window ending at `now`.
pub fn calendar_window_start(now: DateTime<Utc>, window_days: u32, tz: Tz) -> Option<DateTime<Utc>> {
    shift_days(now, -i64::from(window_days), tz)
}

/// Sums the orders that fall inside the window and compares against the cap.
///
/// The order list is re-checked here; orders before `window_start` or in a
/// non-qualifying status never count. `None` when the reset instant cannot be
/// represented.
pub fn summarize(
    config: &SpendCapConfig,
    window_start: DateTime<Utc>,
    now: DateTime<Utc>,
    tz: Tz,
    orders: &[OrderRecord],
) -> Option<EvaluationResult> {
    let qualifying: Vec<&OrderRecord> = orders
        .iter()
        .filter(|order| order.created_at >= window_start && order.status.counts_toward_spend())
        .collect();

    let total_spent: Decimal = qualifying.iter().map(|order| order.total).sum();
    let window = i64::from(config.window_days);
    let reset_at = shift_days(window_start, window, tz)?;

    let oldest_order_expires_at = qualifying
        .iter()
        .map(|order| order.created_at)
        .min()
        .and_then(|oldest| shift_days(oldest, window, tz));

    Some(EvaluationResult {
        customer_id: config.customer_id,
        is_over_limit: total_spent >= config.max_amount,
        total_spent,
        limit: config.max_amount,
        window_days: config.window_days,
        window_start,
        reset_at,
        remaining: TimeRemaining::between(now, reset_at),
        qualifying_orders: qualifying.len(),
        oldest_order_expires_at,
    })
}

/// Evaluates spend caps against the attribute store and order history.
/// Evaluates spend caps against the attribute store and order history.
#[derive(Clone)]
pub struct SpendWindowEvaluator {
    attributes: Arc<dyn UserAttributeStore>,
    orders: Arc<dyn OrderQuery>,
    timezone: Tz,
}

impl SpendWindowEvaluator {
    /// Create an evaluator doing calendar arithmetic in UTC.
    pub fn new(attributes: Arc<dyn UserAttributeStore>, orders: Arc<dyn OrderQuery>) -> Self {
        Self {
            attributes,
            orders,
            timezone: Tz::UTC,
        }
    }

    /// Use the store's local time zone for calendar arithmetic.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Reads the customer's cap configuration; `None` when no cap applies.
    pub async fn load_config(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<SpendCapConfig>, SpendLimitError> {
        let max_amount = self
            .attributes
            .get_attribute(customer_id, MAXIMUM_SPEND_AMOUNT_KEY)
            .await
            .map_err(SpendLimitError::AttributeStore)?;
        let window_days = self
            .attributes
            .get_attribute(customer_id, SPEND_LIMIT_PERIOD_KEY)
            .await
            .map_err(SpendLimitError::AttributeStore)?;

        Ok(SpendCapConfig::from_attributes(
            customer_id,
            max_amount.as_deref(),
            window_days.as_deref(),
        ))
    }

    /// Evaluates the customer's spend window as of `now`.
    pub async fn evaluate(
        &self,
        customer_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Evaluation, SpendLimitError> {
        let Some(config) = self.load_config(customer_id).await? else {
            debug!(customer_id = %customer_id, "No spend cap configured");
            return Ok(Evaluation::Inactive);
        };

        let evaluation = self.evaluate_config(&config, now).await?;
        match &evaluation {
            Evaluation::Evaluated(result) if result.is_over_limit => info!(
                customer_id = %customer_id,
                total_spent = %result.total_spent,
                limit = %result.limit,
                window_days = result.window_days,
                "Customer reached spend cap"
            ),
            Evaluation::Evaluated(result) => debug!(
                customer_id = %customer_id,
                total_spent = %result.total_spent,
                limit = %result.limit,
                "Customer within spend cap"
            ),
            Evaluation::Inactive => {}
        }
        Ok(evaluation)
    }

    /// Evaluates an already loaded configuration as of `now`.
    ///
    /// A window reaching outside the representable date range is treated as
    /// malformed configuration: `Inactive`, without querying orders.
    pub async fn evaluate_config(
        &self,
        config: &SpendCapConfig,
        now: DateTime<Utc>,
    ) -> Result<Evaluation, SpendLimitError> {
        let Some(window_start) = calendar_window_start(now, config.window_days, self.timezone)
        else {
            warn!(
                customer_id = %config.customer_id,
                window_days = config.window_days,
                "Spend limit period out of range, treating cap as unset"
            );
            return Ok(Evaluation::Inactive);
        };

        let orders = self
            .orders
            .orders_since(config.customer_id, window_start, &QUALIFYING_STATUSES)
            .await
            .map_err(SpendLimitError::OrderQuery)?;

        match summarize(config, window_start, now, self.timezone, &orders) {
            Some(result) => Ok(Evaluation::Evaluated(result)),
            None => {
                warn!(
                    customer_id = %config.customer_id,
                    window_days = config.window_days,
                    "Spend window reset out of range, treating cap as unset"
                );
                Ok(Evaluation::Inactive)
            }
        }
    }
}
