//! Storefront routes: the checkout decision and the raw spend evaluation.

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use domain::errors::SpendLimitError;
use domain::services::{CheckoutDecision, Evaluation};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::api_key::ApiKeyAuth;
use crate::middleware::record_spend_evaluation;

/// Optional fixed evaluation instant.
#[derive(Debug, Default, Deserialize)]
pub struct EvaluateAtQuery {
    /// RFC 3339 timestamp; defaults to now.
    pub at: Option<DateTime<Utc>>,
}

async fn evaluate(
    state: &AppState,
    customer_id: Uuid,
    at: Option<DateTime<Utc>>,
) -> Result<Evaluation, SpendLimitError> {
    let now = at.unwrap_or_else(Utc::now);
    let result = state.evaluator.evaluate(customer_id, now).await;
    record_spend_evaluation(&result);
    result
}

/// GET /api/v1/customers/:customer_id/checkout-decision
///
/// Never fails on collaborator errors; the configured failure policy decides.
pub async fn get_checkout_decision(
    State(state): State<AppState>,
    Extension(auth): Extension<ApiKeyAuth>,
    Path(customer_id): Path<Uuid>,
    Query(query): Query<EvaluateAtQuery>,
) -> Json<CheckoutDecision> {
    let decision = match evaluate(&state, customer_id, query.at).await {
        Ok(evaluation) => CheckoutDecision::from_evaluation(&evaluation, &state.price_format),
        Err(err) => {
            let policy = state.config.spend_limit.on_query_failure;
            warn!(
                api_key_id = auth.api_key_id,
                key_prefix = %auth.key_prefix,
                customer_id = %customer_id,
                error = %err,
                policy = ?policy,
                "Spend cap could not be evaluated at checkout"
            );
            CheckoutDecision::on_failure(policy)
        }
    };

    Json(decision)
}

/// GET /api/v1/customers/:customer_id/spend-evaluation
pub async fn get_spend_evaluation(
    State(state): State<AppState>,
    Extension(_auth): Extension<ApiKeyAuth>,
    Path(customer_id): Path<Uuid>,
    Query(query): Query<EvaluateAtQuery>,
) -> Result<Json<Evaluation>, ApiError> {
    let evaluation = evaluate(&state, customer_id, query.at).await?;
    Ok(Json(evaluation))
}
