//! Admin routes for a customer's spend limit profile fields.

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::errors::SpendLimitError;
use domain::models::{
    SpendLimitProfile, UpdateSpendLimitRequest, MAXIMUM_SPEND_AMOUNT_KEY, SPEND_LIMIT_PERIOD_KEY,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::api_key::ApiKeyAuth;

/// GET /api/v1/admin/customers/:customer_id/spend-limit
///
/// Returns the stored fields as they appear on the customer's profile.
pub async fn get_spend_limit(
    State(state): State<AppState>,
    Extension(_auth): Extension<ApiKeyAuth>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<SpendLimitProfile>, ApiError> {
    let max_amount = state
        .attributes
        .get_attribute(customer_id, MAXIMUM_SPEND_AMOUNT_KEY)
        .await
        .map_err(SpendLimitError::AttributeStore)?;
    let window_days = state
        .attributes
        .get_attribute(customer_id, SPEND_LIMIT_PERIOD_KEY)
        .await
        .map_err(SpendLimitError::AttributeStore)?;

    Ok(Json(SpendLimitProfile::from_attributes(
        customer_id,
        max_amount,
        window_days,
    )))
}

/// PUT /api/v1/admin/customers/:customer_id/spend-limit
///
/// Empty amount or a zero period disables the cap.
pub async fn update_spend_limit(
    State(state): State<AppState>,
    Extension(auth): Extension<ApiKeyAuth>,
    Path(customer_id): Path<Uuid>,
    Json(request): Json<UpdateSpendLimitRequest>,
) -> Result<Json<SpendLimitProfile>, ApiError> {
    request.validate()?;

    let [amount, period] = request.attribute_values();
    state
        .attributes
        .set_attributes(customer_id, &[amount.clone(), period.clone()])
        .await
        .map_err(SpendLimitError::AttributeStore)?;

    let profile = SpendLimitProfile::from_attributes(customer_id, Some(amount.1), Some(period.1));

    info!(
        admin_key_id = auth.api_key_id,
        admin_key_prefix = %auth.key_prefix,
        customer_id = %customer_id,
        maximum_spend_amount = %profile.maximum_spend_amount,
        spend_limit_period = profile.spend_limit_period,
        active = profile.active,
        "Admin updated customer spend limit"
    );

    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use domain::services::{InMemoryAttributeStore, InMemoryOrderStore, UserAttributeStore};

    use crate::routes::test_support::{admin_auth, state_with};

    fn update(amount: &str, period: i64) -> Json<UpdateSpendLimitRequest> {
        Json(UpdateSpendLimitRequest {
            maximum_spend_amount: amount.to_string(),
            spend_limit_period: period,
        })
    }

    #[tokio::test]
    async fn test_get_unset_profile() {
        let state = state_with(
            Arc::new(InMemoryAttributeStore::new()),
            Arc::new(InMemoryOrderStore::new()),
            &[],
        );
        let customer_id = Uuid::new_v4();

        let Json(profile) = get_spend_limit(State(state), Extension(admin_auth()), Path(customer_id))
            .await
            .unwrap();

        assert_eq!(profile.customer_id, customer_id);
        assert_eq!(profile.maximum_spend_amount, "");
        assert_eq!(profile.spend_limit_period, 0);
        assert!(!profile.active);
    }

    #[tokio::test]
    async fn test_update_then_get_round_trip() {
        let attributes = Arc::new(InMemoryAttributeStore::new());
        let state = state_with(attributes.clone(), Arc::new(InMemoryOrderStore::new()), &[]);
        let customer_id = Uuid::new_v4();

        let Json(updated) = update_spend_limit(
            State(state.clone()),
            Extension(admin_auth()),
            Path(customer_id),
            update(" 750.00 ", 30),
        )
        .await
        .unwrap();
        assert!(updated.active);
        assert_eq!(updated.maximum_spend_amount, "750.00");

        assert_eq!(
            attributes
                .get_attribute(customer_id, MAXIMUM_SPEND_AMOUNT_KEY)
                .await
                .unwrap()
                .as_deref(),
            Some("750.00")
        );

        let Json(profile) = get_spend_limit(State(state), Extension(admin_auth()), Path(customer_id))
            .await
            .unwrap();
        assert_eq!(profile.spend_limit_period, 30);
        assert!(profile.active);
    }

    #[tokio::test]
    async fn test_clearing_disables_cap() {
        let customer_id = Uuid::new_v4();
        let attributes = Arc::new(
            InMemoryAttributeStore::new()
                .with_attribute(customer_id, MAXIMUM_SPEND_AMOUNT_KEY, "100")
                .with_attribute(customer_id, SPEND_LIMIT_PERIOD_KEY, "7"),
        );
        let state = state_with(attributes, Arc::new(InMemoryOrderStore::new()), &[]);

        let Json(profile) = update_spend_limit(
            State(state),
            Extension(admin_auth()),
            Path(customer_id),
            update("", 0),
        )
        .await
        .unwrap();

        assert!(!profile.active);
        assert_eq!(profile.maximum_spend_amount, "");
    }

    #[tokio::test]
    async fn test_update_rejects_malformed_amount() {
        let attributes = Arc::new(InMemoryAttributeStore::new());
        let state = state_with(attributes.clone(), Arc::new(InMemoryOrderStore::new()), &[]);
        let customer_id = Uuid::new_v4();

        let err = update_spend_limit(
            State(state),
            Extension(admin_auth()),
            Path(customer_id),
            update("-5", 7),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(attributes
            .get_attribute(customer_id, MAXIMUM_SPEND_AMOUNT_KEY)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_period_out_of_range() {
        let state = state_with(
            Arc::new(InMemoryAttributeStore::new()),
            Arc::new(InMemoryOrderStore::new()),
            &[],
        );

        let err = update_spend_limit(
            State(state),
            Extension(admin_auth()),
            Path(Uuid::new_v4()),
            update("100", 3651),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_failure_is_unavailable() {
        let state = state_with(
            Arc::new(InMemoryAttributeStore::failing()),
            Arc::new(InMemoryOrderStore::new()),
            &[],
        );

        let err = get_spend_limit(State(state), Extension(admin_auth()), Path(Uuid::new_v4()))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }
}
