//! HTTP middleware components.

pub mod auth;
pub mod logging;
pub mod metrics;
pub mod trace_id;

pub use auth::{require_admin, require_auth};
pub use metrics::{init_metrics, metrics_handler, metrics_middleware, record_spend_evaluation};
pub use trace_id::{trace_id, RequestId, REQUEST_ID_HEADER};
