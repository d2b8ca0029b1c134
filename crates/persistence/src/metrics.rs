//! Database metrics.
//!
//! Query latency goes to `database_query_duration_seconds{query, outcome}`;
//! failed queries are also counted in `database_query_errors_total{query}`.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Snapshot the pool's connection gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = u32::try_from(pool.num_idle()).unwrap_or(u32::MAX);

    gauge!("database_connections_total").set(f64::from(size));
    gauge!("database_connections_idle").set(f64::from(idle));
    gauge!("database_connections_active").set(f64::from(size.saturating_sub(idle)));
}

/// Times one named query.
///
/// ```ignore
/// let timer = QueryTimer::new("find_customer_orders_since");
/// let result = sqlx::query_as::<_, OrderEntity>(...).fetch_all(&pool).await;
/// timer.finish(&result);
/// result
/// ```
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    /// Records latency labelled with the query's outcome and returns it in seconds.
    pub fn finish<T, E>(self, result: &Result<T, E>) -> f64 {
        let elapsed = self.start.elapsed().as_secs_f64();
        let outcome = if result.is_ok() { "ok" } else { "error" };

        histogram!(
            "database_query_duration_seconds",
            "query" => self.query,
            "outcome" => outcome
        )
        .record(elapsed);

        if result.is_err() {
            counter!("database_query_errors_total", "query" => self.query).increment(1);
        }
        elapsed
    }
}
