//! Sequence allocator: atomic per-period running number issuance.
//!
//! This is the only place concurrent generations contend. All contention is
//! funneled into a single upsert-increment on the counter row and resolved
//! by the storage engine's row-level atomicity. No application locking, and
//! no in-process copy of `last_no` is ever kept between calls.

use std::time::Duration;

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::sequence::Allocation;
use crate::pattern::render::fits_width;

/// Retry budget for transient storage failures. The increment itself is
/// idempotent to retry only because each attempt is its own statement, not
/// part of a larger transaction.
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 50;

/// Issue the next running number for `(tenant, document type, period)`.
///
/// Numbers start at 1 per period and increase monotonically; no two callers
/// ever receive the same number for the same key. A number that does not fit
/// in `width` digits fails with `SequenceOverflow`; by then the counter has
/// moved, leaving a gap, which the model accepts (a cancelled caller leaks
/// its number the same way).
pub async fn allocate(
    pool: &PgPool,
    tenant_id: &str,
    document_type: &str,
    period_prefix: &str,
    width: u32,
) -> Result<Allocation, AppError> {
    let mut attempt = 0u32;

    let no: i64 = loop {
        match try_increment(pool, tenant_id, document_type, period_prefix).await {
            Ok(no) => break no,
            Err(e) if is_transient(&e) && attempt + 1 < MAX_ATTEMPTS => {
                attempt += 1;
                tracing::warn!(
                    tenant_id,
                    document_type,
                    period_prefix,
                    attempt,
                    error = %e,
                    "transient failure incrementing sequence counter, retrying"
                );
                tokio::time::sleep(Duration::from_millis(BACKOFF_BASE_MS << attempt)).await;
            }
            Err(e) if is_transient(&e) => {
                return Err(AppError::PersistenceUnavailable(e.to_string()));
            }
            Err(e) => return Err(AppError::Database(e)),
        }
    };

    if !fits_width(no, width) {
        return Err(AppError::SequenceOverflow { no, width });
    }

    Ok(Allocation { no, last_no: no - 1 })
}

/// Single-statement atomic increment-and-read; creates the counter row on
/// first use of a period.
async fn try_increment(
    pool: &PgPool,
    tenant_id: &str,
    document_type: &str,
    period_prefix: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO sequence_counters (tenant_id, document_type, period_prefix, last_no)
        VALUES ($1, $2, $3, 1)
        ON CONFLICT (tenant_id, document_type, period_prefix)
        DO UPDATE SET last_no = sequence_counters.last_no + 1, updated_at = NOW()
        RETURNING last_no
        "#,
    )
    .bind(tenant_id)
    .bind(document_type)
    .bind(period_prefix)
    .fetch_one(pool)
    .await
}

/// Failures worth retrying: the statement never reached the database or the
/// pool could not hand out a connection. Anything else (constraint errors,
/// decode errors) is deterministic and surfaces immediately.
fn is_transient(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_transient() {
        assert!(is_transient(&sqlx::Error::PoolTimedOut));
        assert!(is_transient(&sqlx::Error::PoolClosed));
    }

    #[test]
    fn row_not_found_is_not_transient() {
        assert!(!is_transient(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn allocation_exposes_predecessor() {
        let allocation = Allocation { no: 42, last_no: 41 };
        assert_eq!(allocation.no, allocation.last_no + 1);
    }
}
