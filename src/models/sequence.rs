//! Sequence counter model: one row per (tenant, document type, period).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A counter row. `last_no` is the highest running number issued for the
/// key; allocation increments it atomically.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SequenceCounter {
    pub tenant_id: String,
    pub document_type: String,
    pub period_prefix: String,
    pub last_no: i64,
    pub updated_at: DateTime<Utc>,
}

/// The result of one allocation. `no` is the number issued to this caller
/// (1-based per period); `last_no` is the number issued before it, which is
/// what the renderer's running substitution consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub no: i64,
    pub last_no: i64,
}
