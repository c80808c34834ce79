pub mod cart_repo;
pub mod catalog_repo;
pub mod jwt;
pub mod memory;
pub mod models;
pub mod order_repo;

use diesel::pg::PgConnection;
use diesel::sql_types::Text;
use diesel::RunQueryDsl;
use uuid::Uuid;

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

/// Serialises writers of one shopper's cart across every service instance for
/// the rest of the surrounding transaction.
pub(crate) fn lock_shopper(conn: &mut PgConnection, shopper_id: Uuid) -> Result<(), DomainError> {
    diesel::sql_query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind::<Text, _>(shopper_id.to_string())
        .execute(conn)?;
    Ok(())
}
