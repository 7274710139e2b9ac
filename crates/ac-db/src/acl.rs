use ac_auth::Claims;
use sqlx::{QueryBuilder, Sqlite};

/// Appends the tenant ACL predicate to a membership query:
///
/// 1. Claims with neither an audience nor a subject are an internal,
///    system-initiated call and apply no restriction.
/// 2. Otherwise rows are restricted to the caller's active tenant OR the
///    caller's own membership rows (logical OR).
///
/// Archived-row exclusion is handled by the repository's base query; this
/// filter only scopes visibility. The base query must already carry a WHERE
/// clause.
pub fn apply_claims_filter(query: &mut QueryBuilder<'_, Sqlite>, claims: &Claims) {
    if claims.aud.is_empty() && claims.sub.is_empty() {
        return;
    }

    query.push(" AND (");
    let mut restricted = false;
    if !claims.aud.is_empty() {
        query.push("account_id = ");
        query.push_bind(claims.aud.clone());
        restricted = true;
    }
    if !claims.sub.is_empty() {
        if restricted {
            query.push(" OR ");
        }
        query.push("user_id = ");
        query.push_bind(claims.sub.clone());
    }
    query.push(")");
}
