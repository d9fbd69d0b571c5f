//! Producer payload validation.
//!
//! Everything here runs before storage is touched: a request that fails
//! validation never reaches the chain, and a request that passes is
//! guaranteed to canonicalize again at hash time.

use custos_canonical::canonicalize;
use custos_contracts::{AppendRequest, AuditError, AuditResult, TenantId};

/// Check `request` for the given tenant.
///
/// Rejects empty identifying fields and metadata/diff values the
/// canonical encoder cannot handle.  All failures surface as
/// `AuditError::Validation`.
pub(crate) fn validate(tenant: &TenantId, request: &AppendRequest) -> AuditResult<()> {
    require_non_empty("tenant_id", tenant.as_str())?;
    require_non_empty("actor", request.actor.as_str())?;
    require_non_empty("action", &request.action)?;
    require_non_empty("entity_type", &request.entity_type)?;
    require_non_empty("entity_id", &request.entity_id)?;

    require_canonicalizable("metadata", &request.metadata)?;
    require_canonicalizable("diff", &request.diff)?;

    Ok(())
}

fn require_non_empty(field: &str, value: &str) -> AuditResult<()> {
    if value.trim().is_empty() {
        return Err(AuditError::Validation {
            reason: format!("{field} must not be empty"),
        });
    }
    Ok(())
}

fn require_canonicalizable(field: &str, value: &serde_json::Value) -> AuditResult<()> {
    canonicalize(value).map_err(|e| AuditError::Validation {
        reason: format!("{field} is not canonicalizable: {e}"),
    })?;
    Ok(())
}
