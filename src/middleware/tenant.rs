//! Tenant context extractor for Axum handlers.
//!
//! Identity travels with each request as an immutable value and is threaded
//! through service calls as an explicit parameter. It is never stored on a
//! shared, long-lived object: two concurrent requests for different tenants
//! must not be able to observe each other's context.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;

/// Per-request tenant identity, resolved by upstream gateway middleware and
/// forwarded in headers.
///
/// Use as an Axum extractor in handlers that act on tenant data:
/// ```ignore
/// async fn handler(ctx: TenantContext) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct TenantContext {
    /// Business-unit code the request operates under.
    pub tenant_id: String,
    /// Acting user, recorded on created/updated rows.
    pub user_id: String,
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = required_header(parts, "X-Tenant-Id")?;
        let user_id = required_header(parts, "X-User-Id")?;

        Ok(TenantContext { tenant_id, user_id })
    }
}

fn required_header(parts: &Parts, name: &str) -> Result<String, AppError> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Validation(format!("missing {name} header")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<TenantContext, AppError> {
        let (mut parts, _) = request.into_parts();
        TenantContext::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn extracts_tenant_and_user() {
        let request = Request::builder()
            .header("X-Tenant-Id", "A01")
            .header("X-User-Id", "u-123")
            .body(())
            .unwrap();

        let ctx = extract(request).await.unwrap();
        assert_eq!(ctx.tenant_id, "A01");
        assert_eq!(ctx.user_id, "u-123");
    }

    #[tokio::test]
    async fn missing_tenant_header_rejected() {
        let request = Request::builder()
            .header("X-User-Id", "u-123")
            .body(())
            .unwrap();

        let err = extract(request).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("X-Tenant-Id"));
    }

    #[tokio::test]
    async fn blank_header_rejected() {
        let request = Request::builder()
            .header("X-Tenant-Id", "  ")
            .header("X-User-Id", "u-123")
            .body(())
            .unwrap();

        assert!(extract(request).await.is_err());
    }
}
