//! Role guards for admin handlers.
//!
//! `auth_middleware` puts the `AuthenticatedUser` into request extensions;
//! guards read it back and check roles.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for directory management.
///
/// Only allows users with the "admin" role.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(user: Option<AuthenticatedUser>) -> Parts {
        let mut req = Request::builder().uri("/").body(()).unwrap();
        if let Some(user) = user {
            req.extensions_mut().insert(user);
        }
        req.into_parts().0
    }

    fn user(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "editor-1".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_require_admin_without_user() {
        let mut parts = parts_with(None);
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_require_admin_wrong_role() {
        let mut parts = parts_with(Some(user(&["viewer"])));
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_require_admin_ok() {
        let mut parts = parts_with(Some(user(&["viewer", "admin"])));
        let RequireAdmin(found) = RequireAdmin::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(found.sub, "editor-1");
    }
}
