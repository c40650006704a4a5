use super::{AuthError, Claims};
use log::warn;
use std::future::Future;

/// Requires a permission string in the verified claim set before running a
/// guarded operation
#[derive(Debug, Clone, Copy)]
pub struct PermissionGate {
    permission: &'static str,
}

impl PermissionGate {
    pub const fn new(permission: &'static str) -> Self {
        Self { permission }
    }

    /// Check the claim set without running anything
    pub fn check(&self, claims: &Claims) -> Result<(), AuthError> {
        let Some(permissions) = &claims.permissions else {
            warn!("Token for {:?} carries no permissions", claims.sub);
            return Err(AuthError::invalid_claims("Permissions not included in JWT."));
        };
        if !permissions.iter().any(|p| p == self.permission) {
            warn!(
                "Token for {:?} lacks permission '{}'",
                claims.sub, self.permission
            );
            return Err(AuthError::Unauthorized("Permission not found.".to_string()));
        }
        Ok(())
    }

    /// Run `operation` with the claim set once the permission check passes
    pub async fn run<F, Fut, T, E>(&self, claims: Claims, operation: F) -> Result<T, E>
    where
        F: FnOnce(Claims) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<AuthError>,
    {
        self.check(&claims)?;
        operation(claims).await
    }
}
