//! Role-based access control for route groups.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::CurrentUser;
use super::error::{ApiError, ErrorCode};
use crate::db::Role;

/// Static set of roles admitted by a route group
#[derive(Debug, Clone, Copy)]
pub struct AllowedRoles(pub &'static [Role]);

pub const STAFF: AllowedRoles = AllowedRoles(&[Role::Admin, Role::Receptionist]);
pub const ADMIN_ONLY: AllowedRoles = AllowedRoles(&[Role::Admin]);

/// Decide whether the caller's role is admitted.
///
/// `role` is the raw stored value so the denial message can echo it.
pub fn check_role(role: &str, allowed: &[Role]) -> Result<(), ApiError> {
    let parsed: Option<Role> = role.parse().ok();
    match parsed {
        None => Err(ApiError::role_denied(
            ErrorCode::Unauthorized,
            "Unauthorized: User role not found",
            allowed,
        )),
        Some(r) if !allowed.contains(&r) => Err(ApiError::role_denied(
            ErrorCode::Forbidden,
            format!("Access denied: Role '{}' is not allowed", r),
            allowed,
        )),
        Some(_) => Ok(()),
    }
}

/// Middleware admitting only callers whose role is in the configured set.
/// Must run inside `auth_middleware`.
pub async fn require_roles(
    State(allowed): State<AllowedRoles>,
    current: CurrentUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(err) = check_role(&current.role, allowed.0) {
        tracing::debug!(user_id = %current.id, role = %current.role, "Role gate denied request");
        return Err(err);
    }
    Ok(next.run(request).await)
}
