//! Authorization gate: role resolution, page permissions, ownership checks and login.

use crate::models::{Account, Page, PermissionSet, ResourceOwner, Role, User};
use thiserror::Error;

/// Why a login attempt was refused. Each case has its own user-facing message.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum LoginError {
    #[error("Username and password are required")]
    MissingCredentials,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Invalid username or role")]
    RoleMismatch,
    #[error("Your account has been deactivated. Please contact admin.")]
    AccountInactive,
}

/// Outcome of a page guard. Denial is a value, not an error: callers render "Access Denied".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Access {
    Granted,
    LoginRequired,
    Denied,
}

pub fn resolve_role(user: &User) -> Role {
    user.role
}

/// Permissions as they actually apply: admins get everything regardless of stored flags,
/// coaches get their stored flags (all false when none are stored).
pub fn effective_permissions(user: &User, stored: Option<&PermissionSet>) -> PermissionSet {
    match resolve_role(user) {
        Role::Admin => PermissionSet::all(),
        Role::Coach => stored.copied().unwrap_or_default(),
    }
}

pub fn check_permission(user: Option<&User>, stored: Option<&PermissionSet>, page: Page) -> bool {
    match user {
        Some(u) => effective_permissions(u, stored).get(page),
        None => false,
    }
}

pub fn page_access(user: Option<&User>, stored: Option<&PermissionSet>, page: Page) -> Access {
    match user {
        None => Access::LoginRequired,
        Some(_) if check_permission(user, stored, page) => Access::Granted,
        Some(_) => Access::Denied,
    }
}

/// May `user` mutate a resource owned by `owner`?
///
/// Admins always may. A coach may when they are the owning coach, or when the resource
/// belongs to the coach's own team.
pub fn authorize_mutation(user: Option<&User>, owner: &ResourceOwner) -> bool {
    let Some(user) = user else {
        return false;
    };
    match resolve_role(user) {
        Role::Admin => true,
        Role::Coach => {
            owner.coach_id == Some(user.id)
                || (owner.team_id.is_some() && owner.team_id == user.team_id)
        }
    }
}

/// Like [`authorize_mutation`], but passes when any of several owners matches.
pub fn authorize_any(user: Option<&User>, owners: &[ResourceOwner]) -> bool {
    owners.iter().any(|o| authorize_mutation(user, o))
}

pub fn is_admin(user: &User) -> bool {
    resolve_role(user) == Role::Admin
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

fn password_matches(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Validate credentials against the coach table, then the admin table. The first account whose
/// username and password both match wins. Inactive accounts are refused even with the right
/// password. When `requested_role` is given it must match the account's role.
pub fn login(
    coaches: &[Account],
    admins: &[Account],
    username: &str,
    password: &str,
    requested_role: Option<Role>,
) -> Result<User, LoginError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(LoginError::MissingCredentials);
    }

    let candidates = coaches
        .iter()
        .map(|a| (a, Role::Coach))
        .chain(admins.iter().map(|a| (a, Role::Admin)));

    for (account, role) in candidates {
        if account.username != username || !password_matches(password, &account.password_hash) {
            continue;
        }
        if !account.is_active {
            log::warn!("Login refused for inactive {} account '{}'", role, username);
            return Err(LoginError::AccountInactive);
        }
        if requested_role.is_some_and(|r| r != role) {
            log::warn!("Login for '{}' asked for the wrong role", username);
            return Err(LoginError::RoleMismatch);
        }
        log::info!("{} '{}' logged in", role, username);
        return Ok(account.to_user(role));
    }

    log::warn!("Failed login for '{}'", username);
    Err(LoginError::InvalidCredentials)
}
