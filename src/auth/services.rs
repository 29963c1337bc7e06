use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use super::{
    dto::{LoginData, LoginRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::UserStore,
    repo_types::{NewUser, Role, User},
};
use crate::error::{required, ApiError};

const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex compiles");
    }
    EMAIL_RE.is_match(email)
}

pub async fn register_user(users: &dyn UserStore, req: RegisterRequest) -> Result<User, ApiError> {
    let name = required(req.name, "Name is required")?;
    let email = required(req.email, "Email is required")?.to_lowercase();
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("Password is required"))?;

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::validation("Invalid email format"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }

    // Ensure email is not taken; the unique index still guards concurrent inserts.
    if users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::validation("User already exists"));
    }

    let password_hash = hash_password(&password).map_err(ApiError::internal)?;
    let user = users
        .create(NewUser {
            name,
            email,
            password_hash,
            role: Role::Farmer,
            location: req.location.filter(|s| !s.trim().is_empty()),
            soil_type: req.soil_type.filter(|s| !s.trim().is_empty()),
            farm_size: req.farm_size,
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

pub async fn login_user(
    keys: &JwtKeys,
    users: &dyn UserStore,
    req: LoginRequest,
) -> Result<LoginData, ApiError> {
    let email = required(req.email, "Email is required")?.to_lowercase();
    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("Password is required"))?;

    let found = users.find_by_email(&email).await?;
    let stored = found.as_ref().map(|u| u.password_hash.as_str());
    let ok = verify_password(&password, stored).map_err(|e| {
        error!(error = %e, email = %email, "stored hash unreadable");
        ApiError::internal(e)
    })?;

    let user = match found {
        Some(user) if ok => user,
        Some(user) => {
            warn!(user_id = %user.id, "login invalid password");
            return Err(ApiError::auth("Invalid credentials"));
        }
        None => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::auth("Invalid credentials"));
        }
    };

    let token = keys.sign(user.id, user.role).map_err(ApiError::internal)?;
    info!(user_id = %user.id, "user logged in");
    Ok(LoginData { token, user })
}

/// Resolves a bearer token to the user it names.
pub async fn authenticate(
    keys: &JwtKeys,
    users: &dyn UserStore,
    token: &str,
) -> Result<User, ApiError> {
    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        ApiError::auth("Not authorized, token failed")
    })?;

    users.find_by_id(claims.sub).await?.ok_or_else(|| {
        warn!(user_id = %claims.sub, "token for unknown user");
        ApiError::auth("Not authorized, user not found")
    })
}
