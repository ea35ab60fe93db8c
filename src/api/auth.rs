use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

use super::error::{is_unique_violation, ApiError};
use super::form::ApiJson;
use super::token::TOKEN_COOKIE;
use super::validation::{validate_email, validate_text};
use crate::db::{
    AuthResponse, CurrentUserResponse, DbPool, GoogleLoginRequest, LoginRequest, MessageResponse,
    RegisterRequest, Role, User, UserResponse,
};
use crate::AppState;

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a random secret
fn generate_secret() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Identity attached to the request by `auth_middleware`
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Not authorized"))
    }
}

/// Resolve the `token` cookie to a user and attach it as `CurrentUser`
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Not authorized, token missing"))?;

    let user_id = state.tokens.verify(token).map_err(|e| {
        tracing::debug!("Rejected identity token: {}", e);
        ApiError::unauthorized("Not authorized")
    })?;

    let user = User::find_by_id(&state.db, &user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not found"))?;

    request.extensions_mut().insert(CurrentUser::from(user));
    Ok(next.run(request).await)
}

/// Issue a token for `user` and attach it to the jar
fn sign_in(state: &AppState, jar: CookieJar, user: &User) -> Result<CookieJar, ApiError> {
    let token = state.tokens.issue(&user.id)?;
    Ok(jar.add(state.tokens.cookie(token)))
}

/// Register endpoint
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    let (name, email, password) = match (request.name, request.email, request.password) {
        (Some(n), Some(e), Some(p)) if !n.trim().is_empty() && !e.trim().is_empty() && !p.is_empty() => {
            (n, e, p)
        }
        _ => return Err(ApiError::bad_request("Please fill in all required fields")),
    };

    let name = validate_text("Name", &name, 100).map_err(|e| ApiError::validation_field("name", e))?;
    let email = normalize_email(&email);
    validate_email(&email).map_err(|e| ApiError::validation_field("email", e))?;

    let role = match request.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(role) => role
            .parse::<Role>()
            .map_err(|e| ApiError::validation_field("role", e))?,
        None => Role::default(),
    };

    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::conflict("Email already exists."));
    }

    let password_hash = hash_password(&password)?;
    let user = User::create(&state.db, &name, &email, &password_hash, role)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict("Email already exists.")
            } else {
                ApiError::from(e)
            }
        })?;

    info!(user_id = %user.id, role = %user.role, "Registered user");

    let jar = sign_in(&state, jar, &user)?;
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "Registered successfully".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

/// Login endpoint
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let (email, password) = match (request.email, request.password) {
        (Some(e), Some(p)) if !e.trim().is_empty() && !p.is_empty() => (e, p),
        _ => return Err(ApiError::bad_request("Provide email and password")),
    };

    let user = User::find_by_email(&state.db, &normalize_email(&email))
        .await?
        .filter(|user| verify_password(&password, &user.password_hash))
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let jar = sign_in(&state, jar, &user)?;
    Ok((
        jar,
        Json(AuthResponse {
            message: "Login successful".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

/// Sign in with a Google ID token, creating a customer account on first use
pub async fn google_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(request): ApiJson<GoogleLoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let token = request
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Google token is required"))?;

    let profile = state.google.verify(token.trim()).await.map_err(|e| {
        if e.is_rejection() {
            warn!("Google login rejected: {}", e);
            ApiError::bad_request("Google login failed.")
        } else {
            tracing::error!("Google login error: {}", e);
            ApiError::internal("Google login error")
        }
    })?;

    let email = normalize_email(&profile.email);
    let user = match User::find_by_email(&state.db, &email).await? {
        Some(user) => user,
        None => {
            // Unknown random password: the account signs in through Google only
            let password_hash = hash_password(&generate_secret())?;
            let user =
                User::create(&state.db, &profile.name, &email, &password_hash, Role::Customer)
                    .await?;
            info!(user_id = %user.id, "Created user from Google login");
            user
        }
    };

    let jar = sign_in(&state, jar, &user)?;
    Ok((
        jar,
        Json(AuthResponse {
            message: "Google login successful".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

/// Logout endpoint. Overwrites the identity cookie with an expired one.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(state.tokens.clear_cookie()),
        Json(MessageResponse::new("Logged out successfully")),
    )
}

/// Current user endpoint
pub async fn me(current: CurrentUser) -> Json<CurrentUserResponse> {
    Json(CurrentUserResponse {
        user: UserResponse {
            id: current.id,
            name: current.name,
            email: current.email,
            role: current.role,
        },
    })
}

/// Create the configured admin account if it does not exist yet
pub async fn ensure_admin_user(db: &DbPool, email: &str, password: &str) -> anyhow::Result<()> {
    let email = normalize_email(email);
    if User::find_by_email(db, &email).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(password)
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {}", e))?;
    let user = User::create(db, "Administrator", &email, &password_hash, Role::Admin).await?;
    info!(user_id = %user.id, email = %email, "Created admin user");
    Ok(())
}
