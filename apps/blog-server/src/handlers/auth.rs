//! Authentication handlers: signup, login/logout sessions, and token exchange.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, http::header, web};
use serde::Deserialize;
use uuid::Uuid;

use blog_core::domain::User;
use blog_core::error::RepoError;
use blog_core::validation::{
    FormErrors, ValidationError, validate_not_empty, validate_password, validate_username,
};
use blog_shared::ApiResponse;
use blog_shared::dto::{AuthFormView, AuthResponse, CredentialsForm, TokenRequest};

use super::views;
use crate::middleware::auth::ACCESS_TOKEN_COOKIE;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const NON_FIELD_ERRORS: &str = "__all__";
const DUPLICATE_USERNAME_MESSAGE: &str = "A user with that username already exists.";
const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// GET /auth/signup/
pub async fn signup_form() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(AuthFormView::default()))
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    form: web::Form<CredentialsForm>,
) -> AppResult<HttpResponse> {
    let data = form.into_inner();
    let username = data.username.trim();

    let mut errors = FormErrors::new();
    errors.check(validate_username(username));
    errors.check(validate_password(&data.password));
    if errors.is_empty() && state.users.find_by_username(username).await?.is_some() {
        errors.push(ValidationError::new("username", DUPLICATE_USERNAME_MESSAGE));
    }
    if !errors.is_empty() {
        return Ok(rejected(&data, &errors));
    }

    let password_hash = state
        .passwords
        .hash(&data.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = match state.users.insert(User::new(username.to_string(), password_hash)).await {
        Ok(user) => user,
        Err(RepoError::Constraint(_)) => {
            let errors = FormErrors::from(ValidationError::new("username", DUPLICATE_USERNAME_MESSAGE));
            return Ok(rejected(&data, &errors));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");
    start_session(&state, user.id, &user.username, "/")
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    let view = AuthFormView {
        next: query.into_inner().next,
        ..AuthFormView::default()
    };
    HttpResponse::Ok().json(ApiResponse::ok(view))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<CredentialsForm>,
) -> AppResult<HttpResponse> {
    let data = form.into_inner();

    let mut errors = FormErrors::new();
    errors.check(validate_not_empty("username", &data.username));
    errors.check(validate_not_empty("password", &data.password));
    if !errors.is_empty() {
        return Ok(rejected(&data, &errors));
    }

    match authenticate(&state, data.username.trim(), &data.password).await? {
        Some(user) => {
            tracing::info!(user_id = %user.id, "User logged in");
            start_session(&state, user.id, &user.username, safe_next(data.next.as_deref()))
        }
        None => {
            tracing::debug!(username = %data.username, "Login rejected");
            let errors = FormErrors::from(ValidationError::new(NON_FIELD_ERRORS, INVALID_LOGIN_MESSAGE));
            Ok(rejected(&data, &errors))
        }
    }
}

/// GET /auth/logout/
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::new(ACCESS_TOKEN_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();

    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(cookie)
        .finish()
}

/// POST /api/auth/token
pub async fn token(
    state: web::Data<AppState>,
    body: web::Json<TokenRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = authenticate(&state, req.username.trim(), &req.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    }))
}

/// The user matching these credentials, if any.
async fn authenticate(state: &AppState, username: &str, password: &str) -> AppResult<Option<User>> {
    let Some(user) = state.users.find_by_username(username).await? else {
        return Ok(None);
    };

    let valid = state
        .passwords
        .verify(password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(valid.then_some(user))
}

/// Issue a session cookie for the user and redirect to `location`.
fn start_session(
    state: &AppState,
    user_id: Uuid,
    username: &str,
    location: &str,
) -> AppResult<HttpResponse> {
    let token = state
        .tokens
        .generate_token(user_id, username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut cookie = Cookie::new(ACCESS_TOKEN_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(state.secure_cookies);
    cookie.set_max_age(Duration::seconds(state.tokens.expiration_seconds()));

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish())
}

/// Only same-site absolute paths are honored as a post-login destination.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path,
        _ => "/",
    }
}

fn rejected(data: &CredentialsForm, errors: &FormErrors) -> HttpResponse {
    let view = AuthFormView {
        username: data.username.clone(),
        next: data.next.clone(),
        errors: views::error_map(errors),
    };
    HttpResponse::Ok().json(ApiResponse::rejected(view, "Please correct the errors below."))
}
