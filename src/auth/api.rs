//! Authentication API Endpoints
//! Registration, login, logout and the current-user lookup

use crate::auth::{
    accounts::Accounts,
    identity::{resolve_identity, session_cookie_value, SESSION_COOKIE},
    models::{CredentialsForm, UserResponse},
};
use crate::db::run_blocking;
use crate::error::ApiError;
use crate::{found, AppState};
use axum::{
    extract::State,
    response::Response,
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;

/// Register - POST /users/register
///
/// A taken username is answered with an inline message and a 200, not a 4xx.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, ApiError> {
    run_blocking(move || -> Result<(), ApiError> {
        let conn = state.db.connect()?;
        Accounts::new(&conn, &state.hasher, &state.tokens)
            .register(&form.username, &form.password)?;
        Ok(())
    })
    .await?;

    Ok(found("/users/login"))
}

/// Login - POST /users/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<(CookieJar, Response), ApiError> {
    let ttl = state.config.access_token_ttl;
    let token = run_blocking(move || -> Result<String, ApiError> {
        let conn = state.db.connect()?;
        let (_user, token) = Accounts::new(&conn, &state.hasher, &state.tokens)
            .login(&form.username, &form.password)?;
        Ok(token)
    })
    .await?;

    let max_age = time::Duration::seconds(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX));
    let cookie = Cookie::build((SESSION_COOKIE, session_cookie_value(&token)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build();

    Ok((jar.add(cookie), found("/memories")))
}

/// Logout - GET /users/logout
///
/// Tokens are stateless, so this only tells the client to drop its cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, Response) {
    let mut removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    removal.make_removal();
    info!("session cookie cleared");
    (jar.add(removal), found("/"))
}

/// Current user - GET /users/me
pub async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<UserResponse>, ApiError> {
    let user = run_blocking(move || -> Result<UserResponse, ApiError> {
        let conn = state.db.connect()?;
        let principal = resolve_identity(&conn, &state.tokens, &jar)?;
        Ok(UserResponse::from_user(principal.user()))
    })
    .await?;

    Ok(Json(user))
}
