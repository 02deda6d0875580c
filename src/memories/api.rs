//! Memory API Endpoints

use crate::auth::identity::resolve_identity;
use crate::db::run_blocking;
use crate::error::ApiError;
use crate::memories::{
    guard::RecordAccessGuard,
    models::{Memory, MemoryForm},
};
use crate::{found, AppState};
use axum::{
    extract::{rejection::FormRejection, State},
    response::Response,
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;

/// Create memory - POST /memories
///
/// The session is checked before the body, so an anonymous caller gets 401
/// whatever it sent.
pub async fn create_memory(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<MemoryForm>, FormRejection>,
) -> Result<Response, ApiError> {
    run_blocking(move || -> Result<(), ApiError> {
        let conn = state.db.connect()?;
        let owner = resolve_identity(&conn, &state.tokens, &jar)?;
        let Form(form) = form.map_err(ApiError::Form)?;
        RecordAccessGuard::new(&conn).create(&owner, &form.title, &form.description)?;
        Ok(())
    })
    .await?;

    Ok(found("/memories"))
}

/// List the caller's memories - GET /memories
pub async fn list_memories(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Vec<Memory>>, ApiError> {
    let memories = run_blocking(move || -> Result<Vec<Memory>, ApiError> {
        let conn = state.db.connect()?;
        let owner = resolve_identity(&conn, &state.tokens, &jar)?;
        Ok(RecordAccessGuard::new(&conn).list_for(&owner)?)
    })
    .await?;

    Ok(Json(memories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::{session_cookie_value, SESSION_COOKIE};
    use crate::test_support::{body_json, test_state};
    use crate::{auth::user_store::UserStore, build_router};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn cookie_for(state: &AppState, username: &str) -> String {
        let conn = state.db.connect().unwrap();
        let user = UserStore::new(&conn).insert(username, "h").unwrap();
        let token = state.tokens.issue(user.id).unwrap();
        format!("{}={}", SESSION_COOKIE, session_cookie_value(&token))
    }

    fn post_memory(cookie: Option<&str>, body: &'static str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/memories")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_create_requires_session() {
        let (state, _dir) = test_state();
        let app = build_router(state);

        let response = app
            .oneshot(post_memory(None, "title=T&description=D"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_auth_checked_before_fields() {
        let (state, _dir) = test_state();
        let app = build_router(state);

        let response = app
            .oneshot(post_memory(None, "title=&description="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_checked_before_body_is_read() {
        let (state, _dir) = test_state();
        let cookie = cookie_for(&state, "memoryuser");
        let app = build_router(state);

        let bare = |cookie: Option<&str>| {
            let mut builder = Request::builder().method("POST").uri("/memories");
            if let Some(cookie) = cookie {
                builder = builder.header(header::COOKIE, cookie.to_string());
            }
            builder.body(Body::from("title=T&description=D")).unwrap()
        };

        let response = app.clone().oneshot(bare(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app.oneshot(bare(Some(cookie.as_str()))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_empty_fields_unprocessable() {
        let (state, _dir) = test_state();
        let cookie = cookie_for(&state, "memoryuser");
        let app = build_router(state);

        for body in ["title=&description=", "title=T", "description=D"] {
            let response = app
                .clone()
                .oneshot(post_memory(Some(&cookie), body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (state, _dir) = test_state();
        let cookie = cookie_for(&state, "memoryuser");
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(post_memory(Some(&cookie), "title=Test+Memory&description=This+is+a+test"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/memories");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/memories")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let memories: Vec<Memory> = body_json(response).await;
        assert_eq!(memories.len(), 1);
        assert_eq!(memories[0].title, "Test Memory");
        assert_eq!(memories[0].description, "This is a test");
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_caller() {
        let (state, _dir) = test_state();
        let alice = cookie_for(&state, "alice");
        let bob = cookie_for(&state, "bob");
        let app = build_router(state);

        app.clone()
            .oneshot(post_memory(Some(&alice), "title=mine&description=secret"))
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/memories")
                    .header(header::COOKIE, &bob)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let memories: Vec<Memory> = body_json(response).await;
        assert!(memories.is_empty());
    }
}
