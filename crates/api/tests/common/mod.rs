//! Shared helpers for HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use academy_api::auth::jwt::{generate_access_token, JwtConfig};
use academy_api::config::ServerConfig;
use academy_api::router::build_app_router;
use academy_api::state::AppState;
use academy_core::lesson::LessonType;
use academy_core::types::DbId;
use academy_db::models::course::CreateCourse;
use academy_db::models::lesson::CreateLesson;
use academy_db::models::user::CreateUser;
use academy_db::repositories::{CourseRepo, LessonRepo, UserRepo};
use academy_events::EventBus;
use academy_pipeline::PipelineConfig;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "academy-integration-test-secret";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router, exactly as `main.rs` does.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(
        pool,
        config.clone(),
        PipelineConfig::default(),
        Arc::new(EventBus::default()),
    );
    build_app_router(state, &config)
}

/// Mint a token the app will accept for `user_id`.
pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, "learner", &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {t}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, name: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
        },
    )
    .await
    .unwrap()
    .id
}

/// Create a published course; returns (course_id, lesson_ids).
pub async fn create_course(
    pool: &PgPool,
    slug: &str,
    lesson_types: &[LessonType],
) -> (DbId, Vec<DbId>) {
    let course = CourseRepo::create(
        pool,
        &CreateCourse {
            slug: slug.to_string(),
            title: format!("Course {slug}"),
            description: Some("An introduction".to_string()),
            difficulty: None,
            is_published: None,
        },
    )
    .await
    .unwrap();

    let mut ids = Vec::new();
    for (i, lesson_type) in lesson_types.iter().enumerate() {
        let lesson = LessonRepo::create(
            pool,
            &CreateLesson {
                course_id: course.id,
                title: format!("{slug} lesson {}", i + 1),
                lesson_type: *lesson_type,
                sort_order: i as i32,
                content: None,
            },
        )
        .await
        .unwrap();
        ids.push(lesson.id);
    }
    (course.id, ids)
}
