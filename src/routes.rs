// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    docs,
    handlers::{attempts, evaluation},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (quiz evaluation, attempt history, docs).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:4200"),
            HeaderValue::from_static("http://127.0.0.1:4200"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let quiz_routes = Router::new()
        .route("/evaluate", post(evaluation::evaluate_quiz))
        .layer(auth.clone());

    let attempt_routes = Router::new()
        .route("/top-attempts", get(attempts::get_top_by_attempts))
        .route("/top-average", get(attempts::get_top_by_average))
        // Protected attempt routes
        .merge(
            Router::new()
                .route("/last/{user_id}", get(attempts::get_last_attempt))
                .route("/recent", get(attempts::get_recent_attempts))
                .layer(auth),
        );

    Router::new()
        .nest("/api/quiz", quiz_routes)
        .nest("/api/quiz-attempts", attempt_routes)
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
