use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};

use crate::{
    infrastructure::http::{health_check, readiness_check},
    presentation::{
        handlers::{self, AppState},
        middleware::{auth_middleware, require_admin},
    },
};

/// Create all application routes with application state
pub fn create_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(authenticated_routes(&app_state))
        .with_state(app_state)
}

/// Routes served without a bearer token
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/auth/login", post(handlers::auth::login))
        .route("/movie/{movie_id}/rating", get(handlers::ratings::get_movie_ratings))
        .route("/user/{user_id}/rating", get(handlers::ratings::list_user_ratings))
        .route("/rating", get(handlers::ratings::get_rating))
}

/// Routes behind `auth_middleware`; every handler here may extract `AuthContext`
fn authenticated_routes(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/rating",
            post(handlers::ratings::create_rating)
                .patch(handlers::ratings::update_rating)
                .delete(handlers::ratings::delete_rating),
        )
        .merge(admin_routes())
        .route_layer(from_fn_with_state(app_state.codec.clone(), auth_middleware))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/movie/{movie_id}/rating/reconcile",
            post(handlers::ratings::reconcile_aggregate),
        )
        .route_layer(from_fn(require_admin))
}
