//! Auth Router

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::config::AuthConfig;
use crate::domain::repository::AuthStore;
use crate::infra::jwt::JwtTokenService;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_bearer_token};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
///
/// Paths are relative; the binary nests this under `/api/v1`.
pub fn auth_router_generic<S: AuthStore>(store: S, config: AuthConfig) -> Router {
    let config = Arc::new(config);
    let tokens = Arc::new(JwtTokenService::from_config(&config));

    let state = AuthAppState::new(Arc::new(store), tokens.clone(), config);
    let guard = AuthMiddlewareState { verifier: tokens };

    let public = Router::new()
        .route("/auth/login", post(handlers::login::<S>))
        .route("/auth/register", post(handlers::register::<S>))
        .route(
            "/role/initial-permission",
            get(handlers::initial_permission::<S>),
        );

    let protected = Router::new()
        .route("/user/get/all", get(handlers::list_users::<S>))
        .route("/user/login-history", get(handlers::login_history::<S>))
        .route("/role/create-role", get(handlers::create_role::<S>))
        .route(
            "/role/create-role-privilege",
            post(handlers::create_role_privilege::<S>),
        )
        .route(
            "/role/assign-user-role",
            post(handlers::assign_user_role::<S>),
        )
        .route("/role/get/all", get(handlers::list_roles::<S>))
        .route("/privilege/get/all", get(handlers::list_privileges::<S>))
        .route_layer(middleware::from_fn_with_state(guard, require_bearer_token));

    public
        .merge(protected)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::route_not_found)
        .with_state(state)
}
