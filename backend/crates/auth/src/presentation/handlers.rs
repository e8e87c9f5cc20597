//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::response::ApiResponse;
use platform::client::ClientInfo;

use crate::application::config::AuthConfig;
use crate::application::{AuthService, LoginInput, RegisterInput, RoleService};
use crate::domain::repository::AuthStore;
use crate::domain::token::TokenIssuer;
use crate::error::AuthResult;
use crate::presentation::dto::{
    AssignUserRoleRequest, AssignUserRoleResponse, CreateRolePrivilegeRequest,
    CreateRolePrivilegeResponse, CreateRoleQuery, InitialPermissionResponse, LoginHistoryResponse,
    LoginRequest, LoginResponse, PrivilegeResponse, RegisterRequest, RegisterResponse,
    RoleResponse, UserResponse,
};
use crate::presentation::middleware::AuthenticatedUser;

type Success<T> = Json<ApiResponse<T>>;

fn success<T: serde::Serialize>(data: T) -> Success<T> {
    Json(ApiResponse::success(data))
}

/// Shared state for auth handlers
pub struct AuthAppState<S: AuthStore> {
    pub auth_service: Arc<AuthService<S, S>>,
    pub role_service: Arc<RoleService<S, S, S, S, S>>,
}

impl<S: AuthStore> AuthAppState<S> {
    pub fn new(store: Arc<S>, token_issuer: Arc<dyn TokenIssuer>, config: Arc<AuthConfig>) -> Self {
        Self {
            auth_service: Arc::new(AuthService::from_store(
                store.clone(),
                token_issuer,
                config.clone(),
            )),
            role_service: Arc::new(RoleService::from_store(store, config)),
        }
    }
}

// derive would require `S: Clone`
impl<S: AuthStore> Clone for AuthAppState<S> {
    fn clone(&self) -> Self {
        Self {
            auth_service: self.auth_service.clone(),
            role_service: self.role_service.clone(),
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/v1/auth/login
pub async fn login<S: AuthStore>(
    State(state): State<AuthAppState<S>>,
    client: ClientInfo,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<Success<LoginResponse>> {
    let Json(req) = payload?;

    let output = state
        .auth_service
        .login(
            LoginInput {
                user_name: req.user_name,
                password: req.password,
            },
            client,
        )
        .await?;

    Ok(success(output.into()))
}

/// POST /api/v1/auth/register
pub async fn register<S: AuthStore>(
    State(state): State<AuthAppState<S>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<(StatusCode, Success<RegisterResponse>)> {
    let Json(req) = payload?;

    let output = state
        .auth_service
        .register(RegisterInput {
            user_name: req.user_name,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, success(output.into())))
}

// ============================================================================
// Users
// ============================================================================

/// GET /api/v1/user/get/all
pub async fn list_users<S: AuthStore>(
    State(state): State<AuthAppState<S>>,
    _caller: AuthenticatedUser,
) -> AuthResult<Success<Vec<UserResponse>>> {
    let users = state.auth_service.list_users().await?;
    Ok(success(users.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/user/login-history
pub async fn login_history<S: AuthStore>(
    State(state): State<AuthAppState<S>>,
    caller: AuthenticatedUser,
) -> AuthResult<Success<Vec<LoginHistoryResponse>>> {
    let entries = state.auth_service.login_history(&caller.user_id).await?;
    Ok(success(entries.into_iter().map(Into::into).collect()))
}

// ============================================================================
// Roles
// ============================================================================

/// GET /api/v1/role/create-role?name=
pub async fn create_role<S: AuthStore>(
    State(state): State<AuthAppState<S>>,
    caller: AuthenticatedUser,
    query: Result<Query<CreateRoleQuery>, QueryRejection>,
) -> AuthResult<(StatusCode, Success<RoleResponse>)> {
    let Query(query) = query?;

    let role = state.role_service.create_role(&query.name).await?;
    tracing::debug!(created_by = %caller.user_id, role_id = %role.role_id, "create-role");

    Ok((StatusCode::CREATED, success(role.into())))
}

/// POST /api/v1/role/create-role-privilege
pub async fn create_role_privilege<S: AuthStore>(
    State(state): State<AuthAppState<S>>,
    _caller: AuthenticatedUser,
    payload: Result<Json<CreateRolePrivilegeRequest>, JsonRejection>,
) -> AuthResult<Success<CreateRolePrivilegeResponse>> {
    let Json(req) = payload?;

    let output = state
        .role_service
        .create_role_privilege(req.role_id, req.privilege_ids)
        .await?;

    Ok(success(output.into()))
}

/// POST /api/v1/role/assign-user-role
pub async fn assign_user_role<S: AuthStore>(
    State(state): State<AuthAppState<S>>,
    _caller: AuthenticatedUser,
    payload: Result<Json<AssignUserRoleRequest>, JsonRejection>,
) -> AuthResult<Success<AssignUserRoleResponse>> {
    let Json(req) = payload?;

    let output = state
        .role_service
        .assign_user_role(req.user_id, req.role_id)
        .await?;

    Ok(success(output.into()))
}

/// GET /api/v1/role/get/all
pub async fn list_roles<S: AuthStore>(
    State(state): State<AuthAppState<S>>,
    _caller: AuthenticatedUser,
) -> AuthResult<Success<Vec<RoleResponse>>> {
    let roles = state.role_service.list_roles().await?;
    Ok(success(roles.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/privilege/get/all
pub async fn list_privileges<S: AuthStore>(
    State(state): State<AuthAppState<S>>,
    _caller: AuthenticatedUser,
) -> AuthResult<Success<Vec<PrivilegeResponse>>> {
    let privileges = state.role_service.list_privileges().await?;
    Ok(success(privileges.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/role/initial-permission
pub async fn initial_permission<S: AuthStore>(
    State(state): State<AuthAppState<S>>,
) -> AuthResult<Success<InitialPermissionResponse>> {
    let output = state.role_service.initial_permission().await?;
    Ok(success(output.into()))
}

// ============================================================================
// Fallbacks
// ============================================================================

/// Unknown path
pub async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

/// Known path, unsupported method
pub async fn method_not_allowed() -> AppError {
    AppError::new(ErrorKind::MethodNotAllowed, "Method not allowed")
}
