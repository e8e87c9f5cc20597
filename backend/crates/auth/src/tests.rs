//! Crate-level tests: services over the in-memory store, and the router
//! driven end to end with `oneshot`.

use std::sync::Arc;

use platform::client::ClientInfo;

use crate::application::{AuthService, RoleService};
use crate::config::AuthConfig;
use crate::domain::token::{TokenIssuer, TokenVerifier};
use crate::infra::{InMemoryAuthRepository, JwtTokenService};

const SECRET: &[u8] = b"test-secret-key-for-jwt-testing-minimum-32-chars";
const PASSWORD: &str = "Correct-Horse-42";

type Store = InMemoryAuthRepository;

fn config() -> AuthConfig {
    AuthConfig {
        jwt_secret: SECRET.to_vec(),
        ..AuthConfig::default()
    }
}

fn client() -> ClientInfo {
    ClientInfo {
        ip: "198.51.100.4".parse().ok(),
        user_agent: Some("integration-test/1.0".to_string()),
    }
}

struct Fixture {
    store: Arc<Store>,
    tokens: Arc<JwtTokenService>,
    auth: AuthService<Store, Store>,
    roles: RoleService<Store, Store, Store, Store, Store>,
}

fn fixture() -> Fixture {
    let config = Arc::new(config());
    let store = Arc::new(InMemoryAuthRepository::new());
    let tokens = Arc::new(JwtTokenService::from_config(&config));
    let issuer: Arc<dyn TokenIssuer> = tokens.clone();

    Fixture {
        auth: AuthService::from_store(store.clone(), issuer, config.clone()),
        roles: RoleService::from_store(store.clone(), config),
        store,
        tokens,
    }
}

mod auth_service_tests {
    use super::*;
    use crate::application::{LoginInput, RegisterInput};
    use crate::domain::repository::LoginHistoryRepository;
    use crate::error::AuthError;

    fn register(name: &str) -> RegisterInput {
        RegisterInput {
            user_name: name.to_string(),
            password: PASSWORD.to_string(),
        }
    }

    fn login(name: &str, password: &str) -> LoginInput {
        LoginInput {
            user_name: name.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let f = fixture();
        let first = f.auth.register(register("Alice")).await.unwrap();
        assert_eq!(first.user_name, "Alice");

        let second = f.auth.register(register("alice")).await;
        assert!(matches!(second, Err(AuthError::UserNameTaken)));
        assert_eq!(f.auth.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let f = fixture();

        let bad_name = f.auth.register(register("a b")).await;
        assert!(matches!(bad_name, Err(AuthError::Validation(_))));

        let weak = f
            .auth
            .register(RegisterInput {
                user_name: "carol".to_string(),
                password: "password123".to_string(),
            })
            .await;
        assert!(matches!(weak, Err(AuthError::Validation(_))));
        assert!(f.auth.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_password_records_failure() {
        let f = fixture();
        let alice = f.auth.register(register("alice")).await.unwrap();

        let result = f.auth.login(login("alice", "Wrong-Horse-42"), client()).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        let history = f.auth.login_history(&alice.user_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(!history[0].succeeded);
        assert_eq!(history[0].user_name, "alice");
        assert_eq!(history[0].client_ip.as_deref(), Some("198.51.100.4"));
    }

    #[tokio::test]
    async fn test_unknown_user_records_anonymous_failure() {
        let f = fixture();

        let result = f.auth.login(login("nobody", PASSWORD), client()).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        // malformed names fail the same way
        let result = f.auth.login(login("!!", PASSWORD), client()).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        let all = LoginHistoryRepository::find_all(f.store.as_ref()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|h| h.user_id.is_none() && !h.succeeded));
    }

    #[tokio::test]
    async fn test_login_issues_token_and_records_success() {
        let f = fixture();
        let alice = f.auth.register(register("alice")).await.unwrap();

        let output = f.auth.login(login("  ALICE ", PASSWORD), client()).await.unwrap();
        assert_eq!(output.user_id, alice.user_id);
        assert_eq!(output.user_name, "alice");
        assert_eq!(output.token.token_type, "Bearer");

        let claims = f.tokens.verify(&output.token.access_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), alice.user_id);
        assert!(claims.exp > chrono::Utc::now().timestamp());

        let history = f.auth.login_history(&alice.user_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].succeeded);
        assert_eq!(
            history[0].user_agent.as_deref(),
            Some("integration-test/1.0")
        );
    }

    #[tokio::test]
    async fn test_unusable_token_ttl_fails_login() {
        let config = Arc::new(AuthConfig {
            token_ttl: std::time::Duration::from_secs(u64::MAX),
            ..config()
        });
        let store = Arc::new(InMemoryAuthRepository::new());
        let issuer: Arc<dyn TokenIssuer> = Arc::new(JwtTokenService::from_config(&config));
        let auth = AuthService::from_store(store, issuer, config);
        let alice = auth.register(register("alice")).await.unwrap();

        let result = auth.login(login("alice", PASSWORD), client()).await;
        assert!(matches!(result, Err(AuthError::Internal(_))));

        let history = auth.login_history(&alice.user_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(!history[0].succeeded);
    }
}

mod role_service_tests {
    use super::*;
    use crate::application::RegisterInput;
    use crate::domain::entity::Privilege;
    use crate::domain::repository::{
        PrivilegeRepository, RolePrivilegeRepository, RoleRepository,
    };
    use crate::domain::value_object::{PrivilegeId, PrivilegeName, RoleId, UserId};
    use crate::error::AuthError;

    async fn privilege(store: &Store, name: &str) -> PrivilegeId {
        let privilege = Privilege::new(PrivilegeName::new(name).unwrap(), None);
        PrivilegeRepository::create(store, &privilege).await.unwrap();
        privilege.privilege_id
    }

    #[tokio::test]
    async fn test_create_role_conflict() {
        let f = fixture();
        let role = f.roles.create_role("Editor").await.unwrap();
        assert_eq!(role.role_name.as_str(), "editor");

        let again = f.roles.create_role(" editor ").await;
        assert!(matches!(again, Err(AuthError::RoleNameTaken)));

        let invalid = f.roles.create_role("x").await;
        assert!(matches!(invalid, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_privilege_writes_nothing() {
        let f = fixture();
        let role = f.roles.create_role("editor").await.unwrap();
        let known = privilege(&f.store, "post.write").await;
        let unknown = PrivilegeId::new();

        let result = f
            .roles
            .create_role_privilege(role.role_id, vec![known, unknown])
            .await;
        match result {
            Err(AuthError::PrivilegeNotFound(missing)) => assert_eq!(missing, vec![unknown]),
            other => panic!("expected PrivilegeNotFound, got {other:?}"),
        }

        let pairs = RolePrivilegeRepository::find_by_role_id(f.store.as_ref(), &role.role_id)
            .await
            .unwrap();
        assert!(pairs.is_empty(), "no partial association may remain");
    }

    #[tokio::test]
    async fn test_unknown_role_and_empty_list() {
        let f = fixture();
        let known = privilege(&f.store, "post.write").await;

        let result = f.roles.create_role_privilege(RoleId::new(), vec![known]).await;
        assert!(matches!(result, Err(AuthError::RoleNotFound)));

        let role = f.roles.create_role("editor").await.unwrap();
        let result = f.roles.create_role_privilege(role.role_id, vec![]).await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_grant_dedupes_and_skips_existing() {
        let f = fixture();
        let role = f.roles.create_role("editor").await.unwrap();
        let write = privilege(&f.store, "post.write").await;
        let read = privilege(&f.store, "post.read").await;

        let first = f
            .roles
            .create_role_privilege(role.role_id, vec![write, write])
            .await
            .unwrap();
        assert_eq!(first.granted, vec![write]);
        assert!(first.skipped.is_empty());

        let second = f
            .roles
            .create_role_privilege(role.role_id, vec![read, write])
            .await
            .unwrap();
        assert_eq!(second.granted, vec![read]);
        assert_eq!(second.skipped, vec![write]);
    }

    #[tokio::test]
    async fn test_initial_permission_is_idempotent() {
        let f = fixture();

        let first = f.roles.initial_permission().await.unwrap();
        assert_eq!(first.privileges_created, 6);
        assert_eq!(first.roles_created, 2);
        assert_eq!(first.grants_created, 7);

        let second = f.roles.initial_permission().await.unwrap();
        assert_eq!(second.privileges_created, 0);
        assert_eq!(second.roles_created, 0);
        assert_eq!(second.grants_created, 0);

        assert_eq!(f.roles.list_privileges().await.unwrap().len(), 6);
        assert_eq!(f.roles.list_roles().await.unwrap().len(), 2);
        assert_eq!(
            RolePrivilegeRepository::find_all(f.store.as_ref())
                .await
                .unwrap()
                .len(),
            7
        );
    }

    #[tokio::test]
    async fn test_initial_permission_reuses_existing_rows() {
        let f = fixture();
        let existing = f.roles.create_role("admin").await.unwrap();

        let output = f.roles.initial_permission().await.unwrap();
        assert_eq!(output.roles_created, 1);

        let admin = RoleRepository::find_by_id(f.store.as_ref(), &existing.role_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role_name.as_str(), "admin");
        assert_eq!(
            RolePrivilegeRepository::find_by_role_id(f.store.as_ref(), &existing.role_id)
                .await
                .unwrap()
                .len(),
            6
        );
    }

    #[tokio::test]
    async fn test_assign_user_role() {
        let f = fixture();
        let role = f.roles.create_role("editor").await.unwrap();
        let user = f
            .auth
            .register(RegisterInput {
                user_name: "alice".to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .unwrap();

        let missing = f.roles.assign_user_role(UserId::new(), role.role_id).await;
        assert!(matches!(missing, Err(AuthError::UserNotFound)));

        let missing = f.roles.assign_user_role(user.user_id, RoleId::new()).await;
        assert!(matches!(missing, Err(AuthError::RoleNotFound)));

        let first = f.roles.assign_user_role(user.user_id, role.role_id).await.unwrap();
        assert!(first.created);
        let second = f.roles.assign_user_role(user.user_id, role.role_id).await.unwrap();
        assert!(!second.created);
    }
}

mod router_tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::domain::entity::User;
    use crate::domain::value_object::{RawPassword, UserName, UserPassword};
    use crate::presentation::router::auth_router_generic;

    fn app() -> Router {
        Router::new().nest(
            "/api/v1",
            auth_router_generic(InMemoryAuthRepository::new(), config()),
        )
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn register_and_login(app: &Router, name: &str) -> String {
        let credentials = json!({ "userName": name, "password": PASSWORD });

        let (status, _) = send(app, post_json("/api/v1/auth/register", credentials.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(app, post_json("/api/v1/auth/login", credentials)).await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["accessToken"]
            .as_str()
            .map(str::to_string)
            .unwrap()
    }

    fn assert_error(body: &Value) {
        assert_eq!(body["status"], "error");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let app = app();

        let (status, body) = send(&app, get("/api/v1/user/get/all", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_error(&body);
        assert_eq!(body["message"], "Unauthorized: missing bearer token");

        let (status, body) = send(&app, get("/api/v1/user/get/all", Some("not.a.jwt"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_error(&body);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let app = app();
        let raw = RawPassword::for_login(PASSWORD.to_string());
        let user = User::new(
            UserName::new("alice").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        );
        let expired = JwtTokenService::new(SECRET, -60).issue(&user).unwrap();

        let (status, body) = send(
            &app,
            get("/api/v1/role/get/all", Some(&expired.access_token)),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized: token has expired");
    }

    #[tokio::test]
    async fn test_register_login_and_list_users() {
        let app = app();
        let token = register_and_login(&app, "alice").await;

        let (status, body) = send(&app, get("/api/v1/user/get/all", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        let users = body["data"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["userName"], "alice");
        assert!(users[0].get("passwordHash").is_none());

        let (status, body) = send(&app, get("/api/v1/user/login-history", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["succeeded"], true);
    }

    #[tokio::test]
    async fn test_login_failure_is_uniform() {
        let app = app();
        register_and_login(&app, "alice").await;

        let wrong = json!({ "userName": "alice", "password": "Wrong-Horse-42" });
        let (status, wrong_body) = send(&app, post_json("/api/v1/auth/login", wrong)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let unknown = json!({ "userName": "nobody", "password": PASSWORD });
        let (status, unknown_body) = send(&app, post_json("/api/v1/auth/login", unknown)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        assert_eq!(wrong_body, unknown_body);
    }

    #[tokio::test]
    async fn test_duplicate_register_and_bad_body() {
        let app = app();
        register_and_login(&app, "alice").await;

        let again = json!({ "userName": "ALICE", "password": PASSWORD });
        let (status, body) = send(&app, post_json("/api/v1/auth/register", again)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "User name already exists");

        let request = Request::post("/api/v1/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body);
    }

    #[tokio::test]
    async fn test_role_flow() {
        let app = app();
        let token = register_and_login(&app, "alice").await;

        let (status, body) = send(&app, get("/api/v1/role/initial-permission", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["privilegesCreated"], 6);

        let (status, body) = send(
            &app,
            get("/api/v1/role/create-role?name=editor", Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let role_id = body["data"]["roleId"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            get("/api/v1/role/create-role?name=Editor", Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = send(&app, get("/api/v1/privilege/get/all", Some(&token))).await;
        let privilege_id = body["data"][0]["privilegeId"].as_str().unwrap().to_string();

        let mut request = post_json(
            "/api/v1/role/create-role-privilege",
            json!({ "roleId": role_id, "privilegeIds": [privilege_id] }),
        );
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["granted"][0], privilege_id);

        let (status, body) = send(&app, get("/api/v1/role/get/all", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unmatched_requests_use_error_body() {
        let app = app();
        let token = register_and_login(&app, "alice").await;

        let (status, body) = send(&app, get("/api/v1/no/such/route", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error(&body);

        let mut request = post_json("/api/v1/role/create-role?name=editor", json!({}));
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_error(&body);

        let (status, body) = send(&app, get("/api/v1/auth/login", None)).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_error(&body);
    }

    #[tokio::test]
    async fn test_create_role_missing_name() {
        let app = app();
        let token = register_and_login(&app, "alice").await;

        let (status, body) = send(&app, get("/api/v1/role/create-role", Some(&token))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body);
    }
}
