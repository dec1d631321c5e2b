use std::sync::Arc;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::json;

use taskhub::auth::{hash_password, AuthResponse, TokenManager};
use taskhub::models::Role;
use taskhub::store::{MemoryStore, Store};
use taskhub::{routes, AppState};

fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState {
        store: Arc::new(MemoryStore::new()),
        tokens: TokenManager::new("admin-test-secret", 24),
        bcrypt_cost: 4,
    })
}

/// Seeds a user directly through the store, bypassing the registration
/// endpoint's refusal to create admins.
async fn seed_user(state: &web::Data<AppState>, username: &str, password: &str, role: Role) -> i64 {
    let hash = hash_password(password, 4).unwrap();
    let user = state
        .store
        .create_user(username, &hash, role)
        .await
        .expect("setup: seeding user failed");
    user.id
}

async fn login<S>(app: &S, username: &str, password: &str) -> String
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "setup: login failed");
    let login: AuthResponse = test::read_body_json(resp).await;
    login.token
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[actix_rt::test]
async fn test_admin_routes_reject_regular_users() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::config),
    )
    .await;

    seed_user(&state, "plain_user", "password1", Role::User).await;
    let token = login(&app, "plain_user", "password1").await;

    let req = test::TestRequest::get()
        .uri("/admin/users")
        .append_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::put()
        .uri("/admin/users/1/role")
        .append_header(bearer(&token))
        .set_json(json!({ "role": "admin" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // And without any token at all, the identity middleware answers first.
    let req = test::TestRequest::get().uri("/admin/users").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_rt::test]
async fn test_admin_can_list_users_without_hashes() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::config),
    )
    .await;

    seed_user(&state, "root_admin", "password1", Role::Admin).await;
    seed_user(&state, "somebody", "password2", Role::User).await;
    let token = login(&app, "root_admin", "password1").await;

    let req = test::TestRequest::get()
        .uri("/admin/users")
        .append_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let users: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().any(|u| u["username"] == "somebody"));

    // Hashes must never appear in any admin response.
    let raw = String::from_utf8_lossy(&body);
    assert!(!raw.contains("password_hash"));
    assert!(!raw.contains("$2b$"));
}

#[actix_rt::test]
async fn test_role_change_applies_to_already_issued_tokens() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::config),
    )
    .await;

    seed_user(&state, "root_admin", "adminpass", Role::Admin).await;
    let user_id = seed_user(&state, "promotee", "userpass", Role::User).await;

    let admin_token = login(&app, "root_admin", "adminpass").await;
    let user_token = login(&app, "promotee", "userpass").await;

    // Before promotion the user's token does not open admin routes.
    let req = test::TestRequest::get()
        .uri("/admin/users")
        .append_header(bearer(&user_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // Promote
    let req = test::TestRequest::put()
        .uri(&format!("/admin/users/{}/role", user_id))
        .append_header(bearer(&admin_token))
        .set_json(json!({ "role": "admin" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(summary["role"], "admin");

    // The very next request with the *same* token is admitted: role is read
    // fresh from the store, never from the token.
    let req = test::TestRequest::get()
        .uri("/admin/users")
        .append_header(bearer(&user_token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // Demote again; the same token immediately loses access.
    let req = test::TestRequest::put()
        .uri(&format!("/admin/users/{}/role", user_id))
        .append_header(bearer(&admin_token))
        .set_json(json!({ "role": "user" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/admin/users")
        .append_header(bearer(&user_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
}

#[actix_rt::test]
async fn test_role_update_validation_and_missing_user() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(routes::config),
    )
    .await;

    seed_user(&state, "root_admin", "adminpass", Role::Admin).await;
    let token = login(&app, "root_admin", "adminpass").await;

    // Role outside the enum → 400
    let req = test::TestRequest::put()
        .uri("/admin/users/1/role")
        .append_header(bearer(&token))
        .set_json(json!({ "role": "root" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    // Unknown user id → 404
    let req = test::TestRequest::put()
        .uri("/admin/users/9999/role")
        .append_header(bearer(&token))
        .set_json(json!({ "role": "admin" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
