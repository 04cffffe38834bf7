mod common;

use common::TestApp;
use http::Method;
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_signup_success() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({
                "username": "nicola",
                "email": "nicola@example.com",
                "phone": "+33 6 12 34 56 78",
                "password": "pass_word!"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["username"], "nicola");
    assert_eq!(body["data"]["email"], "nicola@example.com");
    assert_eq!(body["data"]["phone"], "+33612345678");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_signup_invalid_email() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({
                "username": "nicola",
                "email": "not-an-email",
                "password": "pass_word!"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid email"));
}

#[tokio::test]
async fn test_signup_short_password() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({
                "username": "nicola",
                "email": "nicola@example.com",
                "password": "short"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = TestApp::new();
    app.signup("nicola").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({
                "username": "someone_else",
                "email": "nicola@example.com",
                "password": "pass_word!"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_signup_duplicate_username() {
    let app = TestApp::new();
    app.signup("nicola").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({
                "username": "nicola",
                "email": "other@example.com",
                "password": "pass_word!"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = TestApp::new();
    let user_id = app.signup("nicola").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({
                "username": "nicola",
                "password": "correct-horse-battery"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "bearer");
    assert_eq!(body["data"]["expires_in"], 30 * 60);

    let token = body["data"]["access_token"].as_str().unwrap();
    let claims = app.jwt_handler.verify(token).unwrap();
    assert_eq!(claims.sub.as_deref(), Some(user_id.as_str()));
    assert_eq!(claims.username(), Some("nicola"));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.signup("nicola").await;

    let (wrong_password_status, wrong_password_body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "nicola", "password": "wrong-password" })),
        )
        .await;

    let (unknown_user_status, unknown_user_body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "nobody", "password": "wrong-password" })),
        )
        .await;

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password_body, unknown_user_body);
    assert_eq!(wrong_password_body["data"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_me_returns_authenticated_user() {
    let app = TestApp::new();
    let (user_id, token) = app.register("nicola").await;

    let (status, body) = app.send(Method::GET, "/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user_id.as_str());
    assert_eq!(body["data"]["username"], "nicola");
}

#[tokio::test]
async fn test_list_and_get_users() {
    let app = TestApp::new();
    let (alice_id, token) = app.register("alice").await;
    app.signup("bob").await;

    let (status, body) = app.send(Method::GET, "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let path = format!("/api/users/{}", alice_id);
    let (status, body) = app.send(Method::GET, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
}

#[tokio::test]
async fn test_get_user_not_found_and_bad_id() {
    let app = TestApp::new();
    let (_, token) = app.register("alice").await;

    let path = format!("/api/users/{}", uuid::Uuid::new_v4());
    let (status, _) = app.send(Method::GET, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::GET, "/api/users/not-a-uuid", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_own_account() {
    let app = TestApp::new();
    let (alice_id, token) = app.register("alice").await;

    let path = format!("/api/users/{}", alice_id);
    let (status, body) = app
        .send(
            Method::PUT,
            &path,
            Some(&token),
            Some(json!({ "email": "alice@new.example.com", "password": "brand-new-password" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "alice@new.example.com");

    let (status, _) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "brand-new-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_other_account_forbidden() {
    let app = TestApp::new();
    let (_, alice_token) = app.register("alice").await;
    let bob_id = app.signup("bob").await;

    let path = format!("/api/users/{}", bob_id);
    let (status, _) = app
        .send(
            Method::PUT,
            &path,
            Some(&alice_token),
            Some(json!({ "username": "hijacked" })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_account_removes_posts() {
    let app = TestApp::new();
    let (alice_id, token) = app.register("alice").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/posts",
            Some(&token),
            Some(json!({ "title": "Hello world", "content": "My very first post." })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.post_count(), 1);

    let path = format!("/api/users/{}", alice_id);
    let (status, body) = app.send(Method::DELETE, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    assert_eq!(app.post_count(), 0);

    let (status, _) = app.send(Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_other_account_forbidden() {
    let app = TestApp::new();
    let (_, alice_token) = app.register("alice").await;
    let bob_id = app.signup("bob").await;

    let path = format!("/api/users/{}", bob_id);
    let (status, _) = app
        .send(Method::DELETE, &path, Some(&alice_token), None)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_and_read_post() {
    let app = TestApp::new();
    let (alice_id, token) = app.register("alice").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/posts",
            Some(&token),
            Some(json!({ "title": "  Hello world  ", "content": "My very first post." })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["title"], "Hello world");
    assert_eq!(body["data"]["author"]["id"], alice_id.as_str());
    assert_eq!(body["data"]["author"]["username"], "alice");

    let post_id = body["data"]["id"].as_str().unwrap().to_string();

    let path = format!("/api/posts/{}", post_id);
    let (status, body) = app.send(Method::GET, &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["content"], "My very first post.");

    let (status, body) = app.send(Method::GET, "/api/posts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_post_validation_and_duplicates() {
    let app = TestApp::new();
    let (_, token) = app.register("alice").await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/posts",
            Some(&token),
            Some(json!({ "title": "Hello world", "content": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let post = json!({ "title": "Hello world", "content": "My very first post." });
    let (status, _) = app
        .send(Method::POST, "/api/posts", Some(&token), Some(post.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(Method::POST, "/api/posts", Some(&token), Some(post))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_only_author_may_edit_or_delete_post() {
    let app = TestApp::new();
    let (_, alice_token) = app.register("alice").await;
    let (_, bob_token) = app.register("bob").await;

    let (_, body) = app
        .send(
            Method::POST,
            "/api/posts",
            Some(&alice_token),
            Some(json!({ "title": "Alice writes", "content": "Content written by alice." })),
        )
        .await;
    let path = format!("/api/posts/{}", body["data"]["id"].as_str().unwrap());

    let (status, _) = app
        .send(
            Method::PUT,
            &path,
            Some(&bob_token),
            Some(json!({ "title": "Bob was here" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::DELETE, &path, Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(
            Method::PUT,
            &path,
            Some(&alice_token),
            Some(json!({ "title": "Alice rewrites" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Alice rewrites");
    assert_eq!(body["data"]["content"], "Content written by alice.");

    let (status, _) = app
        .send(Method::DELETE, &path, Some(&alice_token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, &path, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_posts_by_user_statistics() {
    let app = TestApp::new();
    let (_, alice_token) = app.register("alice").await;
    let (_, bob_token) = app.register("bob").await;
    app.signup("carol").await;

    for (token, title) in [
        (&alice_token, "Alice one"),
        (&alice_token, "Alice two"),
        (&bob_token, "Bob one"),
    ] {
        let (status, _) = app
            .send(
                Method::POST,
                "/api/posts",
                Some(token),
                Some(json!({ "title": title, "content": "Some meaningful content" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app
        .send(Method::GET, "/api/stats/posts-by-user", Some(&alice_token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    let counts = body["data"].as_array().unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0]["author"]["username"], "alice");
    assert_eq!(counts[0]["total_posts"], 2);
    assert_eq!(counts[1]["author"]["username"], "bob");
    assert_eq!(counts[1]["total_posts"], 1);
}
