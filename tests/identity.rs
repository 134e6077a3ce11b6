use std::time::Duration;

use itinerary_client::{ApiClient, ApiError, ExternalUser, RetryPolicy, UserDirectory};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

fn directory(server: &ServerGuard) -> UserDirectory {
    let client = ApiClient::new(format!("{}/api", server.url())).with_retry_policy(RetryPolicy::new(
        1,
        Duration::from_millis(10),
        Duration::from_millis(10),
    ));
    UserDirectory::new(client)
}

fn email_path() -> Matcher {
    Matcher::Regex(r"^/api/users/email/ada(@|%40)example\.com$".to_string())
}

fn user_body(id: &str) -> String {
    json!({
        "id": id,
        "clerkUserId": "clerk_1",
        "email": "ada@example.com",
        "name": "Ada Lovelace"
    })
    .to_string()
}

fn ada() -> ExternalUser {
    ExternalUser::new("clerk_1")
        .with_email("ada@example.com")
        .with_name("Ada Lovelace")
}

#[tokio::test]
async fn test_clerk_lookup_is_cached() {
    let mut server = Server::new_async().await;
    let clerk = server
        .mock("GET", "/api/users/clerk/clerk_1")
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .with_body(user_body("u-1"))
        .expect(1)
        .create_async()
        .await;

    let directory = directory(&server);
    assert_eq!(directory.backend_user_id(&ada(), Some("tok")).await.unwrap(), "u-1");
    assert_eq!(directory.backend_user_id(&ada(), Some("tok")).await.unwrap(), "u-1");
    assert_eq!(directory.cached("clerk_1").await.as_deref(), Some("u-1"));

    clerk.assert_async().await;
}

#[tokio::test]
async fn test_falls_back_to_email_lookup() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/users/clerk/clerk_1")
        .with_status(404)
        .create_async()
        .await;
    let email = server
        .mock("GET", email_path())
        .with_status(200)
        .with_body(user_body("u-2"))
        .expect(1)
        .create_async()
        .await;
    let create = server.mock("POST", "/api/users").expect(0).create_async().await;

    let id = directory(&server).backend_user_id(&ada(), None).await.unwrap();

    assert_eq!(id, "u-2");
    email.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_creates_user_with_default_preferences() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/users/clerk/clerk_1")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", email_path())
        .with_status(404)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/api/users")
        .match_body(Matcher::Json(json!({
            "email": "ada@example.com",
            "name": "Ada Lovelace",
            "clerkUserId": "clerk_1"
        })))
        .with_status(201)
        .with_body(user_body("u-3"))
        .expect(1)
        .create_async()
        .await;
    let prefs = server
        .mock("PUT", "/api/users/u-3/preferences")
        .match_body(Matcher::PartialJson(json!({
            "budgetLevel": "MID_RANGE",
            "travelStyle": "MODERATE",
            "preferredTransport": "WALKING"
        })))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let id = directory(&server).backend_user_id(&ada(), None).await.unwrap();

    assert_eq!(id, "u-3");
    create.assert_async().await;
    prefs.assert_async().await;
}

#[tokio::test]
async fn test_preference_seeding_failure_is_not_fatal() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/users/clerk/clerk_1")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", email_path())
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("POST", "/api/users")
        .with_status(201)
        .with_body(user_body("u-4"))
        .create_async()
        .await;
    server
        .mock("PUT", "/api/users/u-4/preferences")
        .with_status(500)
        .create_async()
        .await;

    let id = directory(&server).backend_user_id(&ada(), None).await.unwrap();
    assert_eq!(id, "u-4");
}

#[tokio::test]
async fn test_creation_conflict_recovers_via_email() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/users/clerk/clerk_1")
        .with_status(404)
        .create_async()
        .await;
    let missing = server
        .mock("GET", email_path())
        .with_status(404)
        .expect(1)
        .create_async()
        .await;
    let found = server
        .mock("GET", email_path())
        .with_status(200)
        .with_body(user_body("u-5"))
        .expect(1)
        .create_async()
        .await;
    server
        .mock("POST", "/api/users")
        .with_status(409)
        .with_body("duplicate email")
        .create_async()
        .await;

    let id = directory(&server).backend_user_id(&ada(), None).await.unwrap();

    assert_eq!(id, "u-5");
    missing.assert_async().await;
    found.assert_async().await;
}

#[tokio::test]
async fn test_creation_failure_without_match_is_surfaced() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/users/clerk/clerk_1")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", email_path())
        .with_status(404)
        .expect(2)
        .create_async()
        .await;
    server
        .mock("POST", "/api/users")
        .with_status(409)
        .with_body("duplicate email")
        .create_async()
        .await;

    let directory = directory(&server);
    let err = directory.backend_user_id(&ada(), None).await.unwrap_err();

    assert!(matches!(err, ApiError::Client { status: 409, .. }));
    assert_eq!(directory.cached("clerk_1").await, None);
}

#[tokio::test]
async fn test_lookup_errors_other_than_not_found_propagate() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/users/clerk/clerk_1")
        .with_status(403)
        .create_async()
        .await;
    let create = server.mock("POST", "/api/users").expect(0).create_async().await;

    let err = directory(&server).backend_user_id(&ada(), None).await.unwrap_err();

    assert!(matches!(err, ApiError::Forbidden));
    create.assert_async().await;
}

#[tokio::test]
async fn test_clear_forces_fresh_lookup() {
    let mut server = Server::new_async().await;
    let clerk = server
        .mock("GET", "/api/users/clerk/clerk_1")
        .with_status(200)
        .with_body(user_body("u-6"))
        .expect(2)
        .create_async()
        .await;

    let directory = directory(&server);
    directory.backend_user_id(&ada(), None).await.unwrap();
    directory.clear().await;
    assert_eq!(directory.cached("clerk_1").await, None);
    directory.backend_user_id(&ada(), None).await.unwrap();

    clerk.assert_async().await;
}
