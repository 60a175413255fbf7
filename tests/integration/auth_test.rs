//! Authentication client integration tests
//!
//! Tests for the login and register calls against a mock API.

use apm_console::console::auth::{self, AuthState, RegistrationForm};
use apm_console::console::types::LoginRequest;
use apm_console::console::{
    build_client, CollectionGateway, Config, FailureClass, GatewayError, HttpGateway,
};
use reqwest::Client;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::assert_ok;
use crate::common::{config_for, list_body, COLLECTION_PATH};

fn user_json() -> serde_json::Value {
    json!({
        "id": "u-1",
        "email": "ops@example.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "role": "admin",
        "mfa_enabled": false,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
}

fn client(config: &Config) -> Client {
    build_client(config).expect("http client")
}

fn login_request() -> LoginRequest {
    LoginRequest {
        email: "ops@example.com".to_string(),
        password: "Correct-horse1!".to_string(),
        mfa_code: None,
    }
}

#[tokio::test]
async fn test_login_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({ "email": "ops@example.com", "password": "Correct-horse1!" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(),
            "access_token": "jwt-token",
            "refresh_token": "refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let response = assert_ok!(auth::login(&client(&config), &config, &login_request()).await);
    assert_eq!(response.access_token, "jwt-token");
    assert_eq!(response.refresh_token.as_deref(), Some("refresh"));
    assert_eq!(response.user.email, "ops@example.com");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let config = config_for(&server);
    let err = auth::login(&client(&config), &config, &login_request())
        .await
        .unwrap_err();
    assert_eq!(err, GatewayError::server(401, "Invalid credentials"));
    assert_eq!(err.class(), FailureClass::Client);
}

#[tokio::test]
async fn test_login_token_reaches_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(),
            "access_token": "jwt-token"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(COLLECTION_PATH))
        .and(header("Authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    let client = client(&config);
    let mut state = AuthState::new();
    let response = assert_ok!(auth::login(&client, &config, &login_request()).await);
    state.apply_login(response, &mut config);
    assert!(state.authenticated);

    // The gateway keeps using the client the login went through
    let gateway = HttpGateway::with_client(config, client);
    assert_ok!(gateway.list().await);
    assert_ok!(auth::login(gateway.client(), gateway.config(), &login_request()).await);
}

#[tokio::test]
async fn test_register_sends_validated_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .and(body_json(json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "email": "ada@example.com",
            "organisation": "Analytical",
            "password": "Correct-horse1!"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let form = RegistrationForm {
        firstname: " Ada ".to_string(),
        lastname: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        organisation: "Analytical".to_string(),
        password: "Correct-horse1!".to_string(),
        confirm_password: "Correct-horse1!".to_string(),
    };
    let request = assert_ok!(form.validate());
    let config = config_for(&server);
    assert_ok!(auth::register(&client(&config), &config, &request).await);
}

#[tokio::test]
async fn test_register_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({ "error": "Email already registered" })),
        )
        .mount(&server)
        .await;

    let form = RegistrationForm {
        firstname: "Ada".to_string(),
        lastname: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        organisation: "Analytical".to_string(),
        password: "Correct-horse1!".to_string(),
        confirm_password: "Correct-horse1!".to_string(),
    };
    let request = assert_ok!(form.validate());
    let config = config_for(&server);
    let err = auth::register(&client(&config), &config, &request)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Request failed (409): Email already registered");
}
