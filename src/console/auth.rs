/**
 * Authentication Module
 *
 * HTTP client functions for login/register plus the client-side checks the
 * registration form runs before anything is sent.
 */

use reqwest::Client;
use serde::Serialize;

use crate::console::config::Config;
use crate::console::error::GatewayError;
use crate::console::types::{LoginRequest, LoginResponse, RegisterRequest, User};
use crate::shared::{ErrorResponse, SharedError};

const LOGIN_PATH: &str = "/api/v1/auth/login";
const REGISTER_PATH: &str = "/api/v1/auth/register";

/// Characters that satisfy the special-character rule
const SPECIAL_CHARS: &str = "!@#$%^&*";
const MIN_PASSWORD_LEN: usize = 12;

/// Authentication state
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub authenticated: bool,
    pub user: Option<User>,
    /// Set when the server asked for a second factor
    pub requires_mfa: bool,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a login result and hand the bearer token to `config`.
    ///
    /// An MFA challenge leaves the session unauthenticated.
    pub fn apply_login(&mut self, response: LoginResponse, config: &mut Config) {
        if response.requires_mfa && response.access_token.is_empty() {
            tracing::info!("[AUTH] Second factor required for {}", response.user.email);
            self.requires_mfa = true;
            return;
        }
        tracing::info!("[AUTH] Logged in as {}", response.user.email);
        config.set_token(Some(response.access_token));
        self.requires_mfa = false;
        self.authenticated = true;
        self.user = Some(response.user);
    }

    pub fn logout(&mut self, config: &mut Config) {
        config.clear_token();
        *self = Self::default();
    }
}

/// Login with email and password
pub async fn login(
    client: &Client,
    config: &Config,
    request: &LoginRequest,
) -> Result<LoginResponse, GatewayError> {
    tracing::debug!("[AUTH] POST {}", LOGIN_PATH);
    let body = post(client, config, LOGIN_PATH, request).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Create an account. Success carries no body the client relies on; the
/// user logs in afterwards.
pub async fn register(
    client: &Client,
    config: &Config,
    request: &RegisterRequest,
) -> Result<(), GatewayError> {
    tracing::debug!("[AUTH] POST {}", REGISTER_PATH);
    post(client, config, REGISTER_PATH, request).await?;
    tracing::info!("[AUTH] Registered {}", request.email);
    Ok(())
}

/// POST a JSON body and return the response text of a 2xx answer
async fn post<B: Serialize + ?Sized>(
    client: &Client,
    config: &Config,
    path: &str,
    body: &B,
) -> Result<String, GatewayError> {
    let response = client.post(config.api_url(path)).json(body).send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .ok()
            .and_then(|body| body.best_message().map(str::to_string))
            .unwrap_or_else(|| {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            });
        tracing::warn!("[AUTH] {} failed: {} - {}", path, status, message);
        return Err(GatewayError::server(status.as_u16(), message));
    }

    Ok(text)
}

/// Which password rules a candidate satisfies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasswordChecks {
    pub length: bool,
    pub capital: bool,
    pub number: bool,
    pub special: bool,
}

impl PasswordChecks {
    pub fn evaluate(password: &str) -> Self {
        Self {
            length: password.chars().count() >= MIN_PASSWORD_LEN,
            capital: password.chars().any(|c| c.is_ascii_uppercase()),
            number: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| SPECIAL_CHARS.contains(c)),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.length && self.capital && self.number && self.special
    }
}

/// Registration form as typed by the user
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub organisation: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn password_checks(&self) -> PasswordChecks {
        PasswordChecks::evaluate(&self.password)
    }

    /// Run the client-side checks and build the request body
    pub fn validate(&self) -> Result<RegisterRequest, SharedError> {
        let required = [
            ("firstname", &self.firstname),
            ("lastname", &self.lastname),
            ("email", &self.email),
            ("organisation", &self.organisation),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(SharedError::validation(field, "This field is required"));
            }
        }
        if !self.email.contains('@') {
            return Err(SharedError::validation("email", "Enter a valid email address"));
        }
        if self.password != self.confirm_password {
            return Err(SharedError::validation("confirm_password", "Passwords do not match"));
        }
        if !self.password_checks().all_passed() {
            return Err(SharedError::validation(
                "password",
                "Password must be at least 12 characters with an uppercase letter, a number and one of !@#$%^&*",
            ));
        }

        Ok(RegisterRequest {
            firstname: self.firstname.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            email: self.email.trim().to_string(),
            organisation: self.organisation.trim().to_string(),
            password: self.password.clone(),
        })
    }
}
