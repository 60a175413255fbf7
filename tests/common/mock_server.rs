//! Mock server helpers for integration tests
//!
//! Wraps a `wiremock::MockServer` standing in for the collection API.

use apm_console::console::{Config, HttpGateway};
use apm_console::shared::AppConfig;
use wiremock::MockServer;

pub const COLLECTION_PATH: &str = "/api/v1/software";

/// Client config pointing at the mock server
pub fn config_for(server: &MockServer) -> Config {
    Config::with_builder(AppConfig::builder().server_url(server.uri()))
        .expect("valid mock server url")
}

pub fn gateway_for(server: &MockServer) -> HttpGateway {
    HttpGateway::new(config_for(server)).expect("http client")
}

/// Gateway that sends `Authorization: Bearer <token>`
pub fn authorized_gateway_for(server: &MockServer, token: &str) -> HttpGateway {
    let mut config = config_for(server);
    config.set_token(Some(token.to_string()));
    HttpGateway::new(config).expect("http client")
}

pub fn item_path(id: &str) -> String {
    format!("{}/{}", COLLECTION_PATH, id)
}
