/**
 * Console Client
 *
 * Client side of the portfolio admin console: configuration, the HTTP
 * gateway to the software collection, authentication, and the collection
 * screen state driven by the synchronizer.
 */

pub mod auth;
pub mod collection;
pub mod config;
pub mod error;
pub mod gateway;
pub mod types;

pub use auth::{AuthState, PasswordChecks, RegistrationForm};
pub use collection::{ConsoleState, Synchronizer};
pub use config::Config;
pub use error::{ConsoleError, FailureClass, GatewayError};
pub use gateway::{build_client, CollectionGateway, HttpGateway};
