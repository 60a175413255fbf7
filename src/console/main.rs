/**
 * APM Console - Headless Entry Point
 *
 * Drives the collection synchronizer from the command line:
 *
 *   apm-console                       list the collection
 *   apm-console create <name> [type]  create a record, then list
 *   apm-console delete <id>           delete a record, then list
 *
 * Reads CONSOLE_API_URL / CONSOLE_COLLECTION_PATH / CONSOLE_TIMEOUT_SECS and,
 * when both are set, logs in with CONSOLE_EMAIL / CONSOLE_PASSWORD first.
 */
use apm_console::console::auth::{self, AuthState};
use apm_console::console::collection::{LoadStatus, Synchronizer};
use apm_console::console::types::LoginRequest;
use apm_console::console::{build_client, Config, HttpGateway};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let mut config = Config::from_env()?;
    tracing::info!("[STARTUP] Using collection at {}", config.collection_url());
    let client = build_client(&config)?;

    let credentials = (std::env::var("CONSOLE_EMAIL"), std::env::var("CONSOLE_PASSWORD"));
    if let (Ok(email), Ok(password)) = credentials {
        let mut auth_state = AuthState::new();
        let request = LoginRequest {
            email,
            password,
            mfa_code: std::env::var("CONSOLE_MFA_CODE").ok(),
        };
        match auth::login(&client, &config, &request).await {
            Ok(response) => auth_state.apply_login(response, &mut config),
            Err(e) => {
                tracing::error!("[AUTH] Login failed: {}", e);
                return Err(e.into());
            }
        }
        if auth_state.requires_mfa {
            return Err("server requires an MFA code, set CONSOLE_MFA_CODE".into());
        }
    }

    let gateway = HttpGateway::with_client(config, client);
    let mut sync = Synchronizer::new(gateway, tokio::runtime::Handle::current());
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("list") => {}
        Some("create") => {
            let name = args.get(1).ok_or("usage: apm-console create <name> [type]")?;
            sync.open_create()?;
            if let Some(input) = sync.create_input() {
                input.display_name = name.clone();
                if let Some(software_type) = args.get(2) {
                    input.software_type = software_type.clone();
                }
            }
            sync.submit_create()?;
            sync.settle().await;
            if let Some(error) = sync.state().create_form().error() {
                return Err(error.to_string().into());
            }
        }
        Some("delete") => {
            let id = args.get(1).ok_or("usage: apm-console delete <id>")?;
            sync.refresh();
            sync.settle().await;
            sync.request_delete(id)?;
            sync.confirm_delete()?;
            sync.settle().await;
            if let Some(error) = sync.state().store().last_error() {
                return Err(error.to_string().into());
            }
        }
        Some(other) => return Err(format!("unknown command '{}'", other).into()),
    }

    sync.refresh();
    sync.settle().await;

    let store = sync.state().store();
    if store.status() == LoadStatus::Error {
        let error = store.last_error().unwrap_or("failed to load collection");
        return Err(error.to_string().into());
    }

    println!("{:<38} {:<32} {:<11} {}", "ID", "NAME", "TYPE", "VENDOR");
    for software in store.iter() {
        println!(
            "{:<38} {:<32} {:<11} {}",
            software.id,
            software.display_name,
            software.software_type,
            software.vendor.as_deref().unwrap_or("-"),
        );
    }
    println!("{} record(s)", store.len());

    Ok(())
}
