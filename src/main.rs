//! chargedeck - a terminal admin console for EV charging station fleets
//!
//! This is the binary entry point: argument parsing, logging, settings,
//! session bootstrap (login), then hand-off to the TUI runner.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use chargedeck_api::ApiClient;
use chargedeck_app::config::{
    clear_session, load_session, load_settings, save_session, session_path,
};
use chargedeck_app::AppState;
use chargedeck_core::prelude::*;
use chargedeck_core::AuthSession;

/// A terminal admin console for EV charging station fleets
#[derive(Parser, Debug)]
#[command(name = "chargedeck")]
#[command(about = "A terminal admin console for EV charging station fleets", long_about = None)]
struct Args {
    /// Path to config.toml (defaults to the platform config dir)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the backend base URL from the config file
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Discard any stored session and sign in again
    #[arg(long)]
    fresh_login: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Err(e) = chargedeck_core::logging::init() {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let mut settings = match load_settings(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    if let Some(base_url) = args.base_url {
        settings.api.base_url = base_url;
    }

    let api = match ApiClient::new(
        &settings.api.base_url,
        Duration::from_secs(settings.api.timeout_seconds),
    ) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let session_file = session_path();
    if args.fresh_login {
        clear_session(&session_file);
    }

    let session = match bootstrap_session(&api, &session_file).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    eprintln!("✅ Signed in as {}", session.user.email);

    let state = AppState::new(session, settings);
    let final_state = chargedeck_tui::run(state, api).await?;

    if final_state.session_invalid {
        clear_session(&session_file);
        eprintln!("Session expired. Sign in again next time.");
    } else if let Err(e) = save_session(&session_file, &final_state.session) {
        warn!("Failed to persist session: {e}");
    }

    Ok(())
}

/// Produce a usable session: the stored one if still valid, refreshed if
/// the refresh token works, interactive login otherwise.
async fn bootstrap_session(api: &ApiClient, session_file: &std::path::Path) -> Result<AuthSession> {
    if let Some(stored) = load_session(session_file) {
        if !stored.is_expired(chrono::Utc::now()) {
            return Ok(stored);
        }
        info!("Stored session expired; trying refresh token");
        match chargedeck_api::refresh_token(api, &stored.refresh_token).await {
            Ok(refreshed) => {
                save_session(session_file, &refreshed)?;
                return Ok(refreshed);
            }
            Err(e) => {
                warn!("Refresh failed ({e}); falling back to login");
                clear_session(session_file);
            }
        }
    }
    interactive_login(api, session_file).await
}

/// Prompt for credentials (and a one-time code when the backend asks for
/// one) until login succeeds or the user aborts.
async fn interactive_login(
    api: &ApiClient,
    session_file: &std::path::Path,
) -> Result<AuthSession> {
    loop {
        let email: String = dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| Error::terminal(e.to_string()))?;
        let password = dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| Error::terminal(e.to_string()))?;

        match chargedeck_api::login(api, &email, &password).await {
            Ok(session) => {
                save_session(session_file, &session)?;
                return Ok(session);
            }
            // Fresh accounts get a 401 asking for the emailed one-time code.
            Err(Error::Api { status: 401, message })
                if message.to_lowercase().contains("code") =>
            {
                eprintln!("{message}");
                let session = otp_login(api, &email).await?;
                save_session(session_file, &session)?;
                return Ok(session);
            }
            Err(e) => eprintln!("❌ {e}"),
        }
    }
}

async fn otp_login(api: &ApiClient, email: &str) -> Result<AuthSession> {
    loop {
        let code: String = dialoguer::Input::new()
            .with_prompt("One-time code (empty to resend)")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::terminal(e.to_string()))?;

        if code.trim().is_empty() {
            match chargedeck_api::resend_otp(api, email).await {
                Ok(()) => eprintln!("Code resent to {email}"),
                Err(e) => eprintln!("❌ {e}"),
            }
            continue;
        }
        match chargedeck_api::validate_otp(api, email, code.trim()).await {
            Ok(session) => return Ok(session),
            Err(e) => eprintln!("❌ {e}"),
        }
    }
}
