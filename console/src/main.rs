//! Admin console command line
//!
//! Drives the console stores against a live API.
//!
//! # Usage
//!
//! ```bash
//! export ADMIN_CONSOLE_API_URL=https://api.example.com/v1
//!
//! admin-console login root@example.com secret1   # prompts for the OTP
//! admin-console modules
//! admin-console use-module E-learning
//! admin-console status
//! admin-console logout
//! ```

use admin_console::auth::AuthAction;
use admin_console::dashboard::DashboardAction;
use admin_console::{Console, ConsoleConfig};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "admin-console", about = "Super-admin console client")]
struct Cli {
    /// Cookie jar file
    #[arg(long, env = "ADMIN_CONSOLE_COOKIE_PATH")]
    cookie_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in; prompts for the one-time passcode
    Login { email: String, password: String },
    /// Send a new passcode
    ResendOtp { email: String },
    /// List modules and their access flags
    Modules,
    /// Show the active module
    Current,
    /// Switch the active module
    UseModule { name: String },
    /// Print the session and dashboard state
    Status,
    /// End the session
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,admin_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ConsoleConfig::from_env().context("Failed to load configuration")?;
    if let Some(path) = cli.cookie_path {
        config = config.with_cookie_path(path);
    }
    let console = Console::from_config(&config);

    let outcome = run(&console, cli.command).await;
    if let Err(error) = console.shutdown(Duration::from_secs(5)).await {
        tracing::warn!(%error, "Effects still running at exit");
    }
    outcome
}

async fn run(console: &Console, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => login(console, &email, &password).await,
        Command::ResendOtp { email } => match console.resend_otp(&email).await? {
            AuthAction::ResendOtpSuccess { message, .. } => {
                println!("{message}");
                Ok(())
            },
            other => fail_auth(other),
        },
        Command::Modules => match console.fetch_modules().await? {
            DashboardAction::FetchModulesSuccess(_) => {
                let state = console.dashboard_state().await;
                for module in &state.modules {
                    let marker = if state.current_module.as_ref() == Some(module) { "*" } else { " " };
                    let coordinator = state.use_coordinator.get(module).copied().unwrap_or(false);
                    let producer = state.use_producer.get(module).copied().unwrap_or(false);
                    println!("{marker} {module}  coordinator={coordinator} producer={producer}");
                }
                Ok(())
            },
            other => fail_dashboard(other),
        },
        Command::Current => match console.fetch_current_module().await? {
            DashboardAction::FetchCurrentModuleSuccess(_) => {
                let state = console.dashboard_state().await;
                match (state.current_module.as_deref(), state.current_flags()) {
                    (Some(module), Some((coordinator, producer))) => {
                        println!("{module}  coordinator={coordinator} producer={producer}");
                    },
                    _ => println!("(none)"),
                }
                Ok(())
            },
            other => fail_dashboard(other),
        },
        Command::UseModule { name } => match console.update_current_module(&name).await? {
            DashboardAction::UpdateCurrentModuleSuccess(module) => {
                if let Some(module) = module {
                    console.select_module(&module).await?;
                    println!("Active module: {module}");
                } else {
                    println!("Server did not report an active module");
                }
                Ok(())
            },
            other => fail_dashboard(other),
        },
        Command::Status => {
            let auth = console.auth_state().await;
            let dashboard = console.dashboard_state().await;
            println!("{}", serde_json::to_string_pretty(&auth)?);
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
            Ok(())
        },
        Command::Logout => match console.logout().await? {
            AuthAction::LogoutSuccess => {
                println!("Signed out");
                Ok(())
            },
            other => fail_auth(other),
        },
    }
}

async fn login(console: &Console, email: &str, password: &str) -> anyhow::Result<()> {
    match console.login(email, password).await? {
        AuthAction::LoginSuccess { message } => println!("{message}"),
        other => return fail_auth(other),
    }

    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"One-time passcode: ").await?;
    stdout.flush().await?;

    let otp = BufReader::new(tokio::io::stdin())
        .lines()
        .next_line()
        .await?
        .context("No passcode entered")?;

    match console.verify_otp(email, &otp).await? {
        AuthAction::VerifyOtpSuccess(response) => {
            let name = response.data.map(|session| session.user.name).unwrap_or_default();
            println!("Signed in as {name}");
            Ok(())
        },
        other => fail_auth(other),
    }
}

fn fail_auth(action: AuthAction) -> anyhow::Result<()> {
    match action {
        AuthAction::LoginFailure { error }
        | AuthAction::VerifyOtpFailure { error }
        | AuthAction::ResendOtpFailure { error }
        | AuthAction::LogoutFailure { error } => bail!(error),
        other => bail!("Unexpected outcome: {other:?}"),
    }
}

fn fail_dashboard(action: DashboardAction) -> anyhow::Result<()> {
    match action {
        DashboardAction::FetchModulesFailure { error }
        | DashboardAction::FetchCurrentModuleFailure { error }
        | DashboardAction::UpdateCurrentModuleFailure { error } => bail!(error),
        other => bail!("Unexpected outcome: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_kebab_case_subcommands() {
        let cli = Cli::try_parse_from(["admin-console", "use-module", "E-learning"]).unwrap();
        assert!(matches!(cli.command, Command::UseModule { name } if name == "E-learning"));

        let cli = Cli::try_parse_from([
            "admin-console",
            "--cookie-path",
            "/tmp/jar.json",
            "login",
            "root@example.com",
            "secret1",
        ])
        .unwrap();
        assert_eq!(cli.cookie_path, Some(PathBuf::from("/tmp/jar.json")));
        assert!(matches!(
            cli.command,
            Command::Login { email, password } if email == "root@example.com" && password == "secret1"
        ));
    }

    #[test]
    fn rejects_missing_arguments() {
        assert!(Cli::try_parse_from(["admin-console", "resend-otp"]).is_err());
        assert!(Cli::try_parse_from(["admin-console"]).is_err());
    }
}
