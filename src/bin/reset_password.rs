//! Tool amministrativo: sovrascrive la password di un utente dato l'indirizzo email.
//!
//! Uso: `reset-password <EMAIL> <NEW_PASSWORD>`

use anyhow::Context;
use auth_audit::core::{Config, logging};
use auth_audit::repositories::{UserRepository, create_pool_with};
use auth_audit::services::reset_password;
use clap::Parser;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "reset-password", version, about = "Reset a user's password")]
struct Cli {
    /// Email of the user to update
    email: String,

    /// New plaintext password (hashed before storing)
    new_password: String,
}

/// Esito del comando: codice di uscita e messaggio per l'operatore
#[derive(Debug)]
struct Outcome {
    code: u8,
    message: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let outcome = outcome(run(&cli).await, &cli.email);
    if outcome.code == 0 {
        println!("{}", outcome.message);
    } else {
        eprintln!("{}", outcome.message);
    }
    ExitCode::from(outcome.code)
}

/// 0 se la password è stata aggiornata, 1 per qualsiasi errore.
/// Gli errori di uso li gestisce clap (codice 2).
fn outcome(result: anyhow::Result<()>, email: &str) -> Outcome {
    match result {
        Ok(()) => Outcome {
            code: 0,
            message: format!("Password updated for {}", email),
        },
        Err(e) => Outcome {
            code: 1,
            message: format!("Error: {:#}", e),
        },
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let database_url = Config::database_url_from_env().map_err(anyhow::Error::msg)?;
    let pool = create_pool_with(&database_url, 1)
        .await
        .context("failed to connect to the database")?;
    let users = UserRepository::new(pool);

    reset_password(&users, &cli.email, &cli.new_password).await?;
    Ok(())
}
