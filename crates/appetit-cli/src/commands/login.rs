//! The interactive login command.

use anyhow::Result;
use appetit_client::{AuthApiClient, StoredCredentials, TokenStore};
use appetit_core::config::ClientConfig;
use colored::Colorize;
use std::io::{self, Write};

pub async fn run(config: &ClientConfig, email: &str) -> Result<()> {
    let client = AuthApiClient::new(config)?;

    let login_token = client.request_login(email).await?;
    println!(
        "{}",
        "Verification email sent. Check your inbox for the code.".green()
    );

    print!("Code: ");
    io::stdout().flush()?;
    let mut code = String::new();
    io::stdin().read_line(&mut code)?;

    client.authorize(code.trim()).await?;
    let bearer_token = client.exchange(&login_token).await?;

    let store = TokenStore::new()?;
    store.save(&StoredCredentials {
        bearer_token: Some(bearer_token),
        email: Some(email.to_string()),
    })?;

    println!(
        "{} Token stored at {}",
        "Logged in.".green().bold(),
        store.path().display()
    );
    Ok(())
}
