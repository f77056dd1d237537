use crate::{
    actions::CliActionError, configuration::Configuration, time_utils,
    token_cache::TokenCache, vicohome::VicoApiClient,
};
use chrono::Utc;
use tracing::trace;

pub async fn login() -> Result<(), CliActionError> {
    trace!("Executing \"auth login\" command...");

    let configuration = Configuration::load_default()?;
    let api = VicoApiClient::from_configuration(&configuration)?;
    api.login().await?;

    match api.cache().and_then(TokenCache::read_entry) {
        Some(entry) => println!(
            "Login successful. Token cached until {}",
            time_utils::to_display(entry.expires_at)
        ),
        None => println!("Login successful"),
    }
    Ok(())
}

pub fn logout() -> Result<(), CliActionError> {
    trace!("Executing \"auth logout\" command...");

    let cache = TokenCache::new()?;
    cache.clear()?;
    println!("Token cache cleared");
    Ok(())
}

pub fn print_expiration() -> Result<(), CliActionError> {
    trace!("Executing \"auth expiration\" command...");

    let cache = TokenCache::new()?;
    match cache.read_entry() {
        Some(entry) if entry.is_valid_at(Utc::now()) => println!(
            "Token expires at {}",
            time_utils::to_display(entry.expires_at)
        ),
        Some(entry) => println!(
            "Token expired at {}",
            time_utils::to_display(entry.expires_at)
        ),
        None => println!("No cached token"),
    }
    Ok(())
}
