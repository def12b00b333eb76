//! Access token resolution.
//!
//! Short-lived page tokens expire after about two hours, which is not enough
//! for exporting a busy page. With `--longlived` the token is exchanged once
//! and the result kept in the config file for later runs.

use chrono::{Duration, Local};

use crate::domain::{AppError, Result, TokenExchange};
use crate::infrastructure::ConfigFile;

use super::normalizer::DISPLAY_TIME_FORMAT;

/// Pick the access token for this run, exchanging and persisting a
/// long-lived token when requested and none is stored yet.
///
/// # Errors
/// Returns a token error if app credentials are missing, or the exchange
/// error. Failing to persist the new token is only logged.
pub async fn resolve_access_token<E: TokenExchange>(
    store: &mut ConfigFile,
    use_long_lived: bool,
    exchanger: &E,
) -> Result<String> {
    let config = store.config();
    if !use_long_lived {
        return Ok(config.short_lived_token.clone());
    }
    if let Some(token) = config.long_lived_token() {
        tracing::debug!("Using stored long-lived token");
        return Ok(token.to_string());
    }

    let (app_id, app_secret) = config.app_credentials().ok_or_else(|| AppError::Token {
        message: "appId and appSecret are required for getting a long-lived token".into(),
    })?;

    tracing::info!("Exchanging short-lived token for a long-lived one");
    let exchanged = exchanger
        .exchange_token(app_id, app_secret, &config.short_lived_token)
        .await?;

    if exchanged.expires_in > 0 {
        let expires_at = i64::try_from(exchanged.expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|d| Local::now().checked_add_signed(d));
        if let Some(at) = expires_at {
            tracing::info!(
                expires_at = %at.format(DISPLAY_TIME_FORMAT),
                "Long-lived token expiration"
            );
        }
    }

    store.config_mut().long_lived_token = Some(exchanged.access_token.clone());
    if let Err(e) = store.save() {
        tracing::warn!(error = %e, "Cannot save long-lived token to config");
    }

    Ok(exchanged.access_token)
}
