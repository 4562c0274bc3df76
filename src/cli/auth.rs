use anyhow::Context;
use clap::Subcommand;
use revolut_business::config::{Config, RevolutConfig};
use revolut_business::error::{Error, Result};
use revolut_business::models::OAuthToken;
use revolut_business::{RevolutClient, create_jwt_token};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;
use tiny_http::{Response, Server};
use tracing::{debug, info, instrument};
use url::Url;

const TOKEN_CACHE_FILE: &str = "tokens.json";

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Authorize the application and cache the issued tokens
    Login {
        /// Authorization code from the redirect; waits on the local redirect URL when omitted
        #[arg(long)]
        code: Option<String>,
    },
    /// Exchange the cached refresh token for a new access token
    Refresh,
    /// Remove cached tokens
    Reset,
}

impl AuthAction {
    pub async fn execute(&self) -> Result<()> {
        match self {
            AuthAction::Login { code } => {
                let config = Config::load()?;
                login(&config.revolut, code.clone()).await
            }
            AuthAction::Refresh => {
                let config = Config::load()?;
                let tokens = load_tokens()?.ok_or_else(not_logged_in)?;
                refresh(&config.revolut, &tokens).await?;
                info!("Access token refreshed");
                Ok(())
            }
            AuthAction::Reset => clear_tokens(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
struct StoredTokens {
    access_token: String,
    refresh_token: String,
    /// Expiry time as seconds since Unix epoch
    expires_at: i64,
}

impl StoredTokens {
    /// Build from a token response, keeping the previous refresh token when
    /// the response carries none
    fn from_response(token: OAuthToken, fallback_refresh_token: Option<&str>) -> Result<Self> {
        let expires_at = token
            .expires_at(chrono::Utc::now())
            .ok_or_else(|| {
                Error::Auth(format!("Token lifetime out of range: {}s", token.expires_in))
            })?
            .timestamp();

        let refresh_token = match token.refresh_token {
            Some(refresh_token) => refresh_token,
            None => fallback_refresh_token
                .map(str::to_string)
                .ok_or_else(|| Error::Auth("No refresh token received".to_string()))?,
        };

        Ok(Self {
            access_token: token.access_token,
            refresh_token,
            expires_at,
        })
    }

    /// Expired or expiring within a minute
    fn is_expired(&self) -> bool {
        self.expires_at < chrono::Utc::now().timestamp() + 60
    }
}

fn not_logged_in() -> Error {
    Error::Auth("No cached tokens, run `revolut auth login` first".to_string())
}

fn client_assertion(config: &RevolutConfig) -> Result<String> {
    let private_key = fs::read(&config.private_key)
        .with_context(|| format!("Failed to read private key {:?}", config.private_key))?;

    create_jwt_token(&config.client_id, &config.issuer()?, &private_key)
}

#[instrument(name = "Authorizing with Revolut", skip_all)]
async fn login(config: &RevolutConfig, code: Option<String>) -> Result<()> {
    let code = match code {
        Some(code) => code,
        None => wait_for_code(config)?,
    };

    let client = RevolutClient::new(config.environment)?;
    let assertion = client_assertion(config)?;
    let token = client
        .get_token(&config.client_id, &code, &assertion)
        .await?;

    save_tokens(&StoredTokens::from_response(token, None)?)?;
    info!("Revolut authorization complete");

    Ok(())
}

async fn refresh(config: &RevolutConfig, tokens: &StoredTokens) -> Result<StoredTokens> {
    let client = RevolutClient::new(config.environment)?;
    let assertion = client_assertion(config)?;
    let token = client
        .refresh_token(&config.client_id, &assertion, &tokens.refresh_token)
        .await?;

    let refreshed = StoredTokens::from_response(token, Some(&tokens.refresh_token))?;
    save_tokens(&refreshed)?;

    Ok(refreshed)
}

/// Serve the redirect URL locally until Revolut sends the authorization code
fn wait_for_code(config: &RevolutConfig) -> Result<String> {
    let redirect = Url::parse(&config.redirect_url)
        .map_err(|e| Error::Config(format!("Invalid redirect_url: {}", e)))?;

    if !matches!(redirect.host_str(), Some("localhost" | "127.0.0.1")) {
        return Err(Error::Auth(
            "redirect_url is not local, pass the code with --code".to_string(),
        ));
    }

    let port = redirect.port_or_known_default().unwrap_or(80);
    let bind_addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&bind_addr)
        .map_err(|e| Error::Auth(format!("Failed to bind to {}: {}", bind_addr, e)))?;

    println!(
        "Open this URL in your browser:\n{}",
        config.authorize_url()?
    );
    println!();
    println!("Waiting for authorization...");

    let request = server
        .recv()
        .map_err(|e| Error::Auth(format!("Failed to receive request: {}", e)))?;

    let callback = redirect
        .join(request.url())
        .map_err(|e| Error::Auth(format!("Failed to parse callback URL: {}", e)))?;
    let code = extract_code(&callback);

    let body = match &code {
        Ok(_) => "Authorization received! You can close this window.",
        Err(_) => "Authorization failed, check the terminal.",
    };
    request
        .respond(Response::from_string(body))
        .map_err(|e| Error::Auth(format!("Failed to send response: {}", e)))?;

    code
}

fn extract_code(callback: &Url) -> Result<String> {
    if let Some((_, error)) = callback.query_pairs().find(|(key, _)| key == "error") {
        return Err(Error::Auth(format!("Authorization denied: {}", error)));
    }

    callback
        .query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, code)| code.into_owned())
        .ok_or_else(|| Error::Auth("No code in callback".to_string()))
}

/// Client carrying a valid access token, refreshing the cached one if needed
#[instrument(name = "Authenticating to Revolut", skip_all)]
pub(super) async fn authenticated_client(config: &RevolutConfig) -> Result<RevolutClient> {
    let mut tokens = load_tokens()?.ok_or_else(not_logged_in)?;

    if tokens.is_expired() {
        debug!("Access token expired, refreshing...");
        tokens = refresh(config, &tokens).await?;
    } else {
        debug!("Using cached Revolut tokens");
    }

    let mut client = RevolutClient::new(config.environment)?;
    client.set_token(tokens.access_token);

    Ok(client)
}

fn token_cache_path() -> Result<PathBuf> {
    Config::cache_file(TOKEN_CACHE_FILE)
}

fn load_tokens() -> Result<Option<StoredTokens>> {
    let token_path = token_cache_path()?;

    if !token_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&token_path)
        .map_err(|e| Error::Auth(format!("Failed to read tokens file: {}", e)))?;

    let tokens: StoredTokens = serde_json::from_str(&contents)
        .map_err(|e| Error::Auth(format!("Failed to parse tokens: {}", e)))?;

    Ok(Some(tokens))
}

fn save_tokens(tokens: &StoredTokens) -> Result<()> {
    let token_path = token_cache_path()?;

    if let Some(parent) = token_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Auth(format!("Failed to create token cache directory: {}", e)))?;
    }

    let contents = serde_json::to_string_pretty(tokens)?;

    // Owner read/write only
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .mode(0o600)
        .open(&token_path)
        .map_err(|e| Error::Auth(format!("Failed to create tokens file: {}", e)))?;

    file.write_all(contents.as_bytes())
        .map_err(|e| Error::Auth(format!("Failed to write tokens file: {}", e)))?;

    Ok(())
}

#[instrument(name = "Clearing cached Revolut tokens", skip_all)]
fn clear_tokens() -> Result<()> {
    let token_path = token_cache_path()?;

    if !token_path.exists() {
        debug!("No Revolut tokens to clear");
        return Ok(());
    }

    fs::remove_file(&token_path)
        .map_err(|e| Error::Auth(format!("Failed to delete tokens file: {}", e)))?;
    info!("Cleared Revolut cached tokens");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(refresh_token: Option<&str>) -> OAuthToken {
        OAuthToken {
            access_token: "oa_sand_access".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 2399,
            refresh_token: refresh_token.map(str::to_string),
        }
    }

    #[test]
    fn test_stored_tokens_from_response() {
        let stored = StoredTokens::from_response(token(Some("oa_sand_refresh")), None).unwrap();

        assert_eq!(stored.refresh_token, "oa_sand_refresh");
        assert!(!stored.is_expired());
    }

    #[test]
    fn test_refresh_keeps_previous_refresh_token() {
        let stored = StoredTokens::from_response(token(None), Some("previous")).unwrap();
        assert_eq!(stored.refresh_token, "previous");
    }

    #[test]
    fn test_missing_refresh_token_rejected() {
        let result = StoredTokens::from_response(token(None), None);
        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[test]
    fn test_out_of_range_lifetime_rejected() {
        let mut token = token(Some("oa_sand_refresh"));
        token.expires_in = i64::MAX;

        let result = StoredTokens::from_response(token, None);
        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[test]
    fn test_expired_tokens() {
        let stored = StoredTokens {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: chrono::Utc::now().timestamp() + 30,
        };
        assert!(stored.is_expired());
    }

    #[test]
    fn test_extract_code() {
        let url = Url::parse("http://localhost:3000/callback?code=oa_sand_code").unwrap();
        assert_eq!(extract_code(&url).unwrap(), "oa_sand_code");

        let url = Url::parse("http://localhost:3000/callback?error=access_denied").unwrap();
        assert!(matches!(extract_code(&url), Err(Error::Auth(_))));

        let url = Url::parse("http://localhost:3000/callback").unwrap();
        assert!(extract_code(&url).is_err());
    }
}
