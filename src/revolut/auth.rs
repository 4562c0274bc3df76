use super::RevolutClient;
use crate::error::Result;
use crate::models::OAuthToken;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Audience expected by Revolut in every client assertion
pub const AUDIENCE: &str = "https://revolut.com";
const ASSERTION_TTL_SECS: i64 = 60 * 60;
const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Claims of the JWT sent as `client_assertion` to `/auth/token`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClientAssertionClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl ClientAssertionClaims {
    fn new(client_id: &str, issuer: &str, issued_at: DateTime<Utc>) -> Self {
        let iat = issued_at.timestamp();
        Self {
            iss: issuer.to_string(),
            sub: client_id.to_string(),
            aud: AUDIENCE.to_string(),
            iat,
            exp: iat + ASSERTION_TTL_SECS,
        }
    }
}

/// Sign a one hour client assertion with the application's RSA private key
///
/// `issuer` is the domain of the redirect URI registered with Revolut and
/// `private_key` is PEM encoded. No network call is made.
pub fn create_jwt_token(client_id: &str, issuer: &str, private_key: &[u8]) -> Result<String> {
    sign_assertion(client_id, issuer, private_key, Utc::now())
}

fn sign_assertion(
    client_id: &str,
    issuer: &str,
    private_key: &[u8],
    issued_at: DateTime<Utc>,
) -> Result<String> {
    let key = EncodingKey::from_rsa_pem(private_key)?;
    let claims = ClientAssertionClaims::new(client_id, issuer, issued_at);

    Ok(jsonwebtoken::encode(
        &Header::new(Algorithm::RS256),
        &claims,
        &key,
    )?)
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
    client_id: &'a str,
    client_assertion_type: &'static str,
    client_assertion: &'a str,
}

impl RevolutClient {
    /// Exchange an authorization code for an access and refresh token
    ///
    /// The returned token is not installed on the client; pass it to
    /// [`RevolutClient::set_token`].
    #[instrument(name = "Exchanging authorization code", skip_all)]
    pub async fn get_token(
        &self,
        client_id: &str,
        code: &str,
        jwt_assertion: &str,
    ) -> Result<OAuthToken> {
        let form = TokenRequest {
            grant_type: "authorization_code",
            code: Some(code),
            refresh_token: None,
            client_id,
            client_assertion_type: CLIENT_ASSERTION_TYPE,
            client_assertion: jwt_assertion,
        };

        self.request_token(&form).await
    }

    /// Obtain a new access token from a refresh token
    #[instrument(name = "Refreshing access token", skip_all)]
    pub async fn refresh_token(
        &self,
        client_id: &str,
        jwt_assertion: &str,
        refresh_token: &str,
    ) -> Result<OAuthToken> {
        let form = TokenRequest {
            grant_type: "refresh_token",
            code: None,
            refresh_token: Some(refresh_token),
            client_id,
            client_assertion_type: CLIENT_ASSERTION_TYPE,
            client_assertion: jwt_assertion,
        };

        self.request_token(&form).await
    }

    async fn request_token(&self, form: &TokenRequest<'_>) -> Result<OAuthToken> {
        let url = self.endpoint(&["auth", "token"])?;
        let request = self.http_client().request(Method::POST, url).form(form);

        self.send_json(request).await
    }
}
