use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Bearer credential issued by `/auth/token`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OAuthToken {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime of the access token in seconds
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl OAuthToken {
    /// When the access token expires, given the time it was issued
    ///
    /// `None` if `expires_in` puts the expiry outside the representable range.
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        TimeDelta::try_seconds(self.expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
    }
}
