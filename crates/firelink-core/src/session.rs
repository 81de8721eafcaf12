//! Signed-in user session as returned by the identity provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Seconds before actual expiry at which a token is already treated as expired
const EXPIRY_SKEW_SECS: i64 = 60;

/// A decoded sign-in, sign-up or token refresh response.
///
/// Only `local_id`, `id_token` and `refresh_token` carry meaning for the rest
/// of the crate; the profile fields are whatever the provider returned.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub local_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Short-lived bearer token attached to database requests
    #[serde(default)]
    pub id_token: String,
    /// Long-lived token exchangeable for a new `id_token`
    #[serde(default)]
    pub refresh_token: String,
    /// Lifetime of `id_token`; the provider sends it as a decimal string
    #[serde(
        default,
        deserialize_with = "deserialize_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub registered: bool,
    /// Local decode time, the reference point for `expires_in`
    #[serde(skip, default = "Utc::now")]
    pub issued_at: DateTime<Utc>,
}

impl SessionUser {
    /// Build a session from bare tokens, e.g. a token refresh response
    pub fn from_tokens(
        local_id: impl Into<String>,
        id_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: Option<u64>,
    ) -> Self {
        Self {
            kind: None,
            local_id: local_id.into(),
            email: None,
            display_name: None,
            id_token: id_token.into(),
            refresh_token: refresh_token.into(),
            expires_in,
            registered: false,
            issued_at: Utc::now(),
        }
    }

    /// The id token, if the provider actually issued one
    pub fn bearer_token(&self) -> Option<&str> {
        Some(self.id_token.as_str()).filter(|t| !t.is_empty())
    }

    /// Whether `id_token` is past (or within a minute of) its expiry
    pub fn is_expired(&self) -> bool {
        match self.remaining_lifetime() {
            Some(remaining) => remaining < EXPIRY_SKEW_SECS,
            None => false,
        }
    }

    /// Seconds until `id_token` expires; negative once expired.
    ///
    /// `None` without an `expires_in`, or when it is too large to represent.
    pub fn remaining_lifetime(&self) -> Option<i64> {
        let expiry = self
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(chrono::Duration::try_seconds)
            .and_then(|lifetime| self.issued_at.checked_add_signed(lifetime))?;
        Some((expiry - Utc::now()).num_seconds())
    }
}

/// Sessions are equal when the provider returned the same identity and tokens
impl PartialEq for SessionUser {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.local_id == other.local_id
            && self.email == other.email
            && self.display_name == other.display_name
            && self.id_token == other.id_token
            && self.refresh_token == other.refresh_token
            && self.expires_in == other.expires_in
            && self.registered == other.registered
    }
}

impl Eq for SessionUser {}

impl fmt::Debug for SessionUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionUser")
            .field("local_id", &self.local_id)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("id_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("registered", &self.registered)
            .finish()
    }
}

/// Pretty JSON of the decoded fields
impl fmt::Display for SessionUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Lifetime in seconds, sent either as a decimal string or a number
pub(crate) fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(u64),
        Text(String),
    }

    match Option::<Seconds>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Seconds::Number(n)) => Ok(Some(n)),
        Some(Seconds::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid expiresIn value '{}'", s))),
    }
}
