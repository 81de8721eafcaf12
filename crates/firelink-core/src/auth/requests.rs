//! Request and response bodies for the identity and token endpoints

use crate::session::{SessionUser, deserialize_seconds};
use serde::{Deserialize, Serialize};

pub(crate) const SIGN_UP: &str = "signUp";
pub(crate) const SIGN_IN_WITH_PASSWORD: &str = "signInWithPassword";
pub(crate) const SEND_OOB_CODE: &str = "sendOobCode";

/// Body for `accounts:signUp` and `accounts:signInWithPassword`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

/// Body for `accounts:sendOobCode`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OobCodeRequest<'a> {
    pub request_type: &'static str,
    pub email: &'a str,
}

impl<'a> OobCodeRequest<'a> {
    pub fn password_reset(email: &'a str) -> Self {
        Self {
            request_type: "PASSWORD_RESET",
            email,
        }
    }
}

/// Body for the secure token endpoint
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub grant_type: &'static str,
    #[serde(rename = "refreshToken")]
    pub refresh_token: &'a str,
}

impl<'a> RefreshRequest<'a> {
    pub fn new(refresh_token: &'a str) -> Self {
        Self {
            grant_type: "refresh_token",
            refresh_token,
        }
    }
}

/// The token endpoint answers in snake_case, unlike the identity endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    #[serde(alias = "idToken")]
    pub id_token: String,
    #[serde(alias = "refreshToken")]
    pub refresh_token: String,
    #[serde(default, alias = "expiresIn", deserialize_with = "deserialize_seconds")]
    pub expires_in: Option<u64>,
    #[serde(default, alias = "localId")]
    pub user_id: String,
}

impl RefreshResponse {
    pub fn into_session(self) -> SessionUser {
        SessionUser::from_tokens(
            self.user_id,
            self.id_token,
            self.refresh_token,
            self.expires_in,
        )
    }
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: String,
}

/// Pull `error.message` (e.g. `EMAIL_EXISTS`) out of a rejection body
pub(crate) fn provider_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ProviderErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
        .filter(|m| !m.is_empty())
}
