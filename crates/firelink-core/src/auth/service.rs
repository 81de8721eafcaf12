//! Authentication against the identity toolkit and secure token endpoints

use super::requests::{
    OobCodeRequest, PasswordRequest, RefreshRequest, RefreshResponse, SEND_OOB_CODE,
    SIGN_IN_WITH_PASSWORD, SIGN_UP, provider_error_message,
};
use crate::config::{DEFAULT_IDENTITY_ENDPOINT, DEFAULT_TOKEN_ENDPOINT, FirebaseConfig};
use crate::credential::CredentialContext;
use crate::error::{FirelinkError, FirelinkResult};
use crate::session::SessionUser;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

/// Sign-up, sign-in, password reset and sign-out for one credential context.
///
/// Every network operation sends exactly one POST. Provider rejections are
/// reported as `None` or `false`; `Err` is reserved for empty arguments and
/// for transport failures where no response arrived.
///
/// The two sign-in paths replace the session on success and clear it on any
/// failure. `sign_up` never touches the session.
#[derive(Clone)]
pub struct AuthService {
    context: Arc<CredentialContext>,
    transport: Arc<dyn HttpTransport>,
    identity_endpoint: String,
    token_endpoint: String,
}

impl AuthService {
    /// Service talking to the public Google endpoints
    pub fn new(context: Arc<CredentialContext>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            context,
            transport,
            identity_endpoint: DEFAULT_IDENTITY_ENDPOINT.to_string(),
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
        }
    }

    /// Service using the endpoints named in `config`
    pub fn from_config(
        context: Arc<CredentialContext>,
        transport: Arc<dyn HttpTransport>,
        config: &FirebaseConfig,
    ) -> Self {
        Self::new(context, transport)
            .with_endpoints(config.identity_endpoint.clone(), config.token_endpoint.clone())
    }

    pub fn with_endpoints(
        mut self,
        identity_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
    ) -> Self {
        self.identity_endpoint = identity_endpoint.into().trim_end_matches('/').to_string();
        self.token_endpoint = token_endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn credentials(&self) -> &Arc<CredentialContext> {
        &self.context
    }

    /// The signed-in user, if any
    pub fn current_user(&self) -> Option<SessionUser> {
        self.context.current_user()
    }

    /// Register a new account.
    ///
    /// Returns the new session without storing it: callers decide whether a
    /// fresh account counts as signed in.
    #[instrument(skip(self, password), level = "debug")]
    pub async fn sign_up(&self, email: &str, password: &str) -> FirelinkResult<Option<SessionUser>> {
        require("email", email)?;
        require("password", password)?;

        let body = serde_json::to_string(&PasswordRequest {
            email,
            password,
            return_secure_token: true,
        })?;
        let response = self.post(self.identity_url(SIGN_UP)?, body).await?;

        Ok(decode_session(SIGN_UP, &response, |body| {
            serde_json::from_str::<SessionUser>(body).map_err(FirelinkError::from)
        }))
    }

    /// Sign in with email and password, storing the session on success
    #[instrument(skip(self, password), level = "debug")]
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> FirelinkResult<bool> {
        require("email", email)?;
        require("password", password)?;

        let body = serde_json::to_string(&PasswordRequest {
            email,
            password,
            return_secure_token: true,
        })?;
        let url = self.identity_url(SIGN_IN_WITH_PASSWORD)?;
        let result = self.post(url, body).await;

        self.settle(SIGN_IN_WITH_PASSWORD, result, |body| {
            serde_json::from_str::<SessionUser>(body).map_err(FirelinkError::from)
        })
    }

    /// Exchange a refresh token for a new session
    #[instrument(skip(self, refresh_token), level = "debug")]
    pub async fn sign_in_with_token(&self, refresh_token: &str) -> FirelinkResult<bool> {
        require("refresh_token", refresh_token)?;

        let body = serde_json::to_string(&RefreshRequest::new(refresh_token))?;
        let url = self.token_url()?;
        let result = self.post(url, body).await;

        self.settle("token", result, |body| {
            serde_json::from_str::<RefreshResponse>(body)
                .map(RefreshResponse::into_session)
                .map_err(FirelinkError::from)
        })
    }

    /// Ask the provider to email a password reset link.
    ///
    /// Returns whether the provider accepted the request.
    #[instrument(skip(self), level = "debug")]
    pub async fn send_password_reset_email(&self, email: &str) -> FirelinkResult<bool> {
        require("email", email)?;

        let body = serde_json::to_string(&OobCodeRequest::password_reset(email))?;
        let response = self.post(self.identity_url(SEND_OOB_CODE)?, body).await?;

        if !response.is_success() {
            log_rejection(SEND_OOB_CODE, &response);
        }
        Ok(response.is_success())
    }

    /// Forget the current session. Local only.
    pub fn sign_out(&self) {
        debug!(project_id = %self.context.project_id(), "Signing out");
        self.context.clear_user();
    }

    fn identity_url(&self, operation: &str) -> FirelinkResult<Url> {
        keyed_url(
            &format!("{}/accounts:{}", self.identity_endpoint, operation),
            self.context.api_key(),
        )
    }

    fn token_url(&self) -> FirelinkResult<Url> {
        keyed_url(&format!("{}/token", self.token_endpoint), self.context.api_key())
    }

    async fn post(&self, url: Url, body: String) -> FirelinkResult<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Post, url.as_str()).with_json_body(body);
        self.transport.send(request).await
    }

    /// Apply the outcome of a sign-in call to the credential context
    fn settle<F>(
        &self,
        operation: &str,
        result: FirelinkResult<HttpResponse>,
        decode: F,
    ) -> FirelinkResult<bool>
    where
        F: FnOnce(&str) -> FirelinkResult<SessionUser>,
    {
        match result {
            Ok(response) => {
                let session = decode_session(operation, &response, decode);
                let signed_in = session.is_some();
                self.context.set_user(session);
                if signed_in {
                    debug!(operation, "Session stored");
                }
                Ok(signed_in)
            }
            Err(e) => {
                self.context.clear_user();
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("context", &self.context)
            .field("identity_endpoint", &self.identity_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .finish_non_exhaustive()
    }
}

fn require(field: &str, value: &str) -> FirelinkResult<()> {
    if value.trim().is_empty() {
        return Err(FirelinkError::invalid_field(
            field,
            format!("{} cannot be empty", field),
        ));
    }
    Ok(())
}

fn keyed_url(base: &str, api_key: &str) -> FirelinkResult<Url> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

/// `Some(session)` for a decodable 2xx, `None` otherwise
fn decode_session<F>(operation: &str, response: &HttpResponse, decode: F) -> Option<SessionUser>
where
    F: FnOnce(&str) -> FirelinkResult<SessionUser>,
{
    if !response.is_success() {
        log_rejection(operation, response);
        return None;
    }
    match decode(&response.body) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!(operation, error = %e, "Provider accepted the request but the session could not be decoded");
            None
        }
    }
}

fn log_rejection(operation: &str, response: &HttpResponse) {
    let reason = provider_error_message(&response.body).unwrap_or_default();
    debug!(operation, status = response.status, %reason, "Identity provider rejected the request");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockHttpTransport;
    use serde_json::json;

    const SIGN_IN_BODY: &str = r#"{
        "kind": "identitytoolkit#VerifyPasswordResponse",
        "localId": "u1",
        "email": "a@b.com",
        "displayName": "",
        "idToken": "t1",
        "registered": true,
        "refreshToken": "r1",
        "expiresIn": "3600"
    }"#;

    fn context() -> Arc<CredentialContext> {
        Arc::new(CredentialContext::new("demo", "K").unwrap())
    }

    fn service(ctx: &Arc<CredentialContext>, transport: MockHttpTransport) -> AuthService {
        AuthService::new(Arc::clone(ctx), Arc::new(transport))
    }

    fn body_json(request: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(request.body.as_deref().unwrap_or("null")).unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_returns_user_without_signing_in() {
        let ctx = context();
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.method == HttpMethod::Post
                    && req.url == "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=K"
                    && body_json(req)
                        == json!({"email": "a@b.com", "password": "pw", "returnSecureToken": true})
            })
            .times(1)
            .returning(|_| {
                Ok(HttpResponse::new(
                    200,
                    r#"{"localId":"u1","idToken":"t1","refreshToken":"r1"}"#,
                ))
            });

        let auth = service(&ctx, transport);
        let user = auth.sign_up("a@b.com", "pw").await.unwrap().unwrap();

        assert_eq!(user.local_id, "u1");
        assert_eq!(user.id_token, "t1");
        assert!(ctx.current_user().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_rejection_is_none() {
        let ctx = context();
        ctx.replace_user(SessionUser::from_tokens("existing", "t0", "r0", None));
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Ok(HttpResponse::new(
                400,
                r#"{"error":{"code":400,"message":"EMAIL_EXISTS"}}"#,
            ))
        });

        let auth = service(&ctx, transport);
        assert!(auth.sign_up("a@b.com", "pw").await.unwrap().is_none());
        assert_eq!(ctx.current_user().unwrap().local_id, "existing");
    }

    #[tokio::test]
    async fn test_sign_in_with_password_stores_session() {
        let ctx = context();
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.url
                    == "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword?key=K"
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, SIGN_IN_BODY)));

        let auth = service(&ctx, transport);
        assert!(auth.sign_in_with_password("a@b.com", "pw").await.unwrap());

        let expected: SessionUser = serde_json::from_str(SIGN_IN_BODY).unwrap();
        assert_eq!(auth.current_user(), Some(expected));
        assert_eq!(ctx.id_token().as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_failed_sign_in_clears_prior_session() {
        let ctx = context();
        ctx.replace_user(SessionUser::from_tokens("u0", "t0", "r0", None));
        let mut transport = MockHttpTransport::new();
        transport.expect_send().times(1).returning(|_| {
            Ok(HttpResponse::new(
                400,
                r#"{"error":{"code":400,"message":"INVALID_PASSWORD"}}"#,
            ))
        });

        let auth = service(&ctx, transport);
        assert!(!auth.sign_in_with_password("a@b.com", "wrong").await.unwrap());
        assert!(ctx.current_user().is_none());
    }

    #[tokio::test]
    async fn test_undecodable_success_clears_session() {
        let ctx = context();
        ctx.replace_user(SessionUser::from_tokens("u0", "t0", "r0", None));
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "<html>captive portal</html>")));

        let auth = service(&ctx, transport);
        assert!(!auth.sign_in_with_password("a@b.com", "pw").await.unwrap());
        assert!(ctx.current_user().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_clears_session_and_errors() {
        let ctx = context();
        ctx.replace_user(SessionUser::from_tokens("u0", "t0", "r0", None));
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(FirelinkError::http("connection refused")));

        let auth = service(&ctx, transport);
        let err = auth.sign_in_with_password("a@b.com", "pw").await.unwrap_err();
        assert!(matches!(err, FirelinkError::Http { .. }));
        assert!(ctx.current_user().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_with_token_success_then_failure() {
        let ctx = context();
        let mut transport = MockHttpTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_send()
            .withf(|req| {
                req.url == "https://securetoken.googleapis.com/v1/token?key=K"
                    && body_json(req) == json!({"grant_type": "refresh_token", "refreshToken": "r1"})
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(HttpResponse::new(
                    200,
                    r#"{"id_token":"t2","refresh_token":"r2","expires_in":"3600","user_id":"u1","token_type":"Bearer"}"#,
                ))
            });
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(HttpResponse::new(
                    400,
                    r#"{"error":{"code":400,"message":"INVALID_REFRESH_TOKEN"}}"#,
                ))
            });

        let auth = service(&ctx, transport);
        assert!(auth.sign_in_with_token("r1").await.unwrap());
        let user = auth.current_user().unwrap();
        assert_eq!(user.local_id, "u1");
        assert_eq!(user.id_token, "t2");
        assert_eq!(user.refresh_token, "r2");

        assert!(!auth.sign_in_with_token("stale").await.unwrap());
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_password_reset_does_not_touch_session() {
        let ctx = context();
        ctx.replace_user(SessionUser::from_tokens("u1", "t1", "r1", None));
        let mut transport = MockHttpTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_send()
            .withf(|req| {
                req.url == "https://identitytoolkit.googleapis.com/v1/accounts:sendOobCode?key=K"
                    && body_json(req) == json!({"requestType": "PASSWORD_RESET", "email": "a@b.com"})
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"email":"a@b.com"}"#)));
        transport
            .expect_send()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(HttpResponse::new(
                    400,
                    r#"{"error":{"code":400,"message":"EMAIL_NOT_FOUND"}}"#,
                ))
            });

        let auth = service(&ctx, transport);
        assert!(auth.send_password_reset_email("a@b.com").await.unwrap());
        assert!(!auth.send_password_reset_email("nobody@b.com").await.unwrap());
        assert_eq!(ctx.current_user().unwrap().local_id, "u1");
    }

    #[tokio::test]
    async fn test_empty_arguments_fail_before_network() {
        let ctx = context();
        let mut transport = MockHttpTransport::new();
        transport.expect_send().never();

        let auth = service(&ctx, transport);
        assert!(matches!(
            auth.sign_in_with_password("", "pw").await,
            Err(FirelinkError::InvalidInput { .. })
        ));
        assert!(matches!(
            auth.sign_up("a@b.com", " ").await,
            Err(FirelinkError::InvalidInput { .. })
        ));
        assert!(matches!(
            auth.sign_in_with_token("").await,
            Err(FirelinkError::InvalidInput { .. })
        ));
        assert!(matches!(
            auth.send_password_reset_email("").await,
            Err(FirelinkError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_sign_out_is_local() {
        let ctx = context();
        ctx.replace_user(SessionUser::from_tokens("u1", "t1", "r1", None));
        let mut transport = MockHttpTransport::new();
        transport.expect_send().never();

        let auth = service(&ctx, transport);
        auth.sign_out();
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_custom_endpoints_and_key_encoding() {
        let ctx = Arc::new(CredentialContext::new("demo", "a b&c").unwrap());
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.url == "http://localhost:9099/identitytoolkit.googleapis.com/v1/accounts:signUp?key=a+b%26c"
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"localId":"u1"}"#)));

        let auth = AuthService::new(ctx, Arc::new(transport)).with_endpoints(
            "http://localhost:9099/identitytoolkit.googleapis.com/v1/",
            "http://localhost:9099/securetoken.googleapis.com/v1",
        );
        assert!(auth.sign_up("a@b.com", "pw").await.unwrap().is_some());
    }
}
