//! In-memory stand-in for the identity, token and database endpoints

#![allow(dead_code)]

use async_trait::async_trait;
use firelink_core::{FirelinkResult, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use parking_lot::Mutex;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use url::Url;

/// Route client logs to the test harness; `RUST_LOG=debug` shows them
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
struct State {
    tree: Value,
    accounts: HashMap<String, (String, String)>,
    refresh_tokens: HashMap<String, String>,
    requests: Vec<HttpRequest>,
    next_id: u32,
}

/// Answers like Firebase for the handful of endpoints the client uses.
///
/// When `require_auth` is set, database requests must carry the id token of
/// a signed-in account.
#[derive(Default)]
pub struct InMemoryFirebase {
    state: Mutex<State>,
    require_auth: bool,
}

impl InMemoryFirebase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required_auth() -> Self {
        Self {
            require_auth: true,
            ..Self::default()
        }
    }

    pub fn add_account(&self, email: &str, password: &str) -> String {
        let mut state = self.state.lock();
        state.next_id += 1;
        let local_id = format!("u{}", state.next_id);
        state
            .accounts
            .insert(email.to_string(), (password.to_string(), local_id.clone()));
        local_id
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().requests.clone()
    }

    pub fn last_url(&self) -> Option<String> {
        self.state.lock().requests.last().map(|r| r.url.clone())
    }

    pub fn tree(&self) -> Value {
        self.state.lock().tree.clone()
    }

    fn session_for(state: &mut State, local_id: &str, email: &str) -> Value {
        let refresh = format!("refresh-{}", local_id);
        state
            .refresh_tokens
            .insert(refresh.clone(), local_id.to_string());
        json!({
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": local_id,
            "email": email,
            "idToken": format!("token-{}", local_id),
            "refreshToken": refresh,
            "expiresIn": "3600",
            "registered": true
        })
    }

    fn identity(&self, state: &mut State, url: &Url, body: &Value) -> HttpResponse {
        let email = body["email"].as_str().unwrap_or_default().to_string();
        let password = body["password"].as_str().unwrap_or_default().to_string();
        let path = url.path();

        if path.ends_with("accounts:signUp") {
            if state.accounts.contains_key(&email) {
                return provider_error("EMAIL_EXISTS");
            }
            state.next_id += 1;
            let local_id = format!("u{}", state.next_id);
            state
                .accounts
                .insert(email.clone(), (password, local_id.clone()));
            return HttpResponse::new(200, Self::session_for(state, &local_id, &email).to_string());
        }

        if path.ends_with("accounts:signInWithPassword") {
            return match state.accounts.get(&email).cloned() {
                Some((stored, local_id)) if stored == password => {
                    HttpResponse::new(200, Self::session_for(state, &local_id, &email).to_string())
                }
                Some(_) => provider_error("INVALID_PASSWORD"),
                None => provider_error("EMAIL_NOT_FOUND"),
            };
        }

        if path.ends_with("accounts:sendOobCode") {
            return if state.accounts.contains_key(&email) {
                HttpResponse::new(200, json!({ "email": email }).to_string())
            } else {
                provider_error("EMAIL_NOT_FOUND")
            };
        }

        HttpResponse::new(404, "")
    }

    fn refresh(&self, state: &mut State, body: &Value) -> HttpResponse {
        let token = body["refreshToken"].as_str().unwrap_or_default();
        match state.refresh_tokens.get(token).cloned() {
            Some(local_id) => HttpResponse::new(
                200,
                json!({
                    "id_token": format!("token-{}", local_id),
                    "refresh_token": token,
                    "expires_in": "3600",
                    "token_type": "Bearer",
                    "user_id": local_id
                })
                .to_string(),
            ),
            None => provider_error("INVALID_REFRESH_TOKEN"),
        }
    }

    fn database(&self, state: &mut State, request: &HttpRequest, url: &Url) -> HttpResponse {
        if self.require_auth {
            let token = url
                .query_pairs()
                .find(|(k, _)| k == "auth")
                .map(|(_, v)| v.into_owned());
            let valid = token.is_some_and(|t| {
                state
                    .accounts
                    .values()
                    .any(|(_, id)| t == format!("token-{}", id))
            });
            if !valid {
                return HttpResponse::new(401, r#"{"error":"Permission denied"}"#);
            }
        }

        let path = url.path().trim_end_matches(".json");
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        match request.method {
            HttpMethod::Get => HttpResponse::new(200, get_at(&state.tree, &segments).to_string()),
            HttpMethod::Put => {
                let value: Value = match serde_json::from_str(request.body.as_deref().unwrap_or("")) {
                    Ok(v) => v,
                    Err(_) => return HttpResponse::new(400, r#"{"error":"Invalid data"}"#),
                };
                set_at(&mut state.tree, &segments, value.clone());
                HttpResponse::new(200, value.to_string())
            }
            HttpMethod::Patch => {
                let value: Value = serde_json::from_str(request.body.as_deref().unwrap_or(""))
                    .unwrap_or(Value::Null);
                let Value::Object(children) = value else {
                    return HttpResponse::new(400, r#"{"error":"Invalid data; couldn't parse JSON object"}"#);
                };
                for (key, child) in children.iter() {
                    let mut full = segments.clone();
                    full.push(key.clone());
                    set_at(&mut state.tree, &full, child.clone());
                }
                HttpResponse::new(200, Value::Object(children).to_string())
            }
            HttpMethod::Delete => {
                set_at(&mut state.tree, &segments, Value::Null);
                HttpResponse::new(200, "null")
            }
            HttpMethod::Post => HttpResponse::new(405, ""),
        }
    }
}

#[async_trait]
impl HttpTransport for InMemoryFirebase {
    async fn send(&self, request: HttpRequest) -> FirelinkResult<HttpResponse> {
        let url = Url::parse(&request.url)?;
        let body: Value = request
            .body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
            .unwrap_or(Value::Null);

        let mut state = self.state.lock();
        state.requests.push(request.clone());

        let response = match url.host_str() {
            Some("identitytoolkit.googleapis.com") => self.identity(&mut state, &url, &body),
            Some("securetoken.googleapis.com") => self.refresh(&mut state, &body),
            _ => self.database(&mut state, &request, &url),
        };
        Ok(response)
    }
}

fn provider_error(message: &str) -> HttpResponse {
    HttpResponse::new(
        400,
        json!({"error": {"code": 400, "message": message}}).to_string(),
    )
}

fn get_at(tree: &Value, segments: &[String]) -> Value {
    let mut node = tree;
    for segment in segments {
        match node.get(segment) {
            Some(child) => node = child,
            None => return Value::Null,
        }
    }
    node.clone()
}

fn set_at(tree: &mut Value, segments: &[String], value: Value) {
    if value.is_null() && get_at(tree, segments).is_null() {
        return;
    }
    let Some((last, parents)) = segments.split_last() else {
        *tree = value;
        return;
    };

    let mut node = tree;
    for segment in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = node
            .as_object_mut()
            .map(|map| map.entry(segment.clone()).or_insert(Value::Null))
            .expect("node was just made an object");
    }

    if !node.is_object() {
        if value.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }
    if let Some(map) = node.as_object_mut() {
        if value.is_null() {
            map.remove(last);
        } else {
            map.insert(last.clone(), value);
        }
    }
}
