//! Several projects in one registry keep separate sessions
//!
//! Both apps share a single transport so the test can see exactly which
//! token went to which database host.

use async_trait::async_trait;
use firelink::firelink_core::{HttpRequest, HttpResponse};
use firelink::{AppRegistry, FirebaseConfig, FirelinkResult, HttpTransport};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

#[derive(Default)]
struct Recorder {
    urls: Mutex<Vec<String>>,
}

#[async_trait]
impl HttpTransport for Recorder {
    async fn send(&self, request: HttpRequest) -> FirelinkResult<HttpResponse> {
        self.urls.lock().push(request.url.clone());
        if request.url.contains("accounts:signInWithPassword") {
            let key = request.url.rsplit("key=").next().unwrap_or_default();
            let body = json!({
                "localId": format!("user-{key}"),
                "idToken": format!("token-{key}"),
                "refreshToken": "r",
            });
            return Ok(HttpResponse::new(200, body.to_string()));
        }
        Ok(HttpResponse::new(200, "1"))
    }
}

#[tokio::test]
async fn test_sessions_are_scoped_to_their_project() -> FirelinkResult<()> {
    let transport = Arc::new(Recorder::default());
    let registry = AppRegistry::new();
    registry.initialize_with_transport(FirebaseConfig::new("alpha", "KA"), transport.clone())?;
    registry.initialize_with_transport(FirebaseConfig::new("beta", "KB"), transport.clone())?;
    assert_eq!(registry.project_ids(), vec!["alpha".to_string(), "beta".to_string()]);

    let alpha = registry.get("alpha")?;
    let beta = registry.get("beta")?;
    assert!(alpha.auth().sign_in_with_password("a@b.com", "pw").await?);

    assert_eq!(alpha.database().reference("n")?.read().await?, Some(json!(1)));
    assert_eq!(beta.database().reference("n")?.read().await?, Some(json!(1)));
    assert!(beta.current_user().is_none());

    let urls = transport.urls.lock().clone();
    assert_eq!(urls[1], "https://alpha.firebaseio.com/n.json?auth=token-KA");
    assert_eq!(urls[2], "https://beta.firebaseio.com/n.json");
    Ok(())
}

#[test]
fn test_duplicate_project_is_rejected() {
    let registry = AppRegistry::new();
    let transport = Arc::new(Recorder::default());
    registry
        .initialize_with_transport(FirebaseConfig::new("alpha", "KA"), transport.clone())
        .unwrap();
    assert!(
        registry
            .initialize_with_transport(FirebaseConfig::new("alpha", "KA"), transport)
            .is_err()
    );
    assert_eq!(registry.len(), 1);
}
