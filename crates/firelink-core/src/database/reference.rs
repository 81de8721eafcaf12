//! Handles to locations in the database and the CRUD calls made through them

use super::path::DatabasePath;
use crate::credential::CredentialContext;
use crate::error::{FirelinkError, FirelinkResult};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

/// State shared by every reference derived from one database handle
pub(crate) struct DatabaseShared {
    pub context: Arc<CredentialContext>,
    pub transport: Arc<dyn HttpTransport>,
    pub base: Url,
    pub root_url: Url,
}

impl DatabaseShared {
    pub fn new(
        context: Arc<CredentialContext>,
        transport: Arc<dyn HttpTransport>,
        base: Url,
    ) -> FirelinkResult<Self> {
        let root_url = node_url(&base, &DatabasePath::root())?;
        Ok(Self {
            context,
            transport,
            base,
            root_url,
        })
    }
}

/// Immutable handle to one location in the database.
///
/// Navigation (`child`, `parent`, `root`) is pure and returns a new handle.
/// Each CRUD call reads the credential context when it is made, so a
/// reference created before sign-in carries the token obtained afterwards.
#[derive(Clone)]
pub struct Reference {
    shared: Arc<DatabaseShared>,
    path: DatabasePath,
    url: Url,
}

impl Reference {
    pub(crate) fn new(shared: Arc<DatabaseShared>, path: DatabasePath) -> FirelinkResult<Self> {
        let url = node_url(&shared.base, &path)?;
        Ok(Self { shared, path, url })
    }

    /// Path below the database root, without leading slash; empty at the root
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    pub fn database_path(&self) -> &DatabasePath {
        &self.path
    }

    /// Last path segment, `None` at the root
    pub fn key(&self) -> Option<&str> {
        self.path.key()
    }

    pub fn is_root(&self) -> bool {
        self.path.is_root()
    }

    /// Fully-qualified location, identical to `to_string()`
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn credentials(&self) -> &Arc<CredentialContext> {
        &self.shared.context
    }

    /// Reference to `name` below this one; `name` may contain `/`
    pub fn child(&self, name: &str) -> FirelinkResult<Reference> {
        Self::new(Arc::clone(&self.shared), self.path.join(name)?)
    }

    /// Reference one level up. Fails with `InvalidPath` at the root.
    pub fn parent(&self) -> FirelinkResult<Reference> {
        Self::new(Arc::clone(&self.shared), self.path.parent()?)
    }

    /// Reference to the database root
    pub fn root(&self) -> Reference {
        Self::root_of(Arc::clone(&self.shared))
    }

    pub(crate) fn root_of(shared: Arc<DatabaseShared>) -> Reference {
        let url = shared.root_url.clone();
        Self {
            shared,
            path: DatabasePath::root(),
            url,
        }
    }

    /// Read the value stored here.
    ///
    /// `None` when the server rejects the request or nothing is stored (the
    /// server answers `null`).
    #[instrument(skip(self), fields(path = %self.path), level = "debug")]
    pub async fn read(&self) -> FirelinkResult<Option<Value>> {
        match self.read_raw().await? {
            Some(body) => {
                let value: Value = serde_json::from_str(&body).map_err(|e| {
                    FirelinkError::json_with_context(e.to_string(), format!("Decoding {}", self.path))
                })?;
                Ok(Some(value).filter(|v| !v.is_null()))
            }
            None => Ok(None),
        }
    }

    /// Read and decode into `T`, `None` as for [`Reference::read`]
    pub async fn read_as<T: DeserializeOwned>(&self) -> FirelinkResult<Option<T>> {
        match self.read().await? {
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                FirelinkError::json_with_context(e.to_string(), format!("Decoding {}", self.path))
            }),
            None => Ok(None),
        }
    }

    /// Read the undecoded response body; `None` only on rejection
    pub async fn read_raw(&self) -> FirelinkResult<Option<String>> {
        let response = self.send(HttpRequest::get(self.request_url()?.as_str())).await?;
        Ok(response.is_success().then_some(response.body))
    }

    /// Replace the value stored here. Returns whether the server accepted it.
    pub async fn write<T: Serialize + ?Sized>(&self, data: &T) -> FirelinkResult<bool> {
        let body = serde_json::to_string(data)?;
        self.put_body(HttpMethod::Put, body).await
    }

    /// Replace the value with already-encoded JSON
    pub async fn write_raw(&self, json: &str) -> FirelinkResult<bool> {
        ensure_json(json)?;
        self.put_body(HttpMethod::Put, json.to_string()).await
    }

    /// Merge the given children into the value stored here (HTTP PATCH)
    pub async fn update<T: Serialize + ?Sized>(&self, data: &T) -> FirelinkResult<bool> {
        let body = serde_json::to_string(data)?;
        self.put_body(HttpMethod::Patch, body).await
    }

    /// Merge already-encoded JSON into the value stored here
    pub async fn update_raw(&self, json: &str) -> FirelinkResult<bool> {
        ensure_json(json)?;
        self.put_body(HttpMethod::Patch, json.to_string()).await
    }

    /// Delete the value stored here. Returns whether the server accepted it.
    #[instrument(skip(self), fields(path = %self.path), level = "debug")]
    pub async fn remove(&self) -> FirelinkResult<bool> {
        let response = self
            .send(HttpRequest::delete(self.request_url()?.as_str()))
            .await?;
        Ok(response.is_success())
    }

    #[instrument(skip(self, body), fields(path = %self.path), level = "debug")]
    async fn put_body(&self, method: HttpMethod, body: String) -> FirelinkResult<bool> {
        let request = HttpRequest::new(method, self.request_url()?.as_str()).with_json_body(body);
        let response = self.send(request).await?;
        Ok(response.is_success())
    }

    async fn send(&self, request: HttpRequest) -> FirelinkResult<HttpResponse> {
        let method = request.method;
        let response = self.shared.transport.send(request).await?;
        if !response.is_success() {
            debug!(%method, path = %self.path, status = response.status, "Database rejected the request");
        }
        Ok(response)
    }

    /// `{url}.json`, plus `auth=<idToken>` when a session with a token exists
    pub fn request_url(&self) -> FirelinkResult<Url> {
        let mut url = Url::parse(&format!("{}.json", self.url))?;
        if let Some(token) = self.shared.context.id_token() {
            url.query_pairs_mut().append_pair("auth", &token);
        }
        Ok(url)
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared.context, &other.shared.context) && self.url == other.url
    }
}

impl Eq for Reference {}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("url", &self.url.as_str())
            .field("path", &self.path.as_str())
            .finish()
    }
}

/// Location URL: the database base followed by the percent-encoded segments
fn node_url(base: &Url, path: &DatabasePath) -> FirelinkResult<Url> {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            FirelinkError::config_with_context("database URL cannot be a base", base.as_str())
        })?;
        segments.pop_if_empty();
        if path.is_root() {
            segments.push("");
        } else {
            segments.extend(path.segments());
        }
    }
    Ok(url)
}

fn ensure_json(json: &str) -> FirelinkResult<()> {
    serde_json::from_str::<serde::de::IgnoredAny>(json)
        .map(|_| ())
        .map_err(|e| FirelinkError::json_with_context(e.to_string(), "Validating pre-encoded body"))
}
