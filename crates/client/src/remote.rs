//! REST-backed collections
//!
//! [`ApiClient`] holds the HTTP connection pool, the server base URL and the
//! session credentials. [`RemoteCollection`] binds it to one entity type's
//! endpoints and implements [`CollectionSource`].
//!
//! Every operation is a single round trip: no retries, no caching, no
//! pagination.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use gridkeeper_core::{EntityRecord, Identifier};
use gridkeeper_schema::{EntityDescriptor, Endpoints, ID_PLACEHOLDER, OperationType};
use reqwest::header::COOKIE;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::Value;

/// Cookie carrying the session token by default
pub const DEFAULT_AUTH_COOKIE: &str = "access_token";

// ============================================================================
// CollectionSource
// ============================================================================

/// The four operations on one entity type's collection
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Fetch the full collection
    async fn list(&self) -> ClientResult<Vec<EntityRecord>>;

    /// Create a record; returns the server's copy
    async fn create(&self, payload: &EntityRecord) -> ClientResult<EntityRecord>;

    /// Update a record; the returned copy may be partial
    async fn update(&self, identifier: &Identifier, payload: &EntityRecord)
    -> ClientResult<EntityRecord>;

    /// Delete a record
    async fn delete(&self, identifier: &Identifier) -> ClientResult<()>;
}

// ============================================================================
// ApiClient
// ============================================================================

/// How the session token is attached to requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication
    Anonymous,
    /// `Cookie: <name>=<token>`
    Cookie { name: String, token: String },
    /// `Authorization: Bearer <token>`
    Bearer(String),
}

/// Shared HTTP client for every collection
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl ApiClient {
    /// Create a client for the given server
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing connection pool
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: Credentials::Anonymous,
        }
    }

    /// Send the session token as a cookie
    pub fn with_cookie(mut self, name: impl Into<String>, token: impl Into<String>) -> Self {
        self.credentials = Credentials::Cookie {
            name: name.into(),
            token: token.into(),
        };
        self
    }

    /// Send the session token as a bearer token
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.credentials = Credentials::Bearer(token.into());
        self
    }

    /// Server base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Collection bound to an entity type's endpoints
    pub fn collection(&self, descriptor: &EntityDescriptor) -> RemoteCollection {
        RemoteCollection {
            api: self.clone(),
            entity: descriptor.name.clone(),
            endpoints: descriptor.endpoints.clone(),
        }
    }

    /// Build the full URL for an endpoint path
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Anonymous => request,
            Credentials::Cookie { name, token } => {
                request.header(COOKIE, format!("{}={}", name, token))
            }
            Credentials::Bearer(token) => request.bearer_auth(token),
        }
    }
}

// ============================================================================
// RemoteCollection
// ============================================================================

/// One entity type's collection on the server
#[derive(Debug, Clone)]
pub struct RemoteCollection {
    api: ApiClient,
    entity: String,
    endpoints: Endpoints,
}

impl RemoteCollection {
    /// Display name of the entity type
    pub fn entity(&self) -> &str {
        &self.entity
    }

    fn path(&self, op: OperationType, identifier: Option<&Identifier>) -> ClientResult<String> {
        let template = self
            .endpoints
            .template(op)
            .ok_or(ClientError::Unsupported(op))?;
        match (identifier, template.split_once(ID_PLACEHOLDER)) {
            (Some(id), Some((prefix, suffix))) => self.item_url(prefix, id, suffix),
            _ => Ok(self.api.url(template)),
        }
    }

    /// Item URL with the identifier as one percent-encoded path segment
    fn item_url(
        &self,
        prefix: &str,
        identifier: &Identifier,
        suffix: &str,
    ) -> ClientResult<String> {
        let base = self.api.url(prefix);
        let mut url = Url::parse(&base).map_err(|e| ClientError::invalid_url(&base, e))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ClientError::invalid_url(&base, "cannot hold a path"))?;
            segments.pop_if_empty().push(&identifier.to_string());
            segments.extend(suffix.split('/').filter(|s| !s.is_empty()));
            if suffix.ends_with('/') {
                segments.push("");
            }
        }
        Ok(url.into())
    }

    async fn send(&self, op: OperationType, request: RequestBuilder) -> ClientResult<Response> {
        let response = self.api.authorize(request).send().await.map_err(|e| {
            tracing::error!(
                "{} {} request failed: {}",
                op.http_method(),
                self.entity,
                e
            );
            ClientError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("{} {} -> {}", op.http_method(), self.entity, status.as_u16());
            return Ok(response);
        }

        let body = response.text().await?;
        tracing::warn!(
            "{} {} rejected with {}: {}",
            op.http_method(),
            self.entity,
            status.as_u16(),
            body
        );
        Err(ClientError::rejected(status.as_u16(), body))
    }

    async fn record(response: Response) -> ClientResult<EntityRecord> {
        let value: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Malformed(e.to_string()))?;
        EntityRecord::from_value(value).map_err(|e| ClientError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl CollectionSource for RemoteCollection {
    async fn list(&self) -> ClientResult<Vec<EntityRecord>> {
        let url = self.path(OperationType::List, None)?;
        let response = self
            .send(OperationType::List, self.api.client.get(url))
            .await?;
        let records: Vec<EntityRecord> = response
            .json()
            .await
            .map_err(|e| ClientError::Malformed(e.to_string()))?;
        tracing::debug!("Fetched {} {} record(s)", records.len(), self.entity);
        Ok(records)
    }

    async fn create(&self, payload: &EntityRecord) -> ClientResult<EntityRecord> {
        let url = self.path(OperationType::Create, None)?;
        let response = self
            .send(OperationType::Create, self.api.client.post(url).json(payload))
            .await?;
        Self::record(response).await
    }

    async fn update(
        &self,
        identifier: &Identifier,
        payload: &EntityRecord,
    ) -> ClientResult<EntityRecord> {
        let url = self.path(OperationType::Update, Some(identifier))?;
        let response = self
            .send(OperationType::Update, self.api.client.put(url).json(payload))
            .await?;
        Self::record(response).await
    }

    async fn delete(&self, identifier: &Identifier) -> ClientResult<()> {
        let url = self.path(OperationType::Delete, Some(identifier))?;
        self.send(OperationType::Delete, self.api.client.delete(url))
            .await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn modules() -> EntityDescriptor {
        EntityDescriptor::new(
            "user-modules",
            "Module",
            Endpoints::read_only("/users_and_permissions/modules/"),
        )
    }

    #[test]
    fn test_base_url_is_normalised() {
        let api = ApiClient::new("http://localhost:8000/");
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url("/x/"), "http://localhost:8000/x/");
        assert_eq!(api.url("https://other/x/"), "https://other/x/");
    }

    #[test]
    fn test_paths_resolve_identifier() {
        let descriptor = EntityDescriptor::new(
            "users",
            "User",
            Endpoints::crud("/users_and_permissions/users/"),
        );
        let collection = ApiClient::new("http://h").collection(&descriptor);
        assert_eq!(
            collection
                .path(OperationType::Update, Some(&Identifier::from("jdoe")))
                .unwrap(),
            "http://h/users_and_permissions/users/jdoe"
        );
    }

    #[test]
    fn test_identifier_is_one_encoded_segment() {
        let descriptor = EntityDescriptor::new(
            "users",
            "User",
            Endpoints::crud("/users_and_permissions/users/"),
        );
        let collection = ApiClient::new("http://h/api").collection(&descriptor);
        assert_eq!(
            collection
                .path(OperationType::Delete, Some(&Identifier::from("a/b?c#d e")))
                .unwrap(),
            "http://h/api/users_and_permissions/users/a%2Fb%3Fc%23d%20e"
        );
    }

    #[test]
    fn test_suffix_after_identifier_is_kept() {
        let descriptor = EntityDescriptor::new(
            "divisions",
            "Division",
            Endpoints {
                list: "/divisions/".into(),
                create: None,
                update: Some("/divisions/{id}/".into()),
                delete: Some("/divisions/{id}/archive".into()),
            },
        );
        let collection = ApiClient::new("http://h").collection(&descriptor);
        assert_eq!(
            collection.path(OperationType::Update, Some(&Identifier::Number(3))).unwrap(),
            "http://h/divisions/3/"
        );
        assert_eq!(
            collection.path(OperationType::Delete, Some(&Identifier::Number(3))).unwrap(),
            "http://h/divisions/3/archive"
        );
    }

    #[test]
    fn test_invalid_base_url_is_reported() {
        let descriptor = EntityDescriptor::new("divisions", "Division", Endpoints::crud("/d/"));
        let collection = ApiClient::new("not a url").collection(&descriptor);
        let err = collection
            .path(OperationType::Delete, Some(&Identifier::Number(1)))
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[test]
    fn test_read_only_collection_refuses_writes() {
        let collection = ApiClient::new("http://h").collection(&modules());
        let err = collection.path(OperationType::Create, None).unwrap_err();
        assert!(matches!(err, ClientError::Unsupported(OperationType::Create)));
        assert_eq!(collection.entity(), "Module");
    }
}
