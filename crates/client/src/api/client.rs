//! HTTP transport with bearer authentication and one-shot refresh.

use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};
use url::Url;

use super::{ApiError, error_message};
use crate::config::ClientConfig;
use crate::session::{BearerToken, Session};

/// REST API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the session.
///
/// # Authentication
///
/// Requests carry `Authorization: Bearer <access>` when the session holds a
/// credential. A 401 triggers exactly one refresh through
/// `auth/token/refresh/` followed by one replay of the original request. If
/// there is no refresh token, the refresh is rejected, or the replay is
/// rejected too, the session is torn down and
/// [`ApiError::ReauthenticationRequired`] is returned.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Body of an outgoing request. Kept as data so the request can be replayed.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<MultipartField>),
}

/// One part of a `multipart/form-data` body.
#[derive(Clone)]
pub enum MultipartField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl std::fmt::Debug for MultipartField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text { name, value } => f
                .debug_struct("Text")
                .field("name", name)
                .field("value", value)
                .finish(),
            Self::File {
                name,
                file_name,
                bytes,
                ..
            } => f
                .debug_struct("File")
                .field("name", name)
                .field("file_name", file_name)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

/// Query-string builder that drops empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key=value` unless the value is empty.
    #[must_use]
    pub fn push(mut self, key: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.trim().is_empty() {
            self.0.push((key.to_string(), value));
        }
        self
    }

    /// Append `key=value` when a value is present.
    #[must_use]
    pub fn push_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A request that can be sent, and re-sent after a refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, e.g. `products/`.
    pub path: String,
    pub query: Query,
    pub body: RequestBody,
    /// Whether to attach the bearer and apply the refresh policy.
    pub authenticated: bool,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::default(),
            body: RequestBody::Empty,
            authenticated: true,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Parse` if the body cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, fields: Vec<MultipartField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    /// Send without a bearer and without the refresh policy.
    #[must_use]
    pub const fn without_auth(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

impl ApiClient {
    /// Create a client for the configured API.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("tillpoint-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.clone(),
                session,
            }),
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Send a request and decode a JSON response.
    ///
    /// An empty body or `204 No Content` decodes as JSON `null`, so `T = ()`
    /// or `Option<_>` accept it.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`]; also `ApiError::Parse` if the body does not
    /// match `T`.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.execute(&request).await?;
        decode(response).await
    }

    /// Send a request and discard the response body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.execute(&request).await?;
        Ok(())
    }

    /// Send a request, applying bearer authentication and the refresh policy.
    ///
    /// # Errors
    ///
    /// - `ApiError::Http` on transport failure
    /// - `ApiError::Status` for non-success responses other than a
    ///   recoverable 401
    /// - `ApiError::ReauthenticationRequired` when the credential cannot be
    ///   recovered
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        if !request.authenticated {
            return self.execute_public(request).await;
        }

        let session = &self.inner.session;
        let bearer = session.bearer().await;
        let response = self.dispatch(request, bearer.as_ref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(response).await;
        }

        let Some(used) = bearer else {
            warn!("Unauthorized without a credential");
            session.teardown().await;
            return Err(ApiError::ReauthenticationRequired);
        };

        let fresh = self.recover_from_unauthorized(&used).await?;
        let replay = self.dispatch(request, Some(&fresh)).await?;
        if replay.status() == StatusCode::UNAUTHORIZED {
            warn!("Refreshed credential rejected, logging out");
            session.teardown().await;
            return Err(ApiError::ReauthenticationRequired);
        }
        check_status(replay).await
    }

    /// Send without credentials or refresh.
    pub(crate) async fn execute_public(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let response = self.dispatch(request, None).await?;
        check_status(response).await
    }

    /// Obtain a credential newer than `used`, refreshing at most once.
    ///
    /// Runs under the session's refresh gate. If another request already
    /// replaced `used` while this one waited, the newer credential is reused
    /// without a second refresh.
    async fn recover_from_unauthorized(&self, used: &BearerToken) -> Result<BearerToken, ApiError> {
        let session = &self.inner.session;
        let _gate = session.lock_refresh().await;
        session.reclaim_abandoned_refresh().await;

        match session.bearer().await {
            None => return Err(ApiError::ReauthenticationRequired),
            Some(current) if current.generation != used.generation => {
                debug!(generation = current.generation, "Credential already refreshed");
                return Ok(current);
            }
            Some(_) => {}
        }

        let Some(refresh) = session.begin_refresh().await else {
            warn!("No refresh token available, logging out");
            session.teardown().await;
            return Err(ApiError::ReauthenticationRequired);
        };
        let _unwind = RefreshUnwind(session);

        match self.refresh_access_token(&refresh).await {
            Ok(tokens) => session
                .complete_refresh(
                    SecretString::from(tokens.access),
                    tokens.refresh.map(SecretString::from),
                )
                .await
                .ok_or(ApiError::ReauthenticationRequired),
            Err(e) => {
                warn!(error = %e, "Token refresh failed, logging out");
                session.teardown().await;
                Err(ApiError::ReauthenticationRequired)
            }
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        bearer: Option<&BearerToken>,
    ) -> Result<Response, ApiError> {
        let url = self.url(&request.path, &request.query)?;
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url)
            .header(ACCEPT, "application/json");

        if let Some(bearer) = bearer {
            builder = builder.bearer_auth(bearer.token.expose_secret());
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields)?),
        };

        Ok(builder.send().await?)
    }

    fn url(&self, path: &str, query: &Query) -> Result<Url, ApiError> {
        let mut url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.pairs());
        }
        Ok(url)
    }
}

/// Reverts `Refreshing` if the request is dropped mid-exchange. Once the
/// refresh completes or the session is torn down this does nothing.
struct RefreshUnwind<'a>(&'a Session);

impl Drop for RefreshUnwind<'_> {
    fn drop(&mut self) {
        if self.0.abandon_refresh() {
            warn!("Token refresh abandoned");
        }
    }
}

fn build_form(fields: &[MultipartField]) -> Result<reqwest::multipart::Form, ApiError> {
    use reqwest::multipart::{Form, Part};

    fields.iter().try_fold(Form::new(), |form, field| {
        Ok(match field {
            MultipartField::Text { name, value } => form.text(name.clone(), value.clone()),
            MultipartField::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(content_type)?;
                form.part(name.clone(), part)
            }
        })
    })
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    if status.is_server_error() {
        error!(%status, %message, "API server error");
    } else {
        warn!(%status, %message, "API request rejected");
    }
    Err(ApiError::Status { status, message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;
    let body = if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
        "null"
    } else {
        text.as_str()
    };
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}
