//! HTTP transport: one request/response round trip with timeout,
//! auth, and error classification.
//!
//! The pipeline for every request is fixed: encode the body, resolve
//! the timeout, execute, classify non-2xx responses, decode the body,
//! and surface `"errors"` payloads embedded in successful responses.
//! Connection pooling and release are delegated to `reqwest`: bodies
//! are read to completion on success and error paths alike, and a
//! timed-out request is dropped, which tears its connection down.

use std::sync::{Arc, RwLock};

use reqwest::{header, Method, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use crate::auth::BasicAuth;
use crate::codec::{Codec, JsonCodec};
use crate::error::{Error, Result};
use crate::timeout::Timeout;

const DEFAULT_URL: &str = "http://127.0.0.1:7474/";
const DEFAULT_MAXSIZE: usize = 20;

/// Request body accepted by [`Transport::perform_request`]. Structured
/// values go through the codec; raw text bypasses it.
#[derive(Debug, Clone)]
pub enum Body {
    Json(Value),
    Raw(String),
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

/// Executes single HTTP round trips against one endpoint.
///
/// Credentials are shared mutable state: [`Transport::set_auth`] takes
/// effect for every subsequent request, and a call racing a credential
/// change may observe either the old or the new value. No ordering
/// guarantee is made between `set_auth` and in-flight requests.
pub struct Transport {
    url: Url,
    auth: RwLock<Option<BasicAuth>>,
    codec: Arc<dyn Codec>,
    request_timeout: Timeout,
    http: reqwest::Client,
}

/// Builder for [`Transport`].
pub struct TransportBuilder {
    url: Option<Url>,
    auth: Option<BasicAuth>,
    codec: Option<Arc<dyn Codec>>,
    request_timeout: Timeout,
    maxsize: usize,
    use_dns_cache: bool,
    session: Option<reqwest::Client>,
}

impl Default for TransportBuilder {
    fn default() -> Self {
        Self {
            url: None,
            auth: None,
            codec: None,
            request_timeout: Timeout::Default,
            maxsize: DEFAULT_MAXSIZE,
            use_dns_cache: false,
            session: None,
        }
    }
}

impl TransportBuilder {
    pub fn url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn auth(mut self, auth: impl Into<BasicAuth>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    pub fn codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Default timeout applied when a call passes [`Timeout::Default`].
    pub fn request_timeout(mut self, timeout: impl Into<Timeout>) -> Self {
        self.request_timeout = timeout.into();
        self
    }

    /// Maximum pooled connections kept per host. Ignored when an
    /// external session is supplied.
    pub fn maxsize(mut self, maxsize: usize) -> Self {
        self.maxsize = maxsize;
        self
    }

    /// Resolve hostnames through a caching resolver. Ignored when an
    /// external session is supplied.
    pub fn use_dns_cache(mut self, enabled: bool) -> Self {
        self.use_dns_cache = enabled;
        self
    }

    /// Use an externally constructed client, sharing its connection
    /// pool across transports.
    pub fn session(mut self, session: reqwest::Client) -> Self {
        self.session = Some(session);
        self
    }

    pub fn build(self) -> Result<Transport> {
        let http = match self.session {
            Some(session) => session,
            None => reqwest::Client::builder()
                .pool_max_idle_per_host(self.maxsize)
                .hickory_dns(self.use_dns_cache)
                .build()?,
        };

        let url = match self.url {
            Some(url) => url,
            None => Url::parse(DEFAULT_URL).expect("default endpoint URL parses"),
        };

        Ok(Transport {
            url,
            auth: RwLock::new(self.auth),
            codec: self.codec.unwrap_or_else(|| Arc::new(JsonCodec)),
            request_timeout: self.request_timeout,
            http,
        })
    }
}

impl Transport {
    pub fn builder() -> TransportBuilder {
        TransportBuilder::default()
    }

    /// Base endpoint URL. Never carries credentials.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn auth(&self) -> Option<BasicAuth> {
        match self.auth.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the credential applied to subsequent requests; `None`
    /// clears it.
    pub fn set_auth(&self, auth: Option<BasicAuth>) {
        let mut guard = match self.auth.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = auth;
    }

    /// Execute one request and return the HTTP status with the decoded
    /// body (`None` for an empty body).
    ///
    /// Non-2xx responses become [`Error::Client`] carrying the decoded
    /// error body when it decodes, otherwise the raw text. A decoded
    /// 2xx body that is an object with a truthy `"errors"` entry (the
    /// Neo4j convention for statement-level failures) also becomes
    /// [`Error::Client`]; the check is top-level only. Truthiness here
    /// means non-null, non-false, non-zero, non-empty.
    pub async fn perform_request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<Body>,
        timeout: Timeout,
    ) -> Result<(StatusCode, Option<Value>)> {
        let payload = match body {
            Some(Body::Json(value)) => Some(
                self.codec
                    .encode(&value)
                    .map_err(Error::Serialization)?
                    .into_bytes(),
            ),
            Some(Body::Raw(text)) => Some(text.into_bytes()),
            None => None,
        };

        let url = join_path(&self.url, path);
        let resolved = timeout.resolve(self.request_timeout);

        debug!(%method, %url, timeout = ?resolved, "performing request");

        let dispatch = self.dispatch(method, url, params, payload);
        let (status, text) = match resolved {
            Some(duration) => tokio::time::timeout(duration, dispatch)
                .await
                .map_err(|_| Error::Timeout)??,
            None => dispatch.await?,
        };

        let decoded = if text.is_empty() {
            None
        } else {
            Some(self.codec.decode(&text).map_err(Error::Serialization)?)
        };

        if let Some(Value::Object(map)) = &decoded {
            if let Some(errors) = map.get("errors") {
                if is_truthy(errors) {
                    return Err(Error::Client {
                        status: None,
                        errors: errors.clone(),
                    });
                }
            }
        }

        Ok((status, decoded))
    }

    /// Full round trip: send, read the body, classify non-2xx.
    async fn dispatch(
        &self,
        method: Method,
        url: Url,
        params: &[(&str, &str)],
        payload: Option<Vec<u8>>,
    ) -> Result<(StatusCode, String)> {
        let mut request = self
            .http
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json; charset=UTF-8");

        if !params.is_empty() {
            request = request.query(params);
        }

        if let Some(BasicAuth { username, password }) = self.auth() {
            request = request.basic_auth(username, Some(password));
        }

        if let Some(bytes) = payload {
            request = request.body(bytes);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let errors = match self.codec.decode(&text) {
                Ok(value) if is_truthy(&value) => value,
                _ => Value::String(text),
            };
            debug!(status = status.as_u16(), "request failed");
            return Err(Error::Client {
                status: Some(status.as_u16()),
                errors,
            });
        }

        Ok((status, text))
    }

    /// Release the transport's handle on the connection pool. Idle
    /// connections close once the last clone of the inner client is
    /// dropped.
    pub fn close(self) {}
}

/// Append `path` to the base URL's path: the base prefix is preserved
/// and slashes never double up. `Url::join` is unsuitable here because
/// it resolves RFC-3986-relative and would discard an un-slashed final
/// base segment.
fn join_path(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let joined = format!(
        "{}/{}",
        base.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_path_plain_base() {
        let base = Url::parse("http://localhost:7474/").unwrap();
        assert_eq!(
            join_path(&base, "db/data").as_str(),
            "http://localhost:7474/db/data"
        );
    }

    #[test]
    fn test_join_path_preserves_prefix() {
        let base = Url::parse("http://localhost:7474/neo4j").unwrap();
        assert_eq!(
            join_path(&base, "db/data/cypher").as_str(),
            "http://localhost:7474/neo4j/db/data/cypher"
        );
    }

    #[test]
    fn test_join_path_never_doubles_slashes() {
        let base = Url::parse("http://localhost:7474/neo4j/").unwrap();
        assert_eq!(
            join_path(&base, "/db/data").as_str(),
            "http://localhost:7474/neo4j/db/data"
        );
    }

    #[test]
    fn test_truthiness_matches_error_payloads() {
        assert!(is_truthy(&json!(["boom"])));
        assert!(is_truthy(&json!({"code": 1})));
        assert!(is_truthy(&json!("boom")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn test_set_auth_replaces_and_clears() {
        let transport = Transport::builder().build().unwrap();
        assert!(transport.auth().is_none());

        transport.set_auth(Some(BasicAuth::new("neo4j", "pass")));
        assert_eq!(transport.auth(), Some(BasicAuth::new("neo4j", "pass")));

        transport.set_auth(None);
        assert!(transport.auth().is_none());
    }
}
