//! Database client façade.
//!
//! [`NoSqlClient`] is the seam between the UI and the wire: the TUI only ever
//! holds an `Arc<dyn NoSqlClient>`. [`RestClient`] is the concrete
//! implementation speaking the JSON REST surface of an on-premise endpoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::models::{
    FieldValue, IndexCollection, IndexInfo, PreparedPayload, QueryResultCollection, Row,
    TableCollection, TablePayload,
};
use crate::error::ClientError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("nosql-tui/", env!("CARGO_PKG_VERSION"));
const API_PREFIX: &str = "/20190828";
const NEXT_PAGE_HEADER: &str = "opc-next-page";
/// Upper bound on followed continuation pages for a single call.
const MAX_PAGES: usize = 10_000;

/// How to reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectMode {
    #[default]
    OnPremise,
    Cloud,
}

impl ConnectMode {
    pub fn label(self) -> &'static str {
        match self {
            ConnectMode::OnPremise => "On-premise",
            ConnectMode::Cloud => "Cloud",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ConnectMode::OnPremise => ConnectMode::Cloud,
            ConnectMode::Cloud => ConnectMode::OnPremise,
        }
    }
}

/// Parameters for [`Connector::connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub endpoint: String,
    pub port: String,
    pub mode: ConnectMode,
}

impl ConnectOptions {
    /// `host:port` form shown to the user.
    pub fn display_endpoint(&self) -> String {
        format!("{}:{}", self.endpoint.trim(), self.port.trim())
    }

    /// Base URL for HTTP requests. An explicit scheme in the endpoint is kept.
    pub fn base_url(&self) -> Result<String, ClientError> {
        let host = self.endpoint.trim().trim_end_matches('/');
        let port = self.port.trim();
        if host.is_empty() {
            return Err(ClientError::InvalidEndpoint {
                endpoint: self.display_endpoint(),
                reason: "host is empty".to_string(),
            });
        }
        if port.is_empty() || port.parse::<u16>().is_err() {
            return Err(ClientError::InvalidEndpoint {
                endpoint: self.display_endpoint(),
                reason: format!("port '{}' is not a number", port),
            });
        }
        if host.starts_with("http://") || host.starts_with("https://") {
            Ok(format!("{}:{}", host, port))
        } else {
            Ok(format!("http://{}:{}", host, port))
        }
    }
}

/// Operations the UI needs from the database.
///
/// Implementations must be safe to call concurrently from independent tasks.
#[async_trait]
pub trait NoSqlClient: Send + Sync + std::fmt::Debug {
    /// All table names, including child tables (`parent.child`).
    async fn list_tables(&self) -> Result<Vec<String>, ClientError>;

    /// The CREATE TABLE statement for `name`.
    async fn get_table(&self, name: &str) -> Result<String, ClientError>;

    async fn get_indexes(&self, name: &str) -> Result<Vec<IndexInfo>, ClientError>;

    /// Prepare a statement; the returned handle is passed to [`NoSqlClient::query`].
    async fn prepare(&self, statement: &str) -> Result<PreparedStatement, ClientError>;

    /// Run a prepared statement to completion, following continuation pages.
    async fn query(&self, prepared: &PreparedStatement) -> Result<Vec<Row>, ClientError>;

    /// Release the handle. Calling it more than once is harmless.
    async fn close(&self);
}

/// Factory for clients; separated so the UI can be driven with fakes.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, options: ConnectOptions)
    -> Result<Arc<dyn NoSqlClient>, ClientError>;
}

/// Opaque prepared statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedStatement {
    pub source: String,
    pub(crate) handle: String,
}

impl PreparedStatement {
    /// Build a handle directly from its parts (for alternative client implementations).
    pub fn new(source: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            handle: handle.into(),
        }
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }
}

/// Prepare and run `statement` in one step.
pub async fn execute(client: &dyn NoSqlClient, statement: &str) -> Result<Vec<Row>, ClientError> {
    let prepared = client.prepare(statement).await?;
    client.query(&prepared).await
}

/// HTTP/JSON client.
#[derive(Debug)]
pub struct RestClient {
    client: Client,
    pub base_url: String,
    closed: AtomicBool,
}

impl RestClient {
    pub fn new(base_url: String) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Transport {
                endpoint: base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(RestClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            closed: AtomicBool::new(false),
        })
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        self.client.request(method, url)
    }

    fn ensure_open(&self) -> Result<(), ClientError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(ClientError::Closed)
        } else {
            Ok(())
        }
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Response, ClientError> {
        self.ensure_open()?;
        log::debug!("request {}", endpoint);
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout {
                    timeout_secs: DEFAULT_TIMEOUT_SECS,
                    endpoint: endpoint.to_string(),
                }
            } else {
                ClientError::Transport {
                    endpoint: endpoint.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    /// Decode a successful response body or turn the status into an error.
    pub async fn handle_response<T>(response: Response, endpoint: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();

        if status.is_success() {
            response.json::<T>().await.map_err(|e| ClientError::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = extract_error_message(&error_text);

            match status.as_u16() {
                408 | 504 => Err(ClientError::Timeout {
                    timeout_secs: DEFAULT_TIMEOUT_SECS,
                    endpoint: endpoint.to_string(),
                }),
                code => Err(ClientError::Http {
                    status: code,
                    endpoint: endpoint.to_string(),
                    message,
                }),
            }
        }
    }

    fn next_page(response: &Response) -> Option<String> {
        response
            .headers()
            .get(NEXT_PAGE_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// Pull `message` out of a JSON error body, falling back to the raw text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl NoSqlClient for RestClient {
    async fn list_tables(&self) -> Result<Vec<String>, ClientError> {
        let endpoint = "/tables";
        let mut names = Vec::new();
        let mut page: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut request = self.build_request(Method::GET, endpoint);
            if let Some(token) = &page {
                request = request.query(&[("page", token.as_str())]);
            }
            let response = self.send(request, endpoint).await?;
            let next = Self::next_page(&response);
            let collection: TableCollection = Self::handle_response(response, endpoint).await?;
            names.extend(collection.items.into_iter().map(|t| t.name));

            match next {
                Some(token) => page = Some(token),
                None => break,
            }
        }

        Ok(names)
    }

    async fn get_table(&self, name: &str) -> Result<String, ClientError> {
        let endpoint = format!("/tables/{}", name);
        let response = self
            .send(self.build_request(Method::GET, &endpoint), &endpoint)
            .await?;
        let payload: TablePayload = Self::handle_response(response, &endpoint).await?;
        Ok(payload.ddl_statement)
    }

    async fn get_indexes(&self, name: &str) -> Result<Vec<IndexInfo>, ClientError> {
        let endpoint = format!("/tables/{}/indexes", name);
        let response = self
            .send(self.build_request(Method::GET, &endpoint), &endpoint)
            .await?;
        let collection: IndexCollection = Self::handle_response(response, &endpoint).await?;
        Ok(collection.items.into_iter().map(IndexInfo::from).collect())
    }

    async fn prepare(&self, statement: &str) -> Result<PreparedStatement, ClientError> {
        let endpoint = "/query/prepare";
        let request = self
            .build_request(Method::POST, endpoint)
            .json(&json!({ "statement": statement }));
        let response = self.send(request, endpoint).await?;
        let payload: PreparedPayload = Self::handle_response(response, endpoint).await?;
        Ok(PreparedStatement {
            source: statement.to_string(),
            handle: payload.statement,
        })
    }

    async fn query(&self, prepared: &PreparedStatement) -> Result<Vec<Row>, ClientError> {
        let endpoint = "/query";
        let body = json!({ "statement": prepared.handle, "isPrepared": true });
        let mut rows = Vec::new();
        let mut page: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut request = self.build_request(Method::POST, endpoint).json(&body);
            if let Some(token) = &page {
                request = request.query(&[("page", token.as_str())]);
            }
            let response = self.send(request, endpoint).await?;
            let next = Self::next_page(&response);
            let collection: QueryResultCollection =
                Self::handle_response(response, endpoint).await?;
            rows.extend(collection.items.into_iter().map(|item| {
                item.into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect::<Row>()
            }));

            match next {
                Some(token) => page = Some(token),
                None => break,
            }
        }

        log::debug!("query returned {} rows: {}", rows.len(), prepared.source);
        Ok(rows)
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            log::info!("closed client for {}", self.base_url);
        }
    }
}

/// Connector producing [`RestClient`]s.
#[derive(Debug, Default, Clone)]
pub struct RestConnector;

#[async_trait]
impl Connector for RestConnector {
    async fn connect(
        &self,
        options: ConnectOptions,
    ) -> Result<Arc<dyn NoSqlClient>, ClientError> {
        if options.mode == ConnectMode::Cloud {
            return Err(ClientError::UnsupportedMode {
                mode: options.mode.label().to_string(),
            });
        }

        let base_url = options.base_url()?;
        log::info!("connecting to {}", base_url);
        let client = RestClient::new(base_url)?;
        // Probe so an unreachable endpoint surfaces as a connection failure.
        client.list_tables().await?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options(endpoint: &str, port: &str) -> ConnectOptions {
        ConnectOptions {
            endpoint: endpoint.to_string(),
            port: port.to_string(),
            mode: ConnectMode::OnPremise,
        }
    }

    #[test]
    fn test_base_url_adds_scheme() {
        assert_eq!(
            options("localhost", "8080").base_url().unwrap(),
            "http://localhost:8080"
        );
        assert_eq!(
            options("https://db.internal/", "443").base_url().unwrap(),
            "https://db.internal:443"
        );
    }

    #[test]
    fn test_base_url_rejects_bad_port() {
        assert!(matches!(
            options("localhost", "80a").base_url(),
            Err(ClientError::InvalidEndpoint { .. })
        ));
        assert!(options("", "8080").base_url().is_err());
    }

    #[test]
    fn test_build_request_url() {
        let client = RestClient::new("http://example.test/".to_string()).unwrap();
        let request = client
            .build_request(Method::GET, "/tables")
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "http://example.test/20190828/tables");
    }

    #[tokio::test]
    async fn test_list_tables_follows_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/20190828/tables"))
            .and(query_param("page", "p2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"items": [{"name": "users.orders"}]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/20190828/tables"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("opc-next-page", "p2")
                    .set_body_json(json!({"items": [{"name": "users"}]})),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let client = RestClient::new(server.uri()).unwrap();
        let names = client.list_tables().await.unwrap();
        assert_eq!(names, vec!["users", "users.orders"]);
    }

    #[tokio::test]
    async fn test_get_table_and_indexes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/20190828/tables/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "users",
                "ddlStatement": "CREATE TABLE users (id INTEGER, PRIMARY KEY(id))"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/20190828/tables/users/indexes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"name": "idx_name", "keys": [{"columnName": "name"}]}]
            })))
            .mount(&server)
            .await;

        let client = RestClient::new(server.uri()).unwrap();
        let ddl = client.get_table("users").await.unwrap();
        assert!(ddl.contains("PRIMARY KEY(id)"));
        let indexes = client.get_indexes("users").await.unwrap();
        assert_eq!(indexes.len(), 1);
        assert_eq!(indexes[0].field_names, vec!["name"]);
    }

    #[tokio::test]
    async fn test_prepare_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/20190828/query/prepare"))
            .and(body_json(json!({"statement": "SELECT * FROM users"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"statement": "P1"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/20190828/query"))
            .and(body_json(json!({"statement": "P1", "isPrepared": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": 1, "name": "a"}, {"id": 2, "name": null}]
            })))
            .mount(&server)
            .await;

        let client = RestClient::new(server.uri()).unwrap();
        let rows = execute(&client, "SELECT * FROM users").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], FieldValue::Integer(1));
        assert_eq!(rows[1]["name"], FieldValue::Null);
    }

    #[tokio::test]
    async fn test_error_message_is_extracted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/20190828/tables/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"code": "NotFound", "message": "Table not found"})),
            )
            .mount(&server)
            .await;

        let client = RestClient::new(server.uri()).unwrap();
        let err = client.get_table("missing").await.unwrap_err();
        match err {
            ClientError::Http {
                status, message, ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Table not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_closed_client_rejects_calls() {
        let client = RestClient::new("http://127.0.0.1:9".to_string()).unwrap();
        client.close().await;
        client.close().await;
        assert!(matches!(
            client.list_tables().await,
            Err(ClientError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_connector_rejects_cloud_mode() {
        let mut opts = options("localhost", "8080");
        opts.mode = ConnectMode::Cloud;
        let err = RestConnector.connect(opts).await.unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedMode { .. }));
    }

    #[tokio::test]
    async fn test_connector_checks_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/20190828/tables"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let (host, port) = uri.rsplit_once(':').unwrap();
        let client = RestConnector.connect(options(host, port)).await;
        assert!(client.is_ok());
    }
}
