// lil-net/src/linear.rs
//! Client for Linear's GraphQL API.
use std::time::Duration;

use lil_common::config::Config;
use lil_common::error::{LilError, Result};
use lil_common::model::Issue;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::validation::validate_url;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT_STRING: &str = concat!("lil/", env!("CARGO_PKG_VERSION"), " (Rust)");

/// Active (not completed or canceled) issues assigned to the viewer.
pub const ASSIGNED_ISSUES_QUERY: &str = r#"query GetAssignedIssues {
  viewer {
    assignedIssues(
      filter: { state: { type: { nin: ["completed", "canceled"] } } }
      first: 100
    ) {
      nodes {
        id
        identifier
        title
        url
        dueDate
        createdAt
        state { id name type }
        project { id name targetDate }
        assignee { id name displayName }
      }
    }
  }
}"#;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a> {
    query: &'a str,
    operation_name: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct AssignedIssuesData {
    viewer: Viewer,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Viewer {
    assigned_issues: IssueConnection,
}

#[derive(Deserialize)]
struct IssueConnection {
    nodes: Option<Vec<Issue>>,
}

#[derive(Debug, Clone)]
pub struct LinearClient {
    http: Client,
    endpoint: Url,
}

impl LinearClient {
    /// Builds a client from config. Fails with `MissingApiKey` when no key is configured.
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?;
        let endpoint = validate_url(&config.api_url)?;
        let http = build_http_client(api_key)?;
        debug!("Linear client configured for {}", endpoint);
        Ok(Self { http, endpoint })
    }

    pub async fn fetch_assigned_issues(&self) -> Result<Vec<Issue>> {
        debug!("Requesting assigned issues from {}", self.endpoint);
        let request = GraphQlRequest {
            query: ASSIGNED_ISSUES_QUERY,
            operation_name: "GetAssignedIssues",
        };
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .inspect_err(|e| debug!("HTTP request failed for {}: {}", self.endpoint, e))?;

        let status = response.status();
        debug!("Received HTTP status: {} for {}", status, self.endpoint);
        let body = response.text().await?;

        if !status.is_success() {
            error!("HTTP error {} from {}: {}", status, self.endpoint, body);
            return Err(LilError::HttpError(format!(
                "HTTP error {status} from {}: {}",
                self.endpoint,
                body.trim()
            )));
        }

        let issues = parse_assigned_issues(&body)?;
        debug!("Decoded {} assigned issues", issues.len());
        Ok(issues)
    }
}

/// Decodes a `GetAssignedIssues` response body.
pub fn parse_assigned_issues(body: &str) -> Result<Vec<Issue>> {
    let response: GraphQlResponse<AssignedIssuesData> = serde_json::from_str(body)?;
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(LilError::GraphQl(messages.join("; ")));
    }
    let data = response.data.ok_or_else(|| {
        LilError::Api("received empty response from GetAssignedIssues query".to_string())
    })?;
    Ok(data.viewer.assigned_issues.nodes.unwrap_or_default())
}

fn build_http_client(api_key: &str) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    // Linear personal keys go in the header as-is, without a "Bearer" prefix.
    let mut auth = HeaderValue::from_str(api_key)
        .map_err(|e| LilError::Config(format!("LINEAR_API_KEY is not a valid header value: {e}")))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config_for(url: &str, key: Option<&str>) -> Config {
        let mut vars = HashMap::new();
        vars.insert("LIL_API_URL".to_string(), url.to_string());
        if let Some(key) = key {
            vars.insert("LINEAR_API_KEY".to_string(), key.to_string());
        }
        Config::from_lookup(|k| vars.get(k).cloned()).unwrap()
    }

    fn node(identifier: &str) -> serde_json::Value {
        json!({
            "id": format!("id-{identifier}"),
            "identifier": identifier,
            "title": "Do it",
            "url": format!("https://linear.app/acme/issue/{identifier}"),
            "dueDate": null,
            "createdAt": "2024-02-01T10:00:00.000Z",
            "state": {"id": "s", "name": "Todo", "type": "unstarted"},
            "project": null,
            "assignee": {"id": "u", "name": "Ada", "displayName": null}
        })
    }

    #[test]
    fn new_requires_api_key() {
        let config = config_for("https://api.linear.app/graphql", None);
        assert!(matches!(
            LinearClient::new(&config),
            Err(LilError::MissingApiKey)
        ));
    }

    #[test]
    fn new_rejects_insecure_endpoint() {
        let config = config_for("http://api.linear.app/graphql", Some("key"));
        assert!(matches!(
            LinearClient::new(&config),
            Err(LilError::ValidationError(_))
        ));
    }

    #[test]
    fn parses_nodes() {
        let body = json!({"data": {"viewer": {"assignedIssues": {"nodes": [node("ENG-1")]}}}});
        let issues = parse_assigned_issues(&body.to_string()).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].identifier, "ENG-1");
    }

    #[test]
    fn null_nodes_are_empty() {
        let body = r#"{"data": {"viewer": {"assignedIssues": {"nodes": null}}}}"#;
        assert!(parse_assigned_issues(body).unwrap().is_empty());
    }

    #[test]
    fn graphql_errors_are_reported() {
        let body = r#"{"data": null, "errors": [{"message": "Authentication required"}, {"message": "again"}]}"#;
        match parse_assigned_issues(body) {
            Err(LilError::GraphQl(msg)) => assert_eq!(msg, "Authentication required; again"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_data_is_an_api_error() {
        assert!(matches!(
            parse_assigned_issues(r#"{"data": null}"#),
            Err(LilError::Api(_))
        ));
    }

    #[tokio::test]
    async fn sends_raw_key_and_decodes_issues() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(header("authorization", "lin_api_test"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"viewer": {"assignedIssues": {"nodes": [node("ENG-7"), node("ENG-8")]}}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&format!("{}/graphql", server.uri()), Some("lin_api_test"));
        let client = LinearClient::new(&config).unwrap();
        let issues = client.fetch_assigned_issues().await.unwrap();
        let ids: Vec<_> = issues.iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(ids, ["ENG-7", "ENG-8"]);
    }

    #[tokio::test]
    async fn http_failures_carry_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let config = config_for(&format!("{}/graphql", server.uri()), Some("bad"));
        let client = LinearClient::new(&config).unwrap();
        match client.fetch_assigned_issues().await {
            Err(LilError::HttpError(msg)) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("unauthorized"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_failures_are_transport_errors() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = config_for(&format!("http://127.0.0.1:{port}/graphql"), Some("key"));
        let client = LinearClient::new(&config).unwrap();
        match client.fetch_assigned_issues().await {
            Err(LilError::Http(err)) => assert!(err.is_connect() || err.is_request()),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
