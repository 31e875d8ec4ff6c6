//! Notion REST client for the two endpoints the exporter uses.
//!
//! - `POST /databases/{id}/query` with a status filter, to list pages to sync
//! - `GET /blocks/{id}/children`, to list a page's content blocks
//!
//! Both are cursor-paginated; every call here follows cursors until the list is
//! exhausted. Requests are issued one at a time and never retried: any
//! non-success status becomes [`NotionSyncError::Api`].

mod pagination;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};

use notionsync_shared::{Block, NotionSyncError, Page, Result, SyncConfig};

use crate::pagination::PaginatedList;

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("notion-sync/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API protocol version.
const NOTION_VERSION_HEADER: &str = "notion-version";

// ---------------------------------------------------------------------------
// NotionClient
// ---------------------------------------------------------------------------

/// Authenticated client bound to one database.
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: Client,
    base_url: String,
    database_id: String,
    status_property: String,
    status_value: String,
    page_size: u32,
}

impl NotionClient {
    /// Build a client from the runtime sync configuration.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut auth =
            HeaderValue::from_str(&format!("Bearer {}", config.credentials.api_key))
                .map_err(|_| NotionSyncError::config("API key contains invalid header characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let version = HeaderValue::from_str(&config.notion_version).map_err(|_| {
            NotionSyncError::config(format!(
                "invalid notion_version '{}'",
                config.notion_version
            ))
        })?;
        headers.insert(HeaderName::from_static(NOTION_VERSION_HEADER), version);

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| NotionSyncError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
            database_id: config.credentials.database_id.clone(),
            status_property: config.status_property.clone(),
            status_value: config.status_value.clone(),
            page_size: config.page_size,
        })
    }

    /// Query the database for every page whose status equals the configured
    /// value, following cursors until the source reports no further results.
    #[instrument(skip_all, fields(database_id = %self.database_id, status = %self.status_value))]
    pub async fn query_database(&self) -> Result<Vec<Page>> {
        let endpoint = format!("databases/{}/query", self.database_id);
        let url = format!("{}/{endpoint}", self.base_url);

        let mut body = serde_json::json!({
            "filter": {
                "property": self.status_property,
                "select": { "equals": self.status_value },
            }
        });

        let mut pages: Vec<Page> = Vec::new();
        let mut batch = 0usize;

        loop {
            batch += 1;
            let list: PaginatedList<Page> =
                send_json(&endpoint, self.client.post(&url).json(&body)).await?;

            debug!(batch, results = list.results.len(), has_more = list.has_more, "query batch");

            let next = list.continuation().map(str::to_string);
            pages.extend(list.results);

            match next {
                Some(cursor) => body["start_cursor"] = serde_json::Value::String(cursor),
                None => break,
            }
        }

        info!(pages = pages.len(), batches = batch, "database query complete");
        Ok(pages)
    }

    /// Fetch every child block of a page, in order.
    ///
    /// Blocks whose payload cannot be decoded are kept as
    /// [`Block::Unsupported`] so the page still renders.
    #[instrument(skip(self))]
    pub async fn fetch_blocks(&self, page_id: &str) -> Result<Vec<Block>> {
        let endpoint = format!("blocks/{page_id}/children");
        let url = format!("{}/{endpoint}", self.base_url);
        let page_size = self.page_size.to_string();

        let mut blocks: Vec<Block> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = vec![("page_size", page_size.as_str())];
            if let Some(c) = cursor.as_deref() {
                params.push(("start_cursor", c));
            }

            let list: PaginatedList<serde_json::Value> =
                send_json(&endpoint, self.client.get(&url).query(&params)).await?;

            let next = list.continuation().map(str::to_string);
            blocks.extend(list.results.into_iter().map(decode_block));

            match next {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }

        debug!(blocks = blocks.len(), "fetched page blocks");
        Ok(blocks)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Send a request and decode a successful JSON response.
async fn send_json<T: DeserializeOwned>(endpoint: &str, request: RequestBuilder) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| NotionSyncError::Network(format!("{endpoint}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let body = diagnostic_body(&text);
        error!(endpoint, status = status.as_u16(), "Notion API returned an error");
        return Err(NotionSyncError::Api {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| NotionSyncError::parse(format!("{endpoint}: invalid response body: {e}")))
}

/// Pretty-print an error body when it is JSON, otherwise return it verbatim.
fn diagnostic_body(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| text.to_string())
}

fn decode_block(raw: serde_json::Value) -> Block {
    let kind = raw
        .get("type")
        .and_then(|t| t.as_str())
        .unwrap_or("<none>")
        .to_string();
    serde_json::from_value(raw).unwrap_or_else(|e| {
        debug!(kind = %kind, error = %e, "undecodable block, skipping");
        Block::Unsupported
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notionsync_shared::{AppConfig, Credentials, TextBlock};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NotionClient {
        let mut app = AppConfig::default();
        app.notion.api_base_url = format!("{}/v1", server.uri());
        let creds = Credentials {
            api_key: "secret_test".into(),
            database_id: "db1".into(),
        };
        NotionClient::new(&SyncConfig::new(&app, creds).unwrap()).unwrap()
    }

    fn page(id: &str) -> serde_json::Value {
        json!({"object": "page", "id": id, "properties": {}, "last_edited_time": "2024-01-01T00:00:00.000Z"})
    }

    fn paragraph(text: &str) -> serde_json::Value {
        json!({
            "object": "block",
            "type": "paragraph",
            "paragraph": {"rich_text": [{"type": "text", "text": {"content": text}, "plain_text": text}]}
        })
    }

    #[test]
    fn diagnostic_body_pretty_prints_json() {
        let body = diagnostic_body(r#"{"code":"unauthorized"}"#);
        assert!(body.contains("\n"));
        assert!(body.contains("\"code\": \"unauthorized\""));
        assert_eq!(diagnostic_body("<html>bad gateway</html>"), "<html>bad gateway</html>");
    }

    #[tokio::test]
    async fn query_sends_filter_and_headers() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/databases/db1/query"))
            .and(header("authorization", "Bearer secret_test"))
            .and(header("notion-version", "2022-06-28"))
            .and(body_partial_json(json!({
                "filter": {"property": "Status", "select": {"equals": "Completed"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "results": [page("p1")],
                "has_more": false,
                "next_cursor": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let pages = client_for(&server).query_database().await.unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].id, "p1");
    }

    #[tokio::test]
    async fn query_merges_paginated_results_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/databases/db1/query"))
            .and(body_partial_json(json!({"start_cursor": "cursor-2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [page("p3")],
                "has_more": false,
                "next_cursor": null
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/databases/db1/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [page("p1"), page("p2")],
                "has_more": true,
                "next_cursor": "cursor-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let pages = client_for(&server).query_database().await.unwrap();
        let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn query_error_surfaces_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/databases/db1/query"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "object": "error",
                "code": "validation_error",
                "message": "Could not find property with name or id: Status"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).query_database().await.unwrap_err();
        match err {
            NotionSyncError::Api { status, body, .. } => {
                assert_eq!(status, 400);
                assert!(body.contains("validation_error"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn later_query_page_failure_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/databases/db1/query"))
            .and(body_partial_json(json!({"start_cursor": "cursor-2"})))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/databases/db1/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [page("p1")],
                "has_more": true,
                "next_cursor": "cursor-2"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).query_database().await.unwrap_err();
        assert!(matches!(err, NotionSyncError::Api { status: 502, .. }));
    }

    #[tokio::test]
    async fn fetch_blocks_follows_cursor() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/blocks/p1/children"))
            .and(query_param("start_cursor", "b-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [paragraph("second")],
                "has_more": false,
                "next_cursor": null
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/blocks/p1/children"))
            .and(query_param("page_size", "100"))
            .and(header("notion-version", "2022-06-28"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [paragraph("first"), {"type": "divider", "divider": {}}],
                "has_more": true,
                "next_cursor": "b-2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let blocks = client_for(&server).fetch_blocks("p1").await.unwrap();
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    paragraph: TextBlock::plain("first")
                },
                Block::Unsupported,
                Block::Paragraph {
                    paragraph: TextBlock::plain("second")
                },
            ]
        );
    }

    #[tokio::test]
    async fn malformed_block_is_skipped_not_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/blocks/p1/children"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"type": "paragraph"}, paragraph("ok")],
                "has_more": false
            })))
            .mount(&server)
            .await;

        let blocks = client_for(&server).fetch_blocks("p1").await.unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], Block::Unsupported);
    }

    #[tokio::test]
    async fn fetch_blocks_error_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/blocks/missing/children"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "object": "error",
                "code": "object_not_found"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_blocks("missing").await.unwrap_err();
        assert!(err.to_string().contains("object_not_found"));
    }
}
