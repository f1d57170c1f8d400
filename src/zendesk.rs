//! Zendesk ticketing resources
//!
//! Thin wrappers over the generic client for the ticket and user endpoints
//! the support workflow needs.

use crate::auth::{CredentialProvider, ZendeskBackend};
use crate::client::{CallRequest, RestClient};
use crate::error::Result;
use crate::http::Transport;
use crate::pagination::CallOptions;
use crate::types::JsonValue;
use std::sync::Arc;

/// Zendesk API client
pub struct ZendeskClient {
    client: RestClient<ZendeskBackend>,
}

impl ZendeskClient {
    /// Create a client with the default (no retry) policy
    pub fn new(credentials: Arc<dyn CredentialProvider>, transport: Arc<dyn Transport>) -> Self {
        Self::from_client(RestClient::new(ZendeskBackend, credentials, transport))
    }

    /// Wrap a configured client
    pub fn from_client(client: RestClient<ZendeskBackend>) -> Self {
        Self { client }
    }

    /// The underlying generic client
    pub fn client(&self) -> &RestClient<ZendeskBackend> {
        &self.client
    }

    /// `POST /api/v2/tickets`
    pub async fn ticket_create(&self, data: JsonValue) -> Result<JsonValue> {
        self.client.post("/api/v2/tickets", data).await
    }

    /// `GET /api/v2/tickets/{id}`
    pub async fn ticket_show(&self, ticket_id: u64) -> Result<JsonValue> {
        self.client
            .get(&format!("/api/v2/tickets/{ticket_id}"))
            .await
    }

    /// `PUT /api/v2/tickets/{id}`
    pub async fn ticket_update(&self, ticket_id: u64, data: JsonValue) -> Result<JsonValue> {
        self.client
            .put(&format!("/api/v2/tickets/{ticket_id}"), data)
            .await
    }

    /// `GET /api/v2/tickets/{id}/comments`, every page merged
    pub async fn ticket_list_comments(&self, ticket_id: u64) -> Result<JsonValue> {
        self.client
            .get_all_pages(&format!("/api/v2/tickets/{ticket_id}/comments"))
            .await
    }

    /// `GET /api/v2/users/{id}`
    pub async fn show_user(&self, user_id: u64) -> Result<JsonValue> {
        self.client.get(&format!("/api/v2/users/{user_id}")).await
    }

    /// `GET /api/v2/users/show_many?ids=...`
    pub async fn show_many_users(&self, user_ids: &[u64]) -> Result<JsonValue> {
        let ids = user_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.client
            .call_value(
                CallRequest::get("/api/v2/users/show_many").query("ids", ids),
                CallOptions::new(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Credentials, StaticCredentials};
    use crate::test_support::ScriptedTransport;
    use crate::types::Method;
    use serde_json::json;

    fn zendesk(transport: &Arc<ScriptedTransport>) -> ZendeskClient {
        ZendeskClient::new(
            Arc::new(StaticCredentials::new(Credentials::new(
                "https://acme.zendesk.com",
                "agent@acme.test",
                "tok",
            ))),
            transport.clone(),
        )
    }

    #[tokio::test]
    async fn test_ticket_create() {
        let transport = Arc::new(
            ScriptedTransport::new().then_json(201, json!({"ticket": {"id": 35436}})),
        );
        let body = json!({"ticket": {"subject": "Printer on fire", "comment": {"body": "Help"}}});

        let created = zendesk(&transport).ticket_create(body.clone()).await.unwrap();

        assert_eq!(created["ticket"]["id"], 35436);
        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.path(), "/api/v2/tickets");
        assert_eq!(request.body, Some(body));
    }

    #[tokio::test]
    async fn test_ticket_show_and_update_paths() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .then_json(200, json!({"ticket": {"id": 7}}))
                .then_json(200, json!({"ticket": {"id": 7, "status": "solved"}})),
        );
        let client = zendesk(&transport);

        client.ticket_show(7).await.unwrap();
        client
            .ticket_update(7, json!({"ticket": {"status": "solved"}}))
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].url.path(), "/api/v2/tickets/7");
        assert_eq!(requests[1].method, Method::PUT);
        assert_eq!(requests[1].url.path(), "/api/v2/tickets/7");
    }

    #[tokio::test]
    async fn test_ticket_list_comments_follows_pages() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .then_json(
                    200,
                    json!({
                        "comments": [{"id": 1}],
                        "next_page": "https://acme.zendesk.com/api/v2/tickets/7/comments?page=2"
                    }),
                )
                .then_json(200, json!({"comments": [{"id": 2}], "next_page": null})),
        );

        let comments = zendesk(&transport).ticket_list_comments(7).await.unwrap();

        assert_eq!(comments["comments"], json!([{"id": 1}, {"id": 2}]));
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_show_many_users_query() {
        let transport =
            Arc::new(ScriptedTransport::new().then_json(200, json!({"users": []})));

        zendesk(&transport).show_many_users(&[1, 22, 333]).await.unwrap();

        let url = &transport.requests()[0].url;
        assert_eq!(url.path(), "/api/v2/users/show_many");
        assert_eq!(url.query(), Some("ids=1%2C22%2C333"));
    }

    #[tokio::test]
    async fn test_show_user_path() {
        let transport = Arc::new(ScriptedTransport::new().then_json(200, json!({"user": {}})));
        zendesk(&transport).show_user(99).await.unwrap();
        assert_eq!(transport.requests()[0].url.path(), "/api/v2/users/99");
    }
}
