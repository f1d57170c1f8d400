//! OpenAI prompt client
//!
//! Operations are a closed set of variants, each mapped to a method and
//! path, and executed through the generic client with bearer auth.

use crate::auth::{BearerBackend, CredentialProvider};
use crate::client::{CallRequest, RestClient};
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::pagination::CallOptions;
use crate::types::{JsonValue, Method};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

// ============================================================================
// Operations
// ============================================================================

/// Supported API operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `POST /v1/chat/completions`
    ChatCompletionsCreate,
    /// `POST /v1/embeddings`
    EmbeddingsCreate,
    /// `GET /v1/models`
    ModelsList,
    /// `GET /v1/models/{model}`
    ModelsRetrieve {
        /// Model id
        model: String,
    },
}

impl Operation {
    /// Method and path for this operation
    pub fn route(&self) -> (Method, String) {
        match self {
            Operation::ChatCompletionsCreate => (Method::POST, "/v1/chat/completions".to_string()),
            Operation::EmbeddingsCreate => (Method::POST, "/v1/embeddings".to_string()),
            Operation::ModelsList => (Method::GET, "/v1/models".to_string()),
            Operation::ModelsRetrieve { model } => (Method::GET, format!("/v1/models/{model}")),
        }
    }

    /// Resolve an `(api, endpoint, action)` triple such as
    /// `("chat", "completions", "create")`
    pub fn from_parts(api: &str, endpoint: &str, action: &str, target: Option<&str>) -> Result<Self> {
        match (api, endpoint, action, target) {
            ("chat", "completions", "create", _) => Ok(Operation::ChatCompletionsCreate),
            ("embeddings", "", "create", _) | ("embeddings", "embeddings", "create", _) => {
                Ok(Operation::EmbeddingsCreate)
            }
            ("models", "", "list", _) | ("models", "models", "list", _) => Ok(Operation::ModelsList),
            ("models", "", "retrieve", Some(model)) | ("models", "models", "retrieve", Some(model)) => {
                Ok(Operation::ModelsRetrieve {
                    model: model.to_string(),
                })
            }
            _ => Err(Error::config(format!(
                "Unsupported operation: {api}.{endpoint}.{action}"
            ))),
        }
    }
}

// ============================================================================
// Wire Types
// ============================================================================

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Token accounting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

/// First choice of a chat completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptReply {
    /// Message content of the first choice
    pub content: String,
    /// Token usage, when reported
    pub usage: Option<Usage>,
}

// ============================================================================
// Client
// ============================================================================

/// OpenAI API client
pub struct OpenAiClient {
    client: RestClient<BearerBackend>,
}

impl OpenAiClient {
    /// Create a client
    pub fn new(credentials: Arc<dyn CredentialProvider>, transport: Arc<dyn Transport>) -> Self {
        Self::from_client(RestClient::new(BearerBackend, credentials, transport))
    }

    /// Wrap a configured client
    pub fn from_client(client: RestClient<BearerBackend>) -> Self {
        Self { client }
    }

    /// Run an operation with an optional JSON body
    pub async fn invoke(&self, operation: &Operation, body: Option<JsonValue>) -> Result<JsonValue> {
        let (method, path) = operation.route();
        let mut request = CallRequest::new(method, path);
        request.body = body;
        self.client.call_value(request, CallOptions::new()).await
    }

    /// Send a system context and a user prompt, returning the first choice
    pub async fn send_prompt(&self, context: &str, prompt: &str, model: &str) -> Result<PromptReply> {
        if context.is_empty() || prompt.is_empty() {
            return Err(Error::config("'context' and 'prompt' cannot be empty strings"));
        }

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::system(context), ChatMessage::user(prompt)],
        };
        let body = serde_json::to_value(&request)?;

        let raw = self
            .invoke(&Operation::ChatCompletionsCreate, Some(body))
            .await?;
        let response: ChatCompletionResponse = serde_json::from_value(raw)
            .map_err(|e| Error::malformed(format!("unexpected chat completion shape: {e}")))?;

        let Some(first) = response.choices.into_iter().next() else {
            return Err(Error::malformed("no choices were returned in the response"));
        };
        if let Some(ref usage) = response.usage {
            info!(
                "Prompt used {} tokens ({} prompt, {} completion)",
                usage.total_tokens, usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(PromptReply {
            content: first.message.content.unwrap_or_default(),
            usage: response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Credentials, StaticCredentials};
    use crate::test_support::ScriptedTransport;
    use serde_json::json;
    use test_case::test_case;

    fn openai(transport: &Arc<ScriptedTransport>) -> OpenAiClient {
        OpenAiClient::new(
            Arc::new(StaticCredentials::new(Credentials::new(
                DEFAULT_BASE_URL,
                "",
                "sk-test",
            ))),
            transport.clone(),
        )
    }

    #[test_case(Operation::ChatCompletionsCreate, Method::POST, "/v1/chat/completions" ; "chat completions")]
    #[test_case(Operation::EmbeddingsCreate, Method::POST, "/v1/embeddings" ; "embeddings")]
    #[test_case(Operation::ModelsList, Method::GET, "/v1/models" ; "models list")]
    #[test_case(Operation::ModelsRetrieve { model: "gpt-4o".to_string() }, Method::GET, "/v1/models/gpt-4o" ; "models retrieve")]
    fn test_operation_routes(operation: Operation, method: Method, path: &str) {
        assert_eq!(operation.route(), (method, path.to_string()));
    }

    #[test]
    fn test_operation_from_parts() {
        assert_eq!(
            Operation::from_parts("chat", "completions", "create", None).unwrap(),
            Operation::ChatCompletionsCreate
        );
        assert_eq!(
            Operation::from_parts("models", "", "retrieve", Some("o1")).unwrap(),
            Operation::ModelsRetrieve {
                model: "o1".to_string()
            }
        );
        assert!(Operation::from_parts("chat", "completions", "delete", None).is_err());
        assert!(Operation::from_parts("models", "", "retrieve", None).is_err());
    }

    #[tokio::test]
    async fn test_send_prompt_returns_first_choice() {
        let transport = Arc::new(ScriptedTransport::new().then_json(
            200,
            json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "Checklist ready"}},
                    {"message": {"role": "assistant", "content": "ignored"}}
                ],
                "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
            }),
        ));

        let reply = openai(&transport)
            .send_prompt("You are a support analyst", "Summarize ticket 7", DEFAULT_MODEL)
            .await
            .unwrap();

        assert_eq!(reply.content, "Checklist ready");
        assert_eq!(reply.usage.unwrap().total_tokens, 15);

        let request = &transport.requests()[0];
        assert_eq!(request.url.as_str(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(request.headers.get("authorization").unwrap(), "Bearer sk-test");
        assert_eq!(
            request.body,
            Some(json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "You are a support analyst"},
                    {"role": "user", "content": "Summarize ticket 7"}
                ]
            }))
        );
    }

    #[tokio::test]
    async fn test_send_prompt_rejects_empty_input() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = openai(&transport);

        assert!(client.send_prompt("", "p", DEFAULT_MODEL).await.is_err());
        assert!(client.send_prompt("c", "", DEFAULT_MODEL).await.is_err());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_send_prompt_without_choices() {
        let transport =
            Arc::new(ScriptedTransport::new().then_json(200, json!({"choices": []})));

        let err = openai(&transport)
            .send_prompt("c", "p", DEFAULT_MODEL)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_invoke_models_list() {
        let transport = Arc::new(
            ScriptedTransport::new().then_json(200, json!({"data": [{"id": "gpt-4o"}]})),
        );

        let models = openai(&transport)
            .invoke(&Operation::ModelsList, None)
            .await
            .unwrap();

        assert_eq!(models["data"][0]["id"], "gpt-4o");
        assert_eq!(transport.requests()[0].method, Method::GET);
    }
}
