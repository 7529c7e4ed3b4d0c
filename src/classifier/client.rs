use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::config::ClassifierConfig;
use super::error::{ClassifierError, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// One call to the hosted model: a system instruction, a user message and
/// sampling parameters.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Boundary to the hosted classification service. Returns the raw response text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[async_trait]
impl<F> CompletionClient for F
where
    F: Fn(&CompletionRequest) -> Result<String> + Send + Sync,
{
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self(request)
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic Messages API client.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, config: &ClassifierConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("sluice/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/v1/messages", config.api_url.trim_end_matches('/')),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            system: &request.system,
            messages: [Message {
                role: "user",
                content: &request.user,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        first_text(parsed)
    }
}

fn first_text(response: MessagesResponse) -> Result<String> {
    response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .find_map(|block| block.text)
        .ok_or(ClassifierError::EmptyResponse)
}
