use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::{AnthropicClient, CompletionClient, CompletionRequest};
use super::config::ClassifierConfig;
use super::error::{ClassifierError, Result};
use super::{classification_input, Classifier};
use crate::domain::Category;

/// Environment variable consulted when no key is configured.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

const LABEL_MAX_TOKENS: u32 = 50;
const STRUCTURED_MAX_TOKENS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => Confidence::High,
            "medium" => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        };
        f.write_str(s)
    }
}

/// Category plus the model's confidence and rationale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub category: Category,
    pub confidence: Confidence,
    pub reasoning: String,
}

// Fields stay untyped so a missing or non-string value degrades per field
// instead of rejecting the whole object.
#[derive(Deserialize)]
struct StructuredResponse {
    #[serde(default)]
    category: Option<Value>,
    #[serde(default)]
    confidence: Option<Value>,
    #[serde(default)]
    reasoning: Option<Value>,
}

/// Classifies through a hosted language model constrained to the taxonomy.
pub struct LlmClassifier {
    client: Box<dyn CompletionClient>,
}

impl LlmClassifier {
    /// Build the HTTP-backed classifier. Fails with
    /// [`ClassifierError::MissingCredential`] when no key can be resolved.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let client = AnthropicClient::new(api_key, config)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: impl CompletionClient + 'static) -> Self {
        Self {
            client: Box::new(client),
        }
    }

    /// Classification with confidence and rationale, requested as JSON.
    ///
    /// Unparseable output falls back to the plain label path with low
    /// confidence; a category outside the taxonomy becomes the fallback.
    pub async fn classify_detailed(&self, title: &str, description: &str) -> Classification {
        let request = CompletionRequest {
            system: structured_prompt(),
            user: user_message(title, description),
            temperature: 0.0,
            max_tokens: STRUCTURED_MAX_TOKENS,
        };

        let raw = match self.client.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(title, error = %e, "Detailed classification failed");
                return Classification {
                    category: Category::FALLBACK,
                    confidence: Confidence::Low,
                    reasoning: e.to_string(),
                };
            }
        };

        match parse_structured(&raw) {
            Ok(classification) => classification,
            Err(e) => {
                tracing::warn!(title, error = %e, "Structured response unusable, using label path");
                Classification {
                    category: self.classify(title, description).await,
                    confidence: Confidence::Low,
                    reasoning: "Simple classification fallback".to_string(),
                }
            }
        }
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn classify(&self, title: &str, description: &str) -> Category {
        let request = CompletionRequest {
            system: system_prompt(),
            user: user_message(title, description),
            temperature: 0.0,
            max_tokens: LABEL_MAX_TOKENS,
        };

        match self.client.complete(&request).await {
            Ok(raw) => interpret_label(&raw),
            Err(e) => {
                tracing::error!(title, error = %e, "Classification failed");
                Category::FALLBACK
            }
        }
    }
}

/// Resolve the API key from explicit configuration, then the environment.
pub fn resolve_api_key(explicit: Option<&str>) -> Result<String> {
    resolve_api_key_from(explicit, std::env::var(API_KEY_ENV).ok())
}

fn resolve_api_key_from(explicit: Option<&str>, env_value: Option<String>) -> Result<String> {
    explicit
        .map(str::to_string)
        .filter(|k| !k.trim().is_empty())
        .or_else(|| env_value.filter(|k| !k.trim().is_empty()))
        .ok_or(ClassifierError::MissingCredential)
}

fn system_prompt() -> String {
    let mut prompt =
        String::from("你是一个内容分类专家。你的任务是将提供的内容分类到以下类别之一:\n\n");
    for category in Category::ALL {
        prompt.push_str(&format!("- {}: {}\n", category.label(), category.gloss()));
    }
    prompt.push_str("\n请只返回类别名称,不要添加任何解释。如果内容跨越多个类别,选择最主要的一个。");
    prompt
}

fn structured_prompt() -> String {
    format!(
        "{}\n\n请以JSON格式返回结果:\n{{\n  \"category\": \"类别名称\",\n  \"confidence\": \"high/medium/low\",\n  \"reasoning\": \"简短的分类理由\"\n}}",
        system_prompt()
    )
}

fn user_message(title: &str, description: &str) -> String {
    let mut content = format!("标题: {}\n", title);
    let description = classification_input(description);
    if !description.is_empty() {
        content.push_str("描述: ");
        content.push_str(description);
    }
    content
}

/// Map raw model output onto the taxonomy: exact label, then the first label
/// contained in the text, then the fallback.
fn interpret_label(raw: &str) -> Category {
    let trimmed = raw.trim();
    if let Some(category) = Category::from_label(trimmed) {
        return category;
    }
    Category::ALL
        .into_iter()
        .find(|c| trimmed.contains(c.label()))
        .unwrap_or(Category::FALLBACK)
}

fn parse_structured(raw: &str) -> Result<Classification> {
    let body = strip_code_fence(raw.trim());
    let parsed: StructuredResponse = serde_json::from_str(body)?;
    Ok(Classification {
        category: parsed
            .category
            .as_ref()
            .and_then(Value::as_str)
            .map(|label| Category::from_label_or_fallback(label.trim()))
            .unwrap_or(Category::FALLBACK),
        confidence: parsed
            .confidence
            .as_ref()
            .and_then(Value::as_str)
            .map(Confidence::parse)
            .unwrap_or(Confidence::Low),
        reasoning: parsed
            .reasoning
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default(),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
