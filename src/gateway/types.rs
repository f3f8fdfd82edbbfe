//! Request schemas accepted by the gateway.
//!
//! Optional fields are `Option`s skipped on serialization, so the upstream
//! only ever sees keys the caller actually supplied. An explicit JSON `null`
//! from the caller is treated as absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /generate`, forwarded to `/api/generate`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Token context returned by a previous generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<i64>>,

    /// Model tuning parameters (temperature, num_ctx, ...), passed through as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<bool>,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            system: None,
            template: None,
            context: None,
            options: None,
            stream: None,
            raw: None,
        }
    }
}

/// One turn of a chat conversation. `role` is not restricted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Body of `POST /chat`, forwarded to `/api/chat`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatRequest {
    pub model: String,

    /// May be empty, but the key itself is required.
    pub messages: Vec<ChatMessage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generation_request_omits_absent_fields() {
        let request: GenerationRequest = serde_json::from_value(json!({
            "prompt": "Why is the sky blue?",
            "model": "llama3",
        }))
        .unwrap();

        let outbound = serde_json::to_value(&request).unwrap();
        assert_eq!(outbound, json!({"prompt": "Why is the sky blue?", "model": "llama3"}));
    }

    #[test]
    fn test_generation_request_explicit_null_is_dropped() {
        let request: GenerationRequest = serde_json::from_value(json!({
            "prompt": "hi",
            "model": "llama3",
            "system": null,
            "stream": false,
        }))
        .unwrap();

        let outbound = serde_json::to_value(&request).unwrap();
        let keys: Vec<&String> = outbound.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(outbound["stream"], json!(false));
        assert!(outbound.get("system").is_none());
    }

    #[test]
    fn test_generation_request_keeps_supplied_fields() {
        let input = json!({
            "prompt": "continue",
            "model": "mistral",
            "system": "be terse",
            "template": "{{ .Prompt }}",
            "context": [1, 2, 3],
            "options": {"temperature": 0.2, "stop": ["\n"]},
            "stream": true,
            "raw": true,
        });
        let request: GenerationRequest = serde_json::from_value(input.clone()).unwrap();

        assert_eq!(serde_json::to_value(&request).unwrap(), input);
    }

    #[test]
    fn test_generation_request_requires_prompt_and_model() {
        let missing_prompt =
            serde_json::from_value::<GenerationRequest>(json!({"model": "llama3"}));
        assert!(missing_prompt.unwrap_err().to_string().contains("prompt"));

        let missing_model = serde_json::from_value::<GenerationRequest>(json!({"prompt": "hi"}));
        assert!(missing_model.unwrap_err().to_string().contains("model"));
    }

    #[test]
    fn test_chat_request_allows_empty_messages() {
        let request: ChatRequest =
            serde_json::from_value(json!({"model": "llama3", "messages": []})).unwrap();
        assert!(request.messages.is_empty());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"model": "llama3", "messages": []})
        );
    }

    #[test]
    fn test_chat_request_requires_messages_key() {
        let err = serde_json::from_value::<ChatRequest>(json!({"model": "llama3"})).unwrap_err();
        assert!(err.to_string().contains("messages"));
    }

    #[test]
    fn test_chat_message_accepts_any_role() {
        let request: ChatRequest = serde_json::from_value(json!({
            "model": "llama3",
            "messages": [{"role": "tool", "content": "42"}],
            "options": {"seed": 7},
        }))
        .unwrap();

        assert_eq!(request.messages, vec![ChatMessage::new("tool", "42")]);
        assert_eq!(request.options.unwrap()["seed"], json!(7));
    }
}
