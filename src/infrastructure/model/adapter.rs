//! Message adapters - convert the domain conversation to provider wire formats

use crate::types::{ChatMessage, MessageRole};
use serde_json::{Value, json};

/// Adapter for converting messages to different API formats
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to OpenAI-style format
    /// Returns: [{"role": "...", "content": "..."}]
    pub fn to_openai_format(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_str(),
                    "content": msg.content.to_json()
                })
            })
            .collect()
    }

    /// Convert messages to Anthropic Messages format
    /// Returns: (system_text, messages) - the Messages API takes the system
    /// prompt as a separate top-level field
    pub fn to_anthropic_format(messages: &[ChatMessage]) -> (Option<String>, Vec<Value>) {
        let mut system_parts = Vec::new();
        let mut converted = Vec::new();

        for message in messages {
            match message.role {
                MessageRole::System => {
                    if let Some(text) = message.content.as_text() {
                        system_parts.push(text.to_string());
                    }
                }
                MessageRole::User | MessageRole::Assistant => converted.push(json!({
                    "role": message.role.as_str(),
                    "content": message.content.to_json()
                })),
                _ => {}
            }
        }

        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };

        (system, converted)
    }

    /// Convert messages to Gemini format
    /// Returns: (system_instruction_text, contents)
    pub fn to_gemini_format(messages: &[ChatMessage]) -> (Option<String>, Vec<Value>) {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            match message.role {
                MessageRole::System => {
                    if let Some(text) = message.content.as_text() {
                        system_parts.push(text.to_string());
                    }
                }
                MessageRole::User => contents.push(json!({
                    "role": "user",
                    "parts": [{"text": message.content.to_json()}]
                })),
                MessageRole::Assistant => contents.push(json!({
                    "role": "model",
                    "parts": [{"text": message.content.to_json()}]
                })),
                _ => {}
            }
        }

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };

        (system_instruction, contents)
    }
}
