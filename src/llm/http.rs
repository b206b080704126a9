//! OpenAI 兼容的 chat completions 客户端

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::instrument;

use super::client::LlmClient;
use super::types::{LlmRequest, LlmResponse};
use crate::error::{Result, WorkflowError};

#[derive(Clone)]
pub struct OpenAiChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiChatClient {
    pub fn new<S1, S2>(api_key: S1, model: S2) -> Result<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::with_base_url("https://api.openai.com/v1", api_key, model)
    }

    pub fn with_base_url<S1, S2, S3>(base_url: S1, api_key: S2, model: S3) -> Result<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| WorkflowError::Llm(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    fn request_body(&self, request: &LlmRequest) -> Value {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(json!({ "role": "system", "content": system }));
        }
        for message in &request.messages {
            messages.push(json!({ "role": message.role, "content": message.content }));
        }
        json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiChatClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(&request);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| WorkflowError::Llm(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(WorkflowError::Llm(format!(
                "request failed with status {}: {}",
                status, detail
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| WorkflowError::Llm(e.to_string()))?;
        let content = payload["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .ok_or_else(|| WorkflowError::Llm("missing message content".into()))?;

        Ok(LlmResponse {
            content: content.to_string(),
            metadata: Some(payload["usage"].clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{ChatMessage, Conversation};

    #[test]
    fn body_places_system_prompt_first() {
        let client = OpenAiChatClient::with_base_url("http://localhost:1/", "key", "m").unwrap();
        let request = LlmRequest::from_conversation(
            Some("be brief".into()),
            &Conversation::from(ChatMessage::user("hi")),
        );
        let body = client.request_body(&request);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(client.base_url, "http://localhost:1");
    }
}
