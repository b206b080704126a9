use async_trait::async_trait;

use super::client::LlmClient;
use super::types::{LlmRequest, LlmResponse};
use crate::error::Result;

/// 本地回显客户端，离线演示时使用
#[derive(Default, Clone)]
pub struct LocalEchoClient;

#[async_trait]
impl LlmClient for LocalEchoClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let turn = request.messages.len();
        let last = request.last_content().unwrap_or_default();
        Ok(LlmResponse {
            content: format!("[Echo #{}] {}", turn, last),
            metadata: request.metadata,
        })
    }
}
