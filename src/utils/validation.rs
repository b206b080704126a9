use crate::error::{Result, WorkflowError};

/// 节点 ID 只允许字母、数字、下划线和短横线
pub fn is_valid_node_id(node_id: &str) -> bool {
    !node_id.is_empty()
        && node_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 验证 API Key，拒绝空值和明显的占位符
    pub fn validate_api_key(api_key: &str) -> Result<()> {
        if api_key.is_empty() {
            return Err(WorkflowError::Config("api key must not be empty".into()));
        }

        if api_key.starts_with("your_") || api_key.starts_with("sk-") && api_key.len() < 20 {
            return Err(WorkflowError::Config(
                "api key looks like a placeholder".into(),
            ));
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(WorkflowError::Config("url must not be empty".into()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(WorkflowError::Config(format!(
                "url `{}` must start with http:// or https://",
                url
            )));
        }

        Ok(())
    }

    pub fn validate_model_name(model: &str) -> Result<()> {
        if model.trim().is_empty() {
            return Err(WorkflowError::Config("model name must not be empty".into()));
        }

        let lower = model.to_lowercase();
        if lower.contains("gpt") && !lower.contains("gpt-") {
            tracing::warn!(
                model = %model,
                "model name looks unusual, GPT models are usually named like `gpt-4o`"
            );
        }

        Ok(())
    }

    pub fn validate_node_id(node_id: &str) -> Result<()> {
        if !is_valid_node_id(node_id) {
            return Err(WorkflowError::Config(format!(
                "node id `{}` may only contain letters, digits, `_` and `-`",
                node_id
            )));
        }
        Ok(())
    }

    pub fn validate_temperature(temperature: f32) -> Result<()> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(WorkflowError::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_api_key() {
        assert!(ConfigValidator::validate_api_key("").is_err());
        assert!(ConfigValidator::validate_api_key("your_api_key_here").is_err());
        assert!(ConfigValidator::validate_api_key("sk-short").is_err());
        assert!(ConfigValidator::validate_api_key("sk-1234567890abcdef1234567890").is_ok());
    }

    #[test]
    fn test_validate_url() {
        assert!(ConfigValidator::validate_url("").is_err());
        assert!(ConfigValidator::validate_url("example.com").is_err());
        assert!(ConfigValidator::validate_url("http://example.com").is_ok());
        assert!(ConfigValidator::validate_url("https://example.com").is_ok());
    }

    #[test]
    fn test_validate_node_id() {
        assert!(ConfigValidator::validate_node_id("").is_err());
        assert!(ConfigValidator::validate_node_id("teacher").is_ok());
        assert!(ConfigValidator::validate_node_id("node_1").is_ok());
        assert!(ConfigValidator::validate_node_id("node@1").is_err());
        assert!(!is_valid_node_id("学生"));
    }

    #[test]
    fn test_validate_temperature() {
        assert!(ConfigValidator::validate_temperature(-0.1).is_err());
        assert!(ConfigValidator::validate_temperature(0.0).is_ok());
        assert!(ConfigValidator::validate_temperature(2.0).is_ok());
        assert!(ConfigValidator::validate_temperature(2.1).is_err());
    }
}
