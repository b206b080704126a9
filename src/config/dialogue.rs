use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env::EnvConfig;
use crate::error::{Result, WorkflowError};
use crate::utils::ConfigValidator;

pub const API_KEY_ENV: &str = "TURNFLOW_API_KEY";
pub const MODEL_ENV: &str = "TURNFLOW_MODEL";
pub const BASE_URL_ENV: &str = "TURNFLOW_BASE_URL";

const TEACHER_INSTRUCTIONS: &str = "You are Dr. Smith, a teacher. Ask the student one short, simple \
question at a time to test their knowledge. Never repeat a question, switch topics each time \
(science, math, history, geography, ...) and do not explain anything.";

const STUDENT_INSTRUCTIONS: &str = "You are Jamie, a student. Answer the teacher's questions \
directly in one or two sentences and never ask questions back.";

/// 师生问答的完整配置，所有字段都有默认值
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DialogueConfig {
    pub start_message: String,
    pub max_turns: u32,
    /// 学生回答中出现该词（忽略大小写）时提前结束
    pub sentinel: Option<String>,
    pub think_delay_ms: u64,
    pub agent_timeout_secs: Option<u64>,
    pub teacher: ParticipantConfig,
    pub student: ParticipantConfig,
    pub llm: LlmSettings,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            start_message: "Start the quiz session.".to_string(),
            max_turns: 5,
            sentinel: None,
            think_delay_ms: 0,
            agent_timeout_secs: Some(60),
            teacher: ParticipantConfig::new("teacher", "Teacher", TEACHER_INSTRUCTIONS),
            student: ParticipantConfig::new("student", "Student", STUDENT_INSTRUCTIONS),
            llm: LlmSettings::default(),
        }
    }
}

impl DialogueConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            WorkflowError::Config(format!("failed to read `{}`: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| WorkflowError::Config(format!("invalid dialogue config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// `TURNFLOW_MODEL` / `TURNFLOW_BASE_URL` 覆盖文件中的设置
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(model) = EnvConfig::get_env_optional(MODEL_ENV) {
            self.llm.model = model;
        }
        if let Some(base_url) = EnvConfig::get_env_optional(BASE_URL_ENV) {
            self.llm.base_url = base_url;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_node_id(&self.teacher.id)?;
        ConfigValidator::validate_node_id(&self.student.id)?;
        if self.teacher.id == self.student.id {
            return Err(WorkflowError::Config(format!(
                "teacher and student share the id `{}`",
                self.teacher.id
            )));
        }
        if let Some(sentinel) = &self.sentinel {
            if sentinel.trim().is_empty() {
                return Err(WorkflowError::Config("sentinel must not be blank".into()));
            }
        }
        if self.agent_timeout_secs == Some(0) {
            return Err(WorkflowError::Config("agent timeout must be positive".into()));
        }
        self.llm.validate()
    }

    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    pub fn agent_timeout(&self) -> Option<Duration> {
        self.agent_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParticipantConfig {
    pub id: String,
    pub name: String,
    pub instructions: String,
}

impl ParticipantConfig {
    pub fn new(id: &str, name: &str, instructions: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            instructions: instructions.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    /// 原样的 key、`${VAR}` 或留空（读取 `TURNFLOW_API_KEY`）
    pub api_key: String,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: String::new(),
            temperature: 0.7,
        }
    }
}

impl LlmSettings {
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_url(&self.base_url)?;
        ConfigValidator::validate_model_name(&self.model)?;
        ConfigValidator::validate_temperature(self.temperature)
    }

    pub fn resolve_api_key(&self) -> Result<String> {
        let key = EnvConfig::get_api_key(&self.api_key, API_KEY_ENV)?;
        ConfigValidator::validate_api_key(&key)?;
        Ok(key)
    }
}
