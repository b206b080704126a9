use crate::agent::Conversation;
use crate::config::DialogueConfig;

/// 决定对话何时结束：轮次上限，或最新一条消息中出现哨兵词
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnPolicy {
    pub max_turns: u32,
    pub sentinel: Option<String>,
}

impl TurnPolicy {
    pub fn new(max_turns: u32) -> Self {
        Self {
            max_turns,
            sentinel: None,
        }
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = Some(sentinel.into());
        self
    }

    pub fn limit_reached(&self, turns: u32) -> bool {
        turns >= self.max_turns
    }

    /// 忽略大小写的子串匹配，只看最新一条消息
    pub fn sentinel_in(&self, conversation: &Conversation) -> bool {
        let (Some(sentinel), Some(latest)) = (&self.sentinel, conversation.last()) else {
            return false;
        };
        latest
            .content()
            .to_lowercase()
            .contains(&sentinel.to_lowercase())
    }
}

impl From<&DialogueConfig> for TurnPolicy {
    fn from(config: &DialogueConfig) -> Self {
        Self {
            max_turns: config.max_turns,
            sentinel: config.sentinel.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ChatMessage;

    #[test]
    fn sentinel_matches_any_case_in_latest_turn_only() {
        let policy = TurnPolicy::new(5).with_sentinel("completed");
        let mut conversation = Conversation::from(ChatMessage::user("quiz COMPLETED?"));
        conversation.push(ChatMessage::assistant("Paris"));
        assert!(!policy.sentinel_in(&conversation));

        conversation.push(ChatMessage::assistant("All done, CoMpLeTeD."));
        assert!(policy.sentinel_in(&conversation));
    }

    #[test]
    fn no_sentinel_never_matches() {
        let policy = TurnPolicy::new(1);
        let conversation = Conversation::from(ChatMessage::assistant("completed"));
        assert!(!policy.sentinel_in(&conversation));
        assert!(policy.limit_reached(1));
        assert!(!policy.limit_reached(0));
    }
}
