//! Inbound chat messages handed to the helper.

/// Max chars of message text written to the logs.
const MAX_PREVIEW_CHARS: usize = 100;

/// Text cut to a log-friendly length.
pub fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(MAX_PREVIEW_CHARS).collect();
    if text.chars().nth(MAX_PREVIEW_CHARS).is_some() {
        preview.push('…');
    }
    preview
}

/// A text message received from a chat transport.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Chat to answer in (negative = group, positive = DM).
    pub chat_id: i64,
    pub user_id: i64,
    pub username: String,
    pub text: String,
}

impl InboundMessage {
    /// Who sent the message, for log lines.
    pub fn origin(&self) -> String {
        format!("{} ({}) in chat {}", self.username, self.user_id, self.chat_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_preview_unchanged() {
        assert_eq!(preview("git status"), "git status");
    }

    #[test]
    fn test_long_preview_truncated() {
        let preview = preview(&"x".repeat(300));
        assert_eq!(preview.chars().count(), MAX_PREVIEW_CHARS + 1);
        assert!(preview.ends_with('…'));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let preview = preview(&"é".repeat(150));
        assert!(preview.starts_with("éé"));
    }

    #[test]
    fn test_origin() {
        let msg = InboundMessage {
            chat_id: -100123,
            user_id: 923847,
            username: "alice".to_string(),
            text: "hi".to_string(),
        };
        assert_eq!(msg.origin(), "alice (923847) in chat -100123");
    }
}
