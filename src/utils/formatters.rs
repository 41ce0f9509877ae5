// Formatting utilities for settings embeds

/// `<#id>` for a set channel, "None" otherwise
pub fn channel_mention(channel_id: Option<u64>) -> String {
    channel_id
        .map(|id| format!("<#{}>", id))
        .unwrap_or_else(|| "None".to_string())
}

/// `<@&id>` for a set role, "None" otherwise
pub fn role_mention(role_id: Option<u64>) -> String {
    role_id
        .map(|id| format!("<@&{}>", id))
        .unwrap_or_else(|| "None".to_string())
}

/// Inline-code a free-text value, or "None" when unset
pub fn code_or_none(value: Option<&str>, max_len: usize) -> String {
    match value {
        Some(value) => format!("`{}`", truncate(value, max_len)),
        None => "None".to_string(),
    }
}

/// Truncate string to max length (in chars) with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions() {
        assert_eq!(channel_mention(Some(555)), "<#555>");
        assert_eq!(channel_mention(None), "None");
        assert_eq!(role_mention(Some(12)), "<@&12>");
        assert_eq!(role_mention(None), "None");
    }

    #[test]
    fn test_code_or_none() {
        assert_eq!(code_or_none(Some("chill"), 50), "`chill`");
        assert_eq!(code_or_none(None, 50), "None");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("日本語のプレイリスト", 6), "日本語...");
    }
}
