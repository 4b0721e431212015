//! Helpers for values that go into log fields.

/// Characters of the prompt kept in log output.
const PROMPT_PREVIEW_CHARS: usize = 40;

/// Prompt excerpt for logs, only when payload logging is enabled.
pub fn prompt_preview(prompt: &str, log_payloads: bool) -> Option<String> {
    if !log_payloads {
        return None;
    }
    let mut preview: String = prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
    if prompt.chars().count() > PROMPT_PREVIEW_CHARS {
        preview.push_str("...");
    }
    Some(preview)
}

/// Show only the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let secret = secret.trim();
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(8), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_preview_disabled() {
        assert_eq!(prompt_preview("a cat", false), None);
    }

    #[test]
    fn test_prompt_preview_truncates() {
        let long = "x".repeat(50);
        let preview = prompt_preview(&long, true).unwrap();
        assert_eq!(preview.len(), 43);
        assert!(preview.ends_with("..."));
        assert_eq!(prompt_preview("short", true).as_deref(), Some("short"));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "(not set)");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret("sk-1234567890"), "********7890");
    }
}
