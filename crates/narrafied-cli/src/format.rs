//! Display helpers for terminal output.

/// Format a listen time given in seconds, e.g. "2h 05m", "12m", "40s"
pub fn format_listen_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", seconds)
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None or empty
pub fn format_optional(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    // Try to parse ISO format and convert to readable
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 && date.is_char_boundary(10) {
        // Try to parse YYYY-MM-DD format
        date[..10].to_string()
    } else {
        date.to_string()
    }
}

/// Number of leading token characters left visible
const TOKEN_VISIBLE_CHARS: usize = 4;

/// Show only the start of a token. Short tokens are hidden entirely.
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= TOKEN_VISIBLE_CHARS {
        return "…".to_string();
    }
    let visible: String = token.chars().take(TOKEN_VISIBLE_CHARS).collect();
    format!("{}…", visible)
}
