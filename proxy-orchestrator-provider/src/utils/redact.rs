//! Redaction helpers for log output
//!
//! Response bodies can be large and API tokens must never be logged in full.

/// Characters of a body kept in log lines.
const MAX_LOGGED_CHARS: usize = 300;

/// Visible prefix of a masked secret.
const SECRET_PREFIX_CHARS: usize = 4;

/// Cut `s` to [`MAX_LOGGED_CHARS`] characters, noting the original size.
pub fn truncate_for_log(s: &str) -> String {
    match s.char_indices().nth(MAX_LOGGED_CHARS) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}... ({} bytes total)", &s[..cut], s.len()),
    }
}

/// `abcd****` for tokens; short secrets are fully masked.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= SECRET_PREFIX_CHARS * 2 {
        return "****".to_string();
    }
    let prefix: String = secret.chars().take(SECRET_PREFIX_CHARS).collect();
    format!("{prefix}****")
}
