//! Output formatting for CLI.

mod json;
mod text;

use apiexplorer_core::ConnectionConfig;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Number of token characters left visible when masking.
const VISIBLE_TOKEN_CHARS: usize = 4;

/// Masks a token for display, keeping a short prefix.
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return String::new();
    }
    let count = token.chars().count();
    if count <= VISIBLE_TOKEN_CHARS * 2 {
        return "*".repeat(count.min(8));
    }
    let prefix: String = token.chars().take(VISIBLE_TOKEN_CHARS).collect();
    format!("{prefix}…")
}

/// Returns a copy of `config` safe to print.
pub fn masked_config(config: &ConnectionConfig) -> ConnectionConfig {
    let mut masked = config.clone();
    masked.token = mask_token(&config.token);
    masked
}
