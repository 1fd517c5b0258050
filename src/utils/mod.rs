pub mod base64;
pub mod json;
pub mod plugin;
pub mod url;

// Re-export common utilities
pub use self::base64::{base64_decode, base64_encode, url_safe_base64_encode};
pub use self::url::{url_decode, url_encode};

/// Returns `Some` for non-blank strings, trimming surrounding whitespace.
pub fn non_empty(value: impl AsRef<str>) -> Option<String> {
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
