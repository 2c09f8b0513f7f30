//! Post signatures
//!
//! A configured signature is appended to new post content, after a blank
//! line and a horizontal rule. Content that already ends with the signature
//! block is left alone so the signature never appears twice.

/// Text placed between the content and the signature
pub const SIGNATURE_SEPARATOR: &str = "\n\n---\n";

/// Append `signature` to `content` unless it is absent, blank, or present already
pub fn append_signature(content: &str, signature: Option<&str>) -> String {
    let Some(signature) = signature.filter(|s| !s.trim().is_empty()) else {
        return content.to_string();
    };

    let block = format!("{}{}", SIGNATURE_SEPARATOR, signature);
    if content.ends_with(&block) {
        return content.to_string();
    }
    format!("{}{}", content, block)
}
