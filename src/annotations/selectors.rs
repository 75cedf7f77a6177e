use sha2::{Digest, Sha256};

pub const SELECTOR_PREFIX: &str = "0x";
pub const SELECTOR_BYTES: usize = 4;

/// A dispatch selector is `0x` followed by exactly 8 hex digits
pub fn is_valid_selector(selector: &str) -> bool {
    match selector.strip_prefix(SELECTOR_PREFIX) {
        Some(digits) => {
            digits.len() == SELECTOR_BYTES * 2 && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Selector used when a constructor or message doesn't declare one:
/// the first 4 bytes of the SHA-256 of its label.
pub fn derive_selector(label: &str) -> String {
    let digest = Sha256::digest(label.as_bytes());

    let mut selector = String::with_capacity(SELECTOR_PREFIX.len() + SELECTOR_BYTES * 2);
    selector.push_str(SELECTOR_PREFIX);
    for byte in &digest[..SELECTOR_BYTES] {
        selector.push_str(&format!("{byte:02x}"));
    }

    selector
}
