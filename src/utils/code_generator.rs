//! Short code generation and validation utilities.
//!
//! Codes are drawn uniformly from a fixed 66-symbol alphabet. Generation makes
//! no uniqueness promise; [`crate::application::services::LinkService`] retries
//! against the store until a free code is found.

use rand::Rng;

use crate::domain::errors::LinkError;

/// Symbols a short code may contain: letters, digits and `+ - _ !`.
pub const CODE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-_!";

/// Length used when the caller does not ask for a specific one.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Longest custom code accepted from callers.
pub const MAX_CUSTOM_CODE_LENGTH: usize = 50;

/// Generates a random short code.
///
/// `None` or `Some(0)` selects [`DEFAULT_CODE_LENGTH`]. Each call draws from the
/// calling thread's OS-seeded generator, so concurrent requests never share or
/// replay a sequence.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(None);
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_code(length: Option<usize>) -> String {
    let length = match length {
        Some(0) | None => DEFAULT_CODE_LENGTH,
        Some(n) => n,
    };

    let mut rng = rand::rng();
    (0..length)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 1-50 characters
/// - Characters: the same alphabet generated codes use
///
/// # Errors
///
/// Returns [`LinkError::InvalidCustomCode`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), LinkError> {
    if code.is_empty() || code.len() > MAX_CUSTOM_CODE_LENGTH {
        return Err(LinkError::InvalidCustomCode(format!(
            "must be 1-{} characters, got {}",
            MAX_CUSTOM_CODE_LENGTH,
            code.len()
        )));
    }

    if let Some(bad) = code.bytes().find(|b| !CODE_ALPHABET.contains(b)) {
        return Err(LinkError::InvalidCustomCode(format!(
            "character '{}' is not allowed",
            bad as char
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_has_66_distinct_symbols() {
        let symbols: HashSet<_> = CODE_ALPHABET.iter().collect();
        assert_eq!(CODE_ALPHABET.len(), 66);
        assert_eq!(symbols.len(), 66);
    }

    #[test]
    fn test_generate_code_default_length() {
        assert_eq!(generate_code(None).len(), DEFAULT_CODE_LENGTH);
        assert_eq!(generate_code(Some(0)).len(), DEFAULT_CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_requested_length() {
        assert_eq!(generate_code(Some(10)).len(), 10);
    }

    #[test]
    fn test_generate_code_uses_alphabet() {
        let code = generate_code(Some(500));
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let codes: HashSet<_> = (0..1000).map(|_| generate_code(Some(12))).collect();
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_generate_code_concurrent_threads_not_correlated() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| generate_code(Some(16))))
            .collect();

        let codes: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(codes.len(), 8);
    }

    #[test]
    fn test_validate_accepts_short_custom_code() {
        assert!(validate_custom_code("promo").is_ok());
    }

    #[test]
    fn test_validate_accepts_punctuation_from_alphabet() {
        assert!(validate_custom_code("my-link_2024!").is_ok());
    }

    #[test]
    fn test_validate_maximum_length() {
        let code = "a".repeat(MAX_CUSTOM_CODE_LENGTH);
        assert!(validate_custom_code(&code).is_ok());
    }

    #[test]
    fn test_validate_too_long() {
        let code = "a".repeat(MAX_CUSTOM_CODE_LENGTH + 1);
        let err = validate_custom_code(&code).unwrap_err();
        assert!(err.to_string().contains("1-50 characters"));
    }

    #[test]
    fn test_validate_empty_string() {
        assert!(matches!(
            validate_custom_code(""),
            Err(LinkError::InvalidCustomCode(_))
        ));
    }

    #[test]
    fn test_validate_rejects_slash_and_space() {
        assert!(validate_custom_code("a/b").is_err());
        assert!(validate_custom_code("my code").is_err());
    }

    #[test]
    fn test_validate_rejects_non_ascii() {
        let err = validate_custom_code("ссылка").unwrap_err();
        assert!(matches!(err, LinkError::InvalidCustomCode(_)));
    }
}
