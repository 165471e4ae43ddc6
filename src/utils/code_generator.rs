//! Short code generation and validation utilities.
//!
//! Generated codes are 6 characters drawn uniformly from `[a-z0-9]`, giving
//! 36^6 (about 2.2 billion) possible codes. Custom codes supplied by callers
//! must be 4-10 characters from the same alphabet.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::domain::errors::ValidationError;

/// Alphabet for generated and custom codes.
const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

/// Codes that would shadow a fixed route. Never generated, and refused as
/// custom codes at the HTTP boundary.
pub const RESERVED_CODES: &[&str] = &["health", "shorturls"];

/// Compiled pattern for custom codes.
pub static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]{4,10}$").expect("valid custom code pattern"));

/// Generates a random 6-character code using the thread-local RNG.
///
/// Uniqueness is not checked here; the registry retries on collision.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_code() -> String {
    generate_code_with(&mut rand::rng())
}

/// Generates a random code from the supplied RNG.
pub fn generate_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..GENERATED_CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Returns true for codes that clash with a fixed route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 4-10 characters
/// - Allowed characters: lowercase letters and digits
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCode`] if the code does not match.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_custom_code("abcd").is_ok());
/// assert!(validate_custom_code("ABCD").is_err());   // Uppercase
/// assert!(validate_custom_code("abc").is_err());    // Too short
/// ```
pub fn validate_custom_code(code: &str) -> Result<(), ValidationError> {
    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(ValidationError::InvalidCode {
            code: code.to_string(),
        });
    }

    Ok(())
}
