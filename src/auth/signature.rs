//! Request body signatures
//!
//! A signature is the lowercase hex SHA-1 of the raw request body. It is a
//! plain digest, not a keyed MAC: it catches corrupted bodies, nothing more.

use sha1::{Digest, Sha1};

/// Hex-encoded SHA-1 of `body`.
pub fn digest(body: &[u8]) -> String {
    hex::encode(Sha1::digest(body))
}

/// Checks a caller-supplied signature against the body.
///
/// - signature present: exact, case-sensitive match against [`digest`]
/// - absent and `required`: rejected
/// - absent and not `required`: accepted
pub fn is_valid_signature(body: &[u8], supplied: Option<&str>, required: bool) -> bool {
    match supplied {
        Some(signature) => digest(body) == signature,
        None => !required,
    }
}
