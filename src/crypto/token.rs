use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;

/// The size of a checkout session token in bytes.
const SESSION_TOKEN_SIZE: usize = 16;

/// Generates a new random checkout session token.
///
/// # Returns
///
/// A URL-safe base64-encoded token, safe to embed in a path segment.
pub fn generate_session_token() -> String {
    let mut token = [0u8; SESSION_TOKEN_SIZE];
    OsRng.fill_bytes(&mut token);

    general_purpose::URL_SAFE_NO_PAD.encode(token)
}
