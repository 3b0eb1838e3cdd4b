use rand::{Rng, distributions::Alphanumeric, thread_rng};
use uuid::Uuid;

/// Generates a globally unique API key.
///
/// Keys are random (v4) UUIDs in their hyphenated text form. Uniqueness across owners is
/// additionally enforced by the `credentials_api_key_key` unique constraint.
///
/// # Examples
///
/// ```
/// use tana_api::crypto::generate_api_key;
///
/// let api_key = generate_api_key();
/// assert_eq!(api_key.len(), 36);
/// ```
pub fn generate_api_key() -> String {
    Uuid::new_v4().to_string()
}

/// Generates an API secret of `length` alphanumeric characters from the thread-local CSPRNG.
///
/// With the default length of 50 this is roughly 297 bits of entropy.
pub fn generate_api_secret(length: usize) -> String {
    thread_rng().sample_iter(&Alphanumeric).take(length).map(char::from).collect()
}
