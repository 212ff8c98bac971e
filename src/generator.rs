//! Random short code generation.

use rand::distr::{Alphanumeric, SampleString};
use tracing::warn;

use crate::error::{ShortenerError, ShortenerResult};
use crate::storage::Storage;
use crate::validation::ShortCode;

/// Length of generated codes. 62^6 keeps collisions rare at this scale.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Draws allowed per call to [`generate_unique_code`].
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Draw a random `[A-Za-z0-9]` code from the thread-local CSPRNG.
///
/// Generated codes double as access tokens for their target, so they must
/// not be guessable from earlier ones.
pub fn generate_code(length: usize) -> ShortCode {
    let code = Alphanumeric.sample_string(&mut rand::rng(), length);
    ShortCode::new_unchecked(code)
}

/// Draw codes until one is not yet in the store.
pub async fn generate_unique_code(storage: &dyn Storage) -> ShortenerResult<ShortCode> {
    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let code = generate_code(DEFAULT_CODE_LENGTH);
        if !storage.exists(code.as_str()).await? {
            return Ok(code);
        }
        warn!(short_code = %code, attempt, "generated short_url collided, retrying");
    }

    Err(ShortenerError::CodeSpaceExhausted(MAX_GENERATION_ATTEMPTS))
}
