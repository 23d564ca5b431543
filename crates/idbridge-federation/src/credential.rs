//! Initial-credential generation.
//!
//! The directory is the authority for authentication; the local
//! credential set at account creation exists only because the store
//! requires one. It must be unguessable and is never used to log in.

use rand::distr::{Alphanumeric, SampleString};

/// Length of generated initial credentials.
///
/// 32 alphanumeric characters give roughly 190 bits of entropy
/// (log2(62^32)), well past the point of guessability.
const CREDENTIAL_LEN: usize = 32;

/// Generates a random initial credential for a new account.
///
/// Uses the thread-local random number generator, which is
/// cryptographically secure by default.
#[must_use]
pub fn initial_credential() -> String {
    let mut rng = rand::rng();
    Alphanumeric.sample_string(&mut rng, CREDENTIAL_LEN)
}
