//! Recovery key generation.
//!
//! A recovery key is a second, independent unlock secret meant to be written
//! down and stored physically. It is 20 symbols from a 32-symbol alphabet
//! (100 bits of entropy), printed as `XXXXX-XXXXX-XXXXX-XXXXX`.
//!
//! Generate one per vault. A replacement key is only safe once every wrapped
//! DEK has been re-wrapped under it; until then data sealed for the old key
//! would be orphaned.

use rand::Rng;

/// Symbols a recovery key is drawn from. No `I`, `O`, `0` or `1`.
pub const RECOVERY_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of alphabet symbols in a recovery key.
pub const RECOVERY_KEY_SYMBOLS: usize = 20;

/// Symbols per hyphen-separated group.
pub const RECOVERY_GROUP_SIZE: usize = 5;

/// Length of the printed key, separators included.
pub const RECOVERY_KEY_LEN: usize =
    RECOVERY_KEY_SYMBOLS + RECOVERY_KEY_SYMBOLS / RECOVERY_GROUP_SIZE - 1;

/// Generates a fresh recovery key from the thread CSPRNG.
pub fn generate_recovery_key() -> String {
    let mut rng = rand::rng();
    let mut key = String::with_capacity(RECOVERY_KEY_LEN);
    for i in 0..RECOVERY_KEY_SYMBOLS {
        if i > 0 && i % RECOVERY_GROUP_SIZE == 0 {
            key.push('-');
        }
        let idx = rng.random_range(0..RECOVERY_ALPHABET.len());
        key.push(char::from(RECOVERY_ALPHABET[idx]));
    }
    key
}

/// Whether `candidate` has the exact shape of a generated recovery key.
///
/// Advisory only: unlocking never requires a well-formed key, any string is
/// tried against both wrapped keys.
pub fn is_well_formed_recovery_key(candidate: &str) -> bool {
    candidate.len() == RECOVERY_KEY_LEN
        && candidate
            .split('-')
            .all(|group| {
                group.len() == RECOVERY_GROUP_SIZE
                    && group.bytes().all(|b| RECOVERY_ALPHABET.contains(&b))
            })
        && candidate.split('-').count() == RECOVERY_KEY_SYMBOLS / RECOVERY_GROUP_SIZE
}
