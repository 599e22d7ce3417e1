//! Random password generator.
//!
//! Every password contains at least one upper-case letter, one lower-case
//! letter, one digit and one special character; the rest are drawn from
//! the union of the four sets and the whole string is shuffled.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use zeroize::Zeroizing;

use crate::crypto::secure::SecretString;
use crate::errors::{PassNoteError, Result};

const UPPER: &[u8] = b"QWERTYUIOPASDFGHJKLZXCVBNM";
const LOWER: &[u8] = b"qwertyuiopasdfghjklzxcvbnm";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"~!@#$%^&*()_+-={}[];:,./<>?";

const CLASSES: [&[u8]; 4] = [UPPER, LOWER, DIGITS, SPECIAL];

/// Shortest password ever generated.
pub const MIN_PASSWORD_LEN: usize = 10;

/// Longest password ever generated.
pub const MAX_PASSWORD_LEN: usize = 27;

/// Generate a random password of 10 to `min(27, max_len)` characters.
pub fn generate_password(max_len: usize) -> Result<SecretString> {
    if max_len < MIN_PASSWORD_LEN {
        return Err(PassNoteError::InvalidOperation(format!(
            "password length limit must be at least {MIN_PASSWORD_LEN}"
        )));
    }

    let mut rng =
        StdRng::try_from_os_rng().map_err(|e| PassNoteError::RandomSourceFailed(e.to_string()))?;

    let length = rng.random_range(MIN_PASSWORD_LEN..=max_len.min(MAX_PASSWORD_LEN));
    let mut chars = Zeroizing::new(Vec::with_capacity(length));

    for class in CLASSES {
        chars.push(class[rng.random_range(0..class.len())]);
    }

    let total: usize = CLASSES.iter().map(|class| class.len()).sum();
    while chars.len() < length {
        chars.push(pick_from_all(rng.random_range(0..total)));
    }

    chars.shuffle(&mut rng);

    Ok(Zeroizing::new(chars.iter().map(|&b| char::from(b)).collect()))
}

fn pick_from_all(mut index: usize) -> u8 {
    for class in CLASSES {
        if index < class.len() {
            return class[index];
        }
        index -= class.len();
    }
    SPECIAL[SPECIAL.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_each_class(password: &str) -> bool {
        CLASSES
            .iter()
            .all(|class| password.bytes().any(|b| class.contains(&b)))
    }

    #[test]
    fn generated_passwords_meet_policy() {
        for _ in 0..200 {
            let pw = generate_password(64).unwrap();
            assert!((MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&pw.len()));
            assert!(!pw.contains('\0'));
            assert!(has_each_class(&pw), "missing class in {}", pw.as_str());
        }
    }

    #[test]
    fn respects_smaller_limit() {
        for _ in 0..50 {
            let pw = generate_password(12).unwrap();
            assert!(pw.len() >= MIN_PASSWORD_LEN && pw.len() <= 12);
        }
    }

    #[test]
    fn limit_below_minimum_fails() {
        assert!(generate_password(9).is_err());
    }

    #[test]
    fn pick_from_all_covers_every_set() {
        assert_eq!(pick_from_all(0), b'Q');
        assert_eq!(pick_from_all(UPPER.len()), b'q');
        assert_eq!(pick_from_all(UPPER.len() + LOWER.len()), b'0');
        assert_eq!(
            pick_from_all(UPPER.len() + LOWER.len() + DIGITS.len()),
            b'~'
        );
    }
}
