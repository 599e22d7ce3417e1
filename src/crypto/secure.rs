//! Zero-on-drop buffers and the operating-system random source.
//!
//! Every buffer that may hold a password, derived key, packed tree or
//! decompressed plaintext is one of the types below, so its memory is
//! wiped when it goes out of scope.

use rand::rngs::OsRng;
use rand::TryRngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{PassNoteError, Result};

/// Byte buffer that is zeroed when dropped.
pub type SecretBytes = Zeroizing<Vec<u8>>;

/// String that is zeroed when dropped.
pub type SecretString = Zeroizing<String>;

/// Append-only vector that wipes every allocation it abandons.
///
/// `Vec` growth copies into a fresh allocation and frees the old one
/// without clearing it. `SecureVec` grows by hand instead: capacity
/// doubles (or jumps straight to the required size when that is larger),
/// the contents are copied over and the previous allocation is zeroed
/// before release.
pub struct SecureVec<T: Zeroize> {
    inner: Zeroizing<Vec<T>>,
}

/// Byte flavour used for packed trees.
pub type SecureBuf = SecureVec<u8>;

impl<T: Zeroize + Clone> SecureVec<T> {
    /// Create an empty buffer with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Zeroizing::new(Vec::with_capacity(capacity)),
        }
    }

    /// Append a slice, growing securely when needed.
    pub fn extend_from_slice(&mut self, items: &[T]) {
        self.reserve_secure(items.len());
        self.inner.extend_from_slice(items);
    }

    /// Append a single element.
    pub fn push(&mut self, item: T) {
        self.reserve_secure(1);
        self.inner.push(item);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.inner
    }

    /// Hand the buffer over, still wrapped so it is wiped on drop.
    pub fn into_inner(self) -> Zeroizing<Vec<T>> {
        self.inner
    }

    fn reserve_secure(&mut self, additional: usize) {
        let required = self.inner.len() + additional;
        if required <= self.inner.capacity() {
            return;
        }

        let doubled = self.inner.capacity().saturating_mul(2);
        let mut grown = Zeroizing::new(Vec::with_capacity(required.max(doubled)));
        grown.extend_from_slice(&self.inner);

        // The old allocation is zeroed when the replaced wrapper drops.
        self.inner = grown;
    }
}

/// Fill `buffer` with bytes from the operating system's CSPRNG.
pub fn random_bytes(buffer: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buffer)
        .map_err(|e| PassNoteError::RandomSourceFailed(e.to_string()))
}

/// Return `N` fresh random bytes.
pub fn random_array<const N: usize>() -> Result<[u8; N]> {
    let mut out = [0u8; N];
    random_bytes(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_vec_grows_by_doubling() {
        let mut buf = SecureBuf::with_capacity(4);
        buf.extend_from_slice(b"abcd");
        assert_eq!(buf.capacity(), 4);

        buf.push(b'e');
        assert!(buf.capacity() >= 8);
        assert_eq!(buf.as_slice(), b"abcde");
    }

    #[test]
    fn secure_vec_jumps_to_required_size() {
        let mut buf = SecureBuf::with_capacity(2);
        buf.extend_from_slice(&[7u8; 100]);
        assert!(buf.capacity() >= 100);
        assert_eq!(buf.len(), 100);
    }

    #[test]
    fn secure_vec_from_empty() {
        let mut buf: SecureVec<usize> = SecureVec::with_capacity(0);
        assert!(buf.is_empty());
        buf.push(3);
        buf.push(5);
        assert_eq!(buf.as_slice(), &[3, 5]);
    }

    #[test]
    fn random_arrays_differ() {
        let a: [u8; 32] = random_array().unwrap();
        let b: [u8; 32] = random_array().unwrap();
        assert_ne!(a, b);
    }
}
