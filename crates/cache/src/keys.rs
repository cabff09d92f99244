//! Cache key derivation from the wrapped command line

use clicache_core::{CommandLine, KEY_SEPARATOR};
use std::ffi::{OsStr, OsString};
use std::fmt;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a hash identifying a cacheable invocation.
///
/// Rendered as its decimal numeral in cache filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(u64);

impl CacheKey {
    /// Key for `command`, optionally scoped to a working directory.
    ///
    /// The working directory, when given, is hashed as if it were an
    /// extra leading argument. Arguments are hashed as their raw bytes.
    #[must_use]
    pub fn for_command(command: &CommandLine, working_dir: Option<&OsStr>) -> Self {
        let parts = working_dir
            .into_iter()
            .chain(command.iter().map(OsString::as_os_str))
            .map(OsStr::as_encoded_bytes);
        Self::from_parts(parts)
    }

    /// Hash the parts joined with `_`.
    ///
    /// `["a_b"]` and `["a", "b"]` collide; the key only needs to be
    /// collision-resistant in practice, not injective.
    pub fn from_parts<I>(parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut hash = FNV_OFFSET_BASIS;
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                hash = fnv1a(hash, KEY_SEPARATOR.as_bytes());
            }
            hash = fnv1a(hash, part.as_ref());
        }
        Self(hash)
    }

    /// Wrap an already computed hash value
    #[must_use]
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn fnv1a(mut hash: u64, bytes: &[u8]) -> u64 {
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
