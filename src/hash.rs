//! String hash functions.
//!
//! Any `Fn(&str) -> u32` can hash keys; [`Fast`] and [`Good`] are the
//! built-in choices.

/// Maps a key to a 32-bit hash. The bucket is `hash % size`.
pub trait StrHash {
    fn hash_str(&self, key: &str) -> u32;
}

impl<F> StrHash for F
where
    F: Fn(&str) -> u32,
{
    #[inline]
    fn hash_str(&self, key: &str) -> u32 {
        self(key)
    }
}

/// Cheap multiplicative hash, see [`hash_str_fast`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Fast;

/// Slower hash with better spread on adversarial key sets, see
/// [`hash_str_good`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Good;

impl StrHash for Fast {
    #[inline]
    fn hash_str(&self, key: &str) -> u32 {
        hash_str_fast(key)
    }
}

impl StrHash for Good {
    #[inline]
    fn hash_str(&self, key: &str) -> u32 {
        hash_str_good(key)
    }
}

/// `val = val * 9 + byte` over the key's bytes, wrapping at 32 bits.
///
/// Bytes are added as unsigned values. C code that hashes through a signed
/// `char` sign-extends bytes of 0x80 and above, so non-ASCII keys hash
/// differently there; ASCII keys agree.
pub fn hash_str_fast(key: &str) -> u32 {
    key.bytes()
        .fold(0u32, |val, c| (val << 3).wrapping_add(val).wrapping_add(u32::from(c)))
}

const SEED_MAX: u32 = 2_147_483_646;
const RAND_A: i64 = 16_807;
const RAND_M: i64 = 2_147_483_647;
const RAND_Q: i64 = 127_773; // m / a
const RAND_R: i64 = 2_836; // m % a

/// The first 4-byte word seeds one step of the Park-Miller minimal standard
/// generator; every following word is XORed into the result.
pub fn hash_str_good(key: &str) -> u32 {
    let mut words = key.as_bytes().chunks(4).map(pack_word);

    let mut seed = words.next().unwrap_or(0);
    if seed > SEED_MAX {
        seed -= SEED_MAX;
    }
    let val = park_miller(seed);

    words.fold(val, |val, w| val ^ w)
}

/// First byte ends up most significant; a short final chunk is zero-padded.
fn pack_word(chunk: &[u8]) -> u32 {
    let mut w = [0u8; 4];
    w[..chunk.len()].copy_from_slice(chunk);
    u32::from_be_bytes(w)
}

/// One Schrage-decomposed step of `seed * 16807 mod (2^31 - 1)`.
fn park_miller(seed: u32) -> u32 {
    let seed = i64::from(seed);
    let hi = seed / RAND_Q;
    let lo = seed - hi * RAND_Q;
    let mut t = RAND_A * lo - RAND_R * hi;
    if t <= 0 {
        t += RAND_M;
    }
    t as u32
}
