//! Default hashing for [`ChainedHashSet`](super::ChainedHashSet).
//!
//! The mixing follows `rustc-hash` (https://github.com/rust-lang/rustc-hash),
//! licensed under the MIT License. Copyright © the Rust Project Developers.
//!
//! Records fed to the benchmark are trusted input, so there is no need to
//! pay for DoS resistance here.

/// Multiplier used to fold every word into the running state.
///
/// Reference: [https://github.com/rust-lang/rustc-hash/blob/1a998d5b89b04ba730d4cd249f811e8b48aa7d8c/src/lib.rs#L63C1-L73C37]
const K: u64 = 0xf1357aea2e62a9c5;

const SEEDS: [u64; 2] = [0x243f6a8885a308d3, 0x13198a2e03707344];

const PREVENT_TRIVIAL_ZERO_COLLAPSE: u64 = 0xa4093822299f31d0;

/// Word-at-a-time multiplicative hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hasher {
    state: u64,
}

/// Stateless builder, so two tables always agree on where a value goes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BuildHasher;

impl Hasher {
    #[inline]
    pub const fn new() -> Self {
        Self { state: 0 }
    }

    #[inline]
    fn fold(&mut self, word: u64) {
        self.state = self.state.wrapping_add(word).wrapping_mul(K);
    }
}

/// Hashes a byte slice down to a single word before it is folded.
#[inline]
fn compress(bytes: &[u8]) -> u64 {
    let [mut s0, mut s1] = SEEDS;
    let len = bytes.len();

    match len {
        0 => {}
        1..=3 => {
            s0 ^= bytes[0] as u64;
            s1 ^= ((bytes[len - 1] as u64) << 8) | bytes[len / 2] as u64;
        }
        4..=7 => {
            s0 ^= read_u32(&bytes[..4]) as u64;
            s1 ^= read_u32(&bytes[len - 4..]) as u64;
        }
        8..=16 => {
            s0 ^= read_u64(&bytes[..8]);
            s1 ^= read_u64(&bytes[len - 8..]);
        }
        _ => {
            let mut chunks = bytes[..len - 16].chunks_exact(16);
            for chunk in chunks.by_ref() {
                let t = multiply(
                    s0 ^ read_u64(&chunk[..8]),
                    PREVENT_TRIVIAL_ZERO_COLLAPSE ^ read_u64(&chunk[8..]),
                );
                s0 = s1;
                s1 = t;
            }

            let tail = &bytes[len - 16..];
            s0 ^= read_u64(&tail[..8]);
            s1 ^= read_u64(&tail[8..]);
        }
    }

    multiply(s0, s1) ^ (len as u64)
}

#[inline]
fn read_u64(bytes: &[u8]) -> u64 {
    let mut word = [0; 8];
    word.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(word)
}

#[inline]
fn read_u32(bytes: &[u8]) -> u32 {
    let mut word = [0; 4];
    word.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(word)
}

/// Folded 128-bit multiplication.
#[inline]
fn multiply(x: u64, y: u64) -> u64 {
    let full = (x as u128).wrapping_mul(y as u128);
    (full as u64) ^ ((full >> 64) as u64)
}

impl std::hash::Hasher for Hasher {
    fn write(&mut self, bytes: &[u8]) {
        self.fold(compress(bytes));
    }

    #[inline]
    fn finish(&self) -> u64 {
        // the multiply pushes entropy to the high bits, while `mod capacity`
        // only looks at the low ones.
        const ROTATE: u32 = 26;

        self.state.rotate_left(ROTATE)
    }

    fn write_u8(&mut self, word: u8) {
        self.fold(word as u64);
    }

    fn write_u16(&mut self, word: u16) {
        self.fold(word as u64);
    }

    fn write_u32(&mut self, word: u32) {
        self.fold(word as u64);
    }

    fn write_u64(&mut self, word: u64) {
        self.fold(word);
    }

    fn write_u128(&mut self, word: u128) {
        self.fold(word as u64);
        self.fold((word >> 64) as u64);
    }

    fn write_usize(&mut self, word: usize) {
        self.fold(word as u64);
    }
}

impl std::hash::BuildHasher for BuildHasher {
    type Hasher = Hasher;

    fn build_hasher(&self) -> Self::Hasher {
        Hasher::new()
    }
}
