#![no_std]
#![deny(
    dead_code,
    deprecated,
    future_incompatible,
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::inline_always)]

use crypto_common::{
    blocks::{Block, Buffer},
    erase::{Erase, EraseOnDrop},
};
use sha256::{Sha256, BLOCK_SIZE, HASH_SIZE};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// The two hash cores primed with the padded key. Cloning one replays the
/// key schedule without touching the key bytes again, which is what makes
/// reuse across PBKDF2 blocks cheap.
#[derive(Clone)]
struct Core {
    digest: Sha256,
    opad_digest: Sha256,
}

impl Core {
    #[inline(always)]
    fn new_from_slice(key: &[u8]) -> Self {
        let mut buf = padded_key(key);
        for b in &mut buf {
            *b ^= IPAD;
        }
        let mut digest = Sha256::default();
        digest.update_block(&buf);
        for b in &mut buf {
            *b ^= IPAD ^ OPAD;
        }
        let mut opad_digest = Sha256::default();
        opad_digest.update_block(&buf);
        buf.erase();
        Self {
            digest,
            opad_digest,
        }
    }

    #[inline(always)]
    fn finalize(&mut self, buffer: &mut Buffer<BLOCK_SIZE>, out: &mut [u8; HASH_SIZE]) {
        let mut inner = [0; HASH_SIZE];
        self.digest.finalize(buffer, &mut inner);
        buffer.reset();
        let outer = &mut self.opad_digest;
        buffer.digest_blocks(&inner, |b| outer.update_block(b));
        outer.finalize(buffer, out);
        inner.erase();
    }
}

impl Erase for Core {
    fn erase(&mut self) {
        self.digest.erase();
        self.opad_digest.erase();
    }
}

/// HMAC-SHA-256 (RFC 2104). Accepts keys of any length; keys longer than
/// the 64-byte block are hashed down first. Key-derived state is erased
/// when the instance is dropped.
#[derive(Clone)]
pub struct Hmac {
    core: Core,
    buffer: Buffer<BLOCK_SIZE>,
}

impl core::fmt::Debug for Hmac {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Hmac { ... }")
    }
}

impl Hmac {
    #[inline]
    #[must_use]
    pub fn new_from_slice(key: &[u8]) -> Self {
        Self {
            core: Core::new_from_slice(key),
            buffer: Buffer::default(),
        }
    }

    #[inline]
    pub fn update(&mut self, input: &[u8]) {
        let Self { core, buffer } = self;
        buffer.digest_blocks(input, |b| core.digest.update_block(b));
    }

    #[inline]
    #[must_use]
    pub fn finalize_fixed(mut self) -> [u8; HASH_SIZE] {
        let mut out = [0; HASH_SIZE];
        let Self { core, buffer } = &mut self;
        core.finalize(buffer, &mut out);
        out
    }

    /// One-shot tag over a single message.
    #[inline]
    #[must_use]
    pub fn tag(key: &[u8], message: &[u8]) -> [u8; HASH_SIZE] {
        let mut mac = Self::new_from_slice(key);
        mac.update(message);
        mac.finalize_fixed()
    }
}

impl Drop for Hmac {
    fn drop(&mut self) {
        self.core.erase();
        self.buffer.erase();
    }
}

impl EraseOnDrop for Hmac {}

fn padded_key(key: &[u8]) -> Block<BLOCK_SIZE> {
    let mut padded = [0; BLOCK_SIZE];
    if key.len() <= BLOCK_SIZE {
        padded[..key.len()].copy_from_slice(key);
    } else {
        padded[..HASH_SIZE].copy_from_slice(&Sha256::digest(key));
    }
    padded
}

#[cfg(test)]
#[allow(clippy::cast_possible_truncation)]
mod tests {
    extern crate std;
    use super::*;
    use std::{string::String, vec, vec::Vec};

    fn hex(tag: &[u8]) -> String {
        tag.iter().map(|b| std::format!("{b:02x}")).collect()
    }

    #[test]
    fn empty_key_and_message() {
        assert_eq!(
            hex(&Hmac::tag(b"", b"")),
            "b613679a0814d9ec772f95d778c35fc5ff1697c493715653c6c712144292c5ad"
        );
    }

    #[test]
    fn quick_brown_fox() {
        assert_eq!(
            hex(&Hmac::tag(
                b"key",
                b"The quick brown fox jumps over the lazy dog"
            )),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    // RFC 4231 section 4.
    #[test]
    fn rfc4231() {
        assert_eq!(
            hex(&Hmac::tag(&[0x0b; 20], b"Hi There")),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
        assert_eq!(
            hex(&Hmac::tag(b"Jefe", b"what do ya want for nothing?")),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
        assert_eq!(
            hex(&Hmac::tag(&[0xaa; 20], &[0xdd; 50])),
            "773ea91e36800e46854db8ebd09181a72959098b3ef8c122d9635514ced565fe"
        );
        let key: Vec<u8> = (1..=25).collect();
        assert_eq!(
            hex(&Hmac::tag(&key, &[0xcd; 50])),
            "82558a389a443c0ea4cc819899f2083a85f0faa3e578f8077a2e3ff46729665b"
        );
        // truncated-output case: compare the first 128 bits only
        assert!(hex(&Hmac::tag(&[0x0c; 20], b"Test With Truncation"))
            .starts_with("a3b6167473100ee06e0c796c2955552b"));
        assert_eq!(
            hex(&Hmac::tag(
                &[0xaa; 131],
                b"Test Using Larger Than Block-Size Key - Hash Key First"
            )),
            "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
        );
        assert_eq!(
            hex(&Hmac::tag(
                &[0xaa; 131],
                b"This is a test using a larger than block-size key and a larger than \
                  block-size data. The key needs to be hashed before being used by the \
                  HMAC algorithm."
            )),
            "9b09ffa71b942fcb27635fbcd5b0e944bfdc63644f0713938a7f51535c3a35e2"
        );
    }

    #[test]
    fn long_keys_reduce_to_their_digest() {
        let key = vec![0x7e; 200];
        let reduced = Sha256::digest(&key);
        assert_eq!(Hmac::tag(&key, b"message"), Hmac::tag(&reduced, b"message"));
    }

    // 63/64/65-byte keys straddle the block-size boundary.
    #[test]
    fn key_length_boundary() {
        let tags: Vec<_> = [63usize, 64, 65]
            .into_iter()
            .map(|len| Hmac::tag(&vec![0x42; len], b"boundary"))
            .collect();
        assert_ne!(tags[0], tags[1]);
        assert_ne!(tags[1], tags[2]);
        // at 65 bytes the key is first reduced to its digest
        assert_eq!(
            tags[2],
            Hmac::tag(&Sha256::digest(&[0x42; 65]), b"boundary")
        );
    }

    #[test]
    fn chunking_does_not_matter() {
        let message: Vec<u8> = (0u16..300).map(|i| (i % 256) as u8).collect();
        let expected = Hmac::tag(b"chunky", &message);
        for chunk_len in [1, 7, 64, 65] {
            let mut mac = Hmac::new_from_slice(b"chunky");
            for chunk in message.chunks(chunk_len) {
                mac.update(chunk);
            }
            assert_eq!(mac.finalize_fixed(), expected, "chunk_len={chunk_len}");
        }
    }
}
