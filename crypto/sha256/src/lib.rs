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

use core::fmt::Debug;
use crypto_common::{
    blocks::{Block as Block_, Buffer as Buffer_},
    erase::Erase,
};

pub const BLOCK_SIZE: usize = 64;
pub const HASH_SIZE: usize = 32;

type Block = Block_<BLOCK_SIZE>;
type Buffer = Buffer_<BLOCK_SIZE>;

mod consts;
mod soft;
use soft::compress;

/// FIPS 180-2 SHA-256 over whole 64-byte blocks. Sub-block input is
/// buffered by the caller (see [`crypto_common::blocks::Buffer`]) so that
/// the digest is independent of chunk boundaries.
///
/// The processed-block count is a `u64`, so a single message is bounded at
/// 2^70 bits rather than the 4 GiB a 32-bit byte counter would allow.
#[allow(missing_copy_implementations)]
#[derive(Clone)]
pub struct Sha256 {
    state: [u32; 8],
    blocks: u64,
}

impl Default for Sha256 {
    fn default() -> Self {
        Self {
            state: consts::H,
            blocks: 0,
        }
    }
}

impl Sha256 {
    #[inline]
    pub fn update_block(&mut self, block: &Block) {
        self.blocks += 1;
        compress(&mut self.state, block);
    }

    /// Pads out whatever sits in `buffer`, runs the final compression, and
    /// writes the big-endian digest. The hasher is spent afterwards; start
    /// a new digest from `Sha256::default()`.
    #[inline]
    pub fn finalize(&mut self, buffer: &mut Buffer, out: &mut [u8; HASH_SIZE]) {
        let bit_len = 8 * (buffer.get_pos() as u64 + self.blocks * BLOCK_SIZE as u64);
        buffer.len64_padding_be(bit_len, |b| compress(&mut self.state, b));
        for (chunk, v) in out.chunks_exact_mut(4).zip(self.state.iter()) {
            chunk.copy_from_slice(&v.to_be_bytes());
        }
    }

    /// One-shot digest of a byte slice.
    #[inline]
    #[must_use]
    pub fn digest(data: &[u8]) -> [u8; HASH_SIZE] {
        let mut hasher = Self::default();
        let mut buffer = Buffer::default();
        buffer.digest_blocks(data, |b| hasher.update_block(b));
        let mut out = [0; HASH_SIZE];
        hasher.finalize(&mut buffer, &mut out);
        out
    }
}

impl Erase for Sha256 {
    fn erase(&mut self) {
        self.state.erase();
        self.blocks.erase();
    }
}

impl Debug for Sha256 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Sha256 { ... }")
    }
}

#[cfg(test)]
#[allow(clippy::cast_possible_truncation)]
mod tests {
    extern crate std;
    use super::*;
    use std::{string::String, vec, vec::Vec};

    fn hex(digest: &[u8]) -> String {
        digest.iter().map(|b| std::format!("{b:02x}")).collect()
    }

    // FIPS 180-2 appendix B plus the empty string.
    #[test]
    fn fips_vectors() {
        assert_eq!(
            hex(&Sha256::digest(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hex(&Sha256::digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hex(&Sha256::digest(
                b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq"
            )),
            "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1"
        );
        let million = vec![b'a'; 1_000_000];
        assert_eq!(
            hex(&Sha256::digest(&million)),
            "cdc76e5c9914fb9281a1c7e284d73e67f1809a48a497200e046d39ccc7112cd0"
        );
    }

    #[test]
    fn chunking_does_not_matter() {
        let data: Vec<u8> = (0u16..1000).map(|i| (i % 251) as u8).collect();
        let expected = Sha256::digest(&data);
        for chunk_len in [1, 3, 63, 64, 65, 127, 999] {
            let mut hasher = Sha256::default();
            let mut buffer = crypto_common::blocks::Buffer::default();
            for chunk in data.chunks(chunk_len) {
                buffer.digest_blocks(chunk, |b| hasher.update_block(b));
            }
            let mut out = [0; HASH_SIZE];
            hasher.finalize(&mut buffer, &mut out);
            assert_eq!(out, expected, "chunk_len={chunk_len}");
        }
    }
}
