#![deny(
    dead_code,
    deprecated,
    future_incompatible,
    missing_copy_implementations,
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
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::inline_always
)]

use crypto_common::erase::Erase;

mod params;
pub mod pbkdf2;
mod romix;
mod salsa;
mod vstore;

pub use params::Params;
pub use vstore::Memory;
use vstore::VStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    InvalidParams,
    InvalidOutputLength,
    /// The memory budget cannot hold even one V block.
    NoStorage,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidParams => f.write_str("invalid scrypt parameters"),
            Self::InvalidOutputLength => f.write_str("invalid scrypt output length"),
            Self::NoStorage => f.write_str("memory budget too small for a single block"),
        }
    }
}

impl std::error::Error for Error {}

/// Derive `output.len()` bytes with a fully materialized V array and no
/// progress reporting. The common path.
pub fn scrypt(
    password: &[u8],
    salt: &[u8],
    params: &Params,
    output: &mut [u8],
) -> Result<(), Error> {
    scrypt_with(password, salt, params, Memory::full(), None, output)
}

/// Derive `output.len()` bytes under an explicit memory budget, reporting
/// progress in percent.
///
/// The three phases are RFC 7914's: PBKDF2 expansion of the passphrase into
/// p stripes, an independent ROMix pass over each stripe (each weighted as
/// 1/p of the reported progress), and a final PBKDF2 over the mixed
/// stripes. Reports 0 first and 100 last; percentages never decrease. All
/// intermediate key material is erased before return.
pub fn scrypt_with<const STACK: usize>(
    password: &[u8],
    salt: &[u8],
    params: &Params,
    memory: Memory<'_, STACK>,
    mut progress: Option<&mut dyn FnMut(u8)>,
    output: &mut [u8],
) -> Result<(), Error> {
    if output.is_empty() || output.len() / 32 > 0xffff_ffff {
        return Err(Error::InvalidOutputLength);
    }
    report(&mut progress, 0);
    let n = params.n();
    let block_len = params.block_len();
    let p = params.p as usize;

    // claim storage before any key material is expanded
    let mut v = VStore::new(n, block_len, memory)?;
    let mut stripes = vec![0; p * block_len];
    pbkdf2::pbkdf2(password, salt, 1, &mut stripes);

    let mut t = vec![0; block_len];
    let mut rebuilt = vec![0; block_len];
    for (i, stripe) in stripes.chunks_mut(block_len).enumerate() {
        match progress.as_mut() {
            Some(cb) => {
                #[allow(clippy::cast_possible_truncation)]
                let mut scaled = |pct: u8| cb((i * 100 / p + pct as usize / p) as u8);
                romix::ro_mix(stripe, &mut v, &mut t, &mut rebuilt, n, Some(&mut scaled));
            }
            None => romix::ro_mix(stripe, &mut v, &mut t, &mut rebuilt, n, None),
        }
    }

    pbkdf2::pbkdf2(password, &stripes, 1, output);

    stripes.as_mut_slice().erase();
    t.as_mut_slice().erase();
    rebuilt.as_mut_slice().erase();
    report(&mut progress, 100);
    Ok(())
}

#[inline(always)]
pub(crate) fn report(progress: &mut Option<&mut dyn FnMut(u8)>, pct: u8) {
    if let Some(cb) = progress.as_mut() {
        cb(pct);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    // RFC 7914 section 12.
    #[test]
    fn rfc7914_minimal() {
        let mut out = [0; 64];
        scrypt(b"", b"", &Params::new(4, 1, 1).unwrap(), &mut out).unwrap();
        assert_eq!(
            hex(&out),
            "77d6576238657b203b19ca42c18a0497f16b4844e3074ae8dfdffa3fede21442\
             fcd0069ded0948f8326a753a0fc81f17e8d3e0fb2e0d3628cf35e20c38d18906"
        );
    }

    #[test]
    fn small_n_wide_r() {
        let mut out = [0; 64];
        scrypt(b"", b"", &Params::new(4, 8, 2).unwrap(), &mut out).unwrap();
        assert_eq!(
            hex(&out),
            "8d12c62f0dab079dcb95b698a5012d79cf25ae9f6a2e2990f797ea92bcb907a6\
             56f1d3c886b0f1c725e42adcc54713fb514d2e070ea3070a4cfcd6c877a364b8"
        );
    }

    // The password-hardening parameters: N=32768, r=8, p=2.
    #[test]
    fn hardening_parameters() {
        let mut out = [0; 64];
        scrypt(b"", b"", &Params::new(15, 8, 2).unwrap(), &mut out).unwrap();
        assert_eq!(
            hex(&out),
            "dbf4a1bef9c302095a55b12c6901c42187774dd8d51f1444a43244710cd12790\
             5db9afdded6e233b2afbddd5003d383538d23cbf997325e21068977fc6d740f5"
        );
    }

    // The property the whole sparse design rests on: every budget yields
    // the same key as full storage.
    #[test]
    fn sparse_budgets_agree_with_full_storage() {
        let params = Params::new(6, 1, 2).unwrap(); // N=64, block 128 bytes
        let mut dense = [0; 64];
        scrypt(b"pleaseletmein", b"SodiumChloride", &params, &mut dense).unwrap();
        for blocks in [1usize, 2, 3, 5, 7, 16, 63, 64, 200] {
            let mut sparse = [0; 64];
            scrypt_with(
                b"pleaseletmein",
                b"SodiumChloride",
                &params,
                Memory::heap_capped(blocks * 128),
                None,
                &mut sparse,
            )
            .unwrap();
            assert_eq!(sparse, dense, "budget of {blocks} blocks diverged");
        }
    }

    #[test]
    fn sparse_rounding_up_path() {
        // N=16, 3-block budget: 16 % 3 != 0 exercises the factor bump
        let params = Params::new(4, 1, 1).unwrap();
        let mut dense = [0; 32];
        scrypt(b"x", b"y", &params, &mut dense).unwrap();
        let mut sparse = [0; 32];
        scrypt_with(
            b"x",
            b"y",
            &params,
            Memory::heap_capped(3 * 128),
            None,
            &mut sparse,
        )
        .unwrap();
        assert_eq!(sparse, dense);
    }

    #[test]
    fn three_region_budget_agrees() {
        let params = Params::new(5, 1, 1).unwrap(); // N=32
        let mut dense = [0; 64];
        scrypt(b"split", b"regions", &params, &mut dense).unwrap();
        let mut external = vec![0u8; 3 * 128];
        let mut sparse = [0; 64];
        scrypt_with(
            b"split",
            b"regions",
            &params,
            Memory::<256>::stacked()
                .with_heap(2 * 128)
                .with_external(&mut external),
            None,
            &mut sparse,
        )
        .unwrap();
        assert_eq!(sparse, dense);
        assert!(external.iter().all(|&b| b == 0), "external region not erased");
    }

    #[test]
    fn zero_budget_is_rejected() {
        let params = Params::new(4, 1, 1).unwrap();
        let mut out = [0; 32];
        assert_eq!(
            scrypt_with(b"", b"", &params, Memory::heap_capped(0), None, &mut out),
            Err(Error::NoStorage)
        );
    }

    #[test]
    fn empty_output_is_rejected() {
        let params = Params::new(4, 1, 1).unwrap();
        assert_eq!(
            scrypt(b"", b"", &params, &mut []),
            Err(Error::InvalidOutputLength)
        );
    }

    #[test]
    fn progress_is_monotone_and_complete() {
        let params = Params::new(4, 1, 2).unwrap();
        let mut seen = Vec::new();
        let mut out = [0; 32];
        let mut cb = |pct: u8| seen.push(pct);
        scrypt_with(b"p", b"s", &params, Memory::full(), Some(&mut cb), &mut out).unwrap();
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "{seen:?}");
    }
}
