use crate::{salsa::salsa20_8, vstore::VStore};
use crypto_common::erase::Erase;

/// RFC 7914 scryptROMix over one 128·r-byte stripe, with the V array held
/// sparsely.
///
/// Phase one runs all N BlockMix steps but only stores every
/// `sparse_factor`-th intermediate. Phase two rebuilds the V block a lookup
/// lands on from the nearest stored ancestor, paying `j mod sparse_factor`
/// extra BlockMix applications instead of the memory. Output is bit-exact
/// with a fully materialized V for every sparse factor.
///
/// Progress: 0 on entry, 5 after the fill phase, then linear to 100 across
/// the mix loop.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn ro_mix<const STACK: usize>(
    b: &mut [u8],
    v: &mut VStore<'_, STACK>,
    t: &mut [u8],
    rebuilt: &mut [u8],
    n: usize,
    mut progress: Option<&mut dyn FnMut(u8)>,
) {
    crate::report(&mut progress, 0);
    let s = v.sparse_factor();

    for i in 0..n {
        if i % s == 0 {
            v.stored_mut(i / s).copy_from_slice(b);
        }
        block_mix(b, t);
        b.copy_from_slice(t);
    }
    crate::report(&mut progress, 5);

    for i in 0..n {
        let j = integerify(b) & (n - 1);
        let anchor = v.anchor(j);
        rebuilt.copy_from_slice(v.stored(anchor / s));
        for _ in anchor..j {
            block_mix(rebuilt, t);
            rebuilt.copy_from_slice(t);
        }
        xor(b, rebuilt, t);
        block_mix(t, b);
        crate::report(&mut progress, (5 + i * 95 / n) as u8);
    }
}

/// First 32-bit little-endian word of the last 64-byte chunk.
fn integerify(x: &[u8]) -> usize {
    let word = u32::from_le_bytes(x[x.len() - 64..x.len() - 60].try_into().expect("chunk length"));
    word as usize
}

/// scryptBlockMix: X starts as the last 64-byte chunk; each step folds in
/// the next input chunk, runs Salsa20/8, and lands in the even/odd
/// shuffled output position.
fn block_mix(input: &[u8], output: &mut [u8]) {
    let mut x = [0u8; 64];
    x.copy_from_slice(&input[input.len() - 64..]);
    for (i, chunk) in input.chunks_exact(64).enumerate() {
        for (x_b, &c_b) in x.iter_mut().zip(chunk.iter()) {
            *x_b ^= c_b;
        }
        salsa20_8(&mut x);
        let pos = if i % 2 == 0 {
            (i / 2) * 64
        } else {
            (i / 2) * 64 + input.len() / 2
        };
        output[pos..pos + 64].copy_from_slice(&x);
    }
    x.erase();
}

fn xor(x: &[u8], y: &[u8], output: &mut [u8]) {
    for ((out, &x_b), &y_b) in output.iter_mut().zip(x.iter()).zip(y.iter()) {
        *out = x_b ^ y_b;
    }
}
