use crypto_common::erase::Erase;

const STATE_WORDS: usize = 16;
const DOUBLE_ROUNDS: usize = 4; // Salsa20/8

/// Salsa20/8 core applied in place to one 64-byte block: run the rounds on
/// a working copy, then add the original words back (RFC 7914 section 3).
pub(crate) fn salsa20_8(block: &mut [u8; 64]) {
    let mut input = [0u32; STATE_WORDS];
    for (word, chunk) in input.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes(chunk.try_into().expect("chunk length"));
    }
    let mut x = input;
    for _ in 0..DOUBLE_ROUNDS {
        // column round
        quarter_round(0, 4, 8, 12, &mut x);
        quarter_round(5, 9, 13, 1, &mut x);
        quarter_round(10, 14, 2, 6, &mut x);
        quarter_round(15, 3, 7, 11, &mut x);
        // row round
        quarter_round(0, 1, 2, 3, &mut x);
        quarter_round(5, 6, 7, 4, &mut x);
        quarter_round(10, 11, 8, 9, &mut x);
        quarter_round(15, 12, 13, 14, &mut x);
    }
    for (x_w, i_w) in x.iter_mut().zip(input.iter()) {
        *x_w = x_w.wrapping_add(*i_w);
    }
    for (chunk, word) in block.chunks_exact_mut(4).zip(x.iter()) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    input.erase();
    x.erase();
}

#[inline]
const fn quarter_round(a: usize, b: usize, c: usize, d: usize, state: &mut [u32; STATE_WORDS]) {
    state[b] ^= state[a].wrapping_add(state[d]).rotate_left(7);
    state[c] ^= state[b].wrapping_add(state[a]).rotate_left(9);
    state[d] ^= state[c].wrapping_add(state[b]).rotate_left(13);
    state[a] ^= state[d].wrapping_add(state[c]).rotate_left(18);
}
