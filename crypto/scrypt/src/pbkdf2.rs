use crypto_common::erase::Erase;
use hmac::Hmac;

/// PBKDF2<HMAC-SHA-256> (RFC 8018 section 5.2). Fills `out`, which may be
/// any length including a partial final block. The password-keyed MAC is
/// built once and cloned per invocation, so the padded-key schedule is
/// only derived once no matter how many blocks or rounds run.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn pbkdf2(password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) {
    let hmac = Hmac::new_from_slice(password);
    for (i, chunk) in out.chunks_mut(32).enumerate() {
        fill_block(&hmac, salt, rounds, i as u32 + 1, chunk);
    }
}

#[inline(always)]
fn fill_block(hmac: &Hmac, salt: &[u8], rounds: u32, index: u32, chunk: &mut [u8]) {
    let mut u = {
        let mut mac = hmac.clone();
        mac.update(salt);
        mac.update(&index.to_be_bytes());
        mac.finalize_fixed()
    };
    for (c, &u_b) in chunk.iter_mut().zip(u.iter()) {
        *c = u_b;
    }
    for _ in 1..rounds {
        let mut mac = hmac.clone();
        mac.update(&u);
        u = mac.finalize_fixed();
        for (c, &u_b) in chunk.iter_mut().zip(u.iter()) {
            *c ^= u_b;
        }
    }
    u.erase();
}
