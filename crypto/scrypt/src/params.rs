use crate::Error;

/// Validated scrypt cost parameters. `log_n` is the base-2 logarithm of the
/// CPU/memory cost N, so N is a power of two by construction and
/// `integerify`'s modular reduction can mask instead of divide.
///
/// The password-hardening instantiation used for master keys is
/// `Params::new(15, 8, 2)`: N=32768, 1 KiB blocks, two stripes.
#[derive(Debug, Clone, Copy)]
pub struct Params {
    pub(crate) log_n: u8,
    pub(crate) r: u32,
    pub(crate) p: u32,
}

/// RFC 7914 section 2 caps r * p below 2^30.
const MAX_R_P: usize = 1 << 30;

impl Params {
    pub fn new(log_n: u8, r: u32, p: u32) -> Result<Self, Error> {
        if r == 0 || p == 0 || u32::from(log_n) >= usize::BITS {
            return Err(Error::InvalidParams);
        }
        let n: usize = 1 << log_n;
        let r_wide = usize::try_from(r).map_err(|_| Error::InvalidParams)?;
        let p_wide = usize::try_from(p).map_err(|_| Error::InvalidParams)?;
        // every buffer the driver sizes from these must fit in usize: one
        // 128·r block, the p-stripe scratch, and the dense V array
        let block_len = r_wide.checked_mul(128).ok_or(Error::InvalidParams)?;
        block_len.checked_mul(p_wide).ok_or(Error::InvalidParams)?;
        block_len.checked_mul(n).ok_or(Error::InvalidParams)?;
        // N must stay below 2^(128·r/8) so every block value can occur as
        // an integerify result (RFC 7914 section 6)
        if usize::from(log_n) >= r_wide * 16 {
            return Err(Error::InvalidParams);
        }
        if r_wide.saturating_mul(p_wide) >= MAX_R_P {
            return Err(Error::InvalidParams);
        }
        Ok(Self { log_n, r, p })
    }

    pub(crate) const fn n(&self) -> usize {
        1 << self.log_n
    }

    /// Bytes per ROMix block: 128 * r.
    pub(crate) const fn block_len(&self) -> usize {
        self.r as usize * 128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_parameters() {
        assert!(Params::new(15, 0, 1).is_err());
        assert!(Params::new(15, 1, 0).is_err());
        // log2(N) must stay below r * 16
        assert!(Params::new(16, 1, 1).is_err());
        assert!(Params::new(4, 1, 1).is_ok());
    }

    #[test]
    fn master_key_parameters_validate() {
        let params = Params::new(15, 8, 2).unwrap();
        assert_eq!(params.n(), 32768);
        assert_eq!(params.block_len(), 1024);
    }
}
