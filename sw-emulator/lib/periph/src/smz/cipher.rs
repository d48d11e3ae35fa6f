/*++

Licensed under the Apache-2.0 license.

File Name:

    cipher.rs

Abstract:

    File contains the word transform applied to secure region traffic.

--*/

use super::keystream::Keystream;
use smz_emu_types::RvData;

/// XOR stream transform. Encrypt and decrypt are the same operation, so
/// `decrypt(encrypt(x, ks), ks) == x` for every word and keystream.
///
/// The transform covers all 32 bits of the word regardless of the byte
/// strobe; strobes are never altered.
pub struct CipherPipeline;

impl CipherPipeline {
    #[inline]
    pub fn encrypt(data: RvData, keystream: Keystream) -> RvData {
        data ^ keystream.value()
    }

    #[inline]
    pub fn decrypt(data: RvData, keystream: Keystream) -> RvData {
        data ^ keystream.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_known_vector() {
        let ks = Keystream::new(0x10000 ^ 0xDEAD_BEEF);
        assert_eq!(CipherPipeline::encrypt(0xAABB_0000, ks), 0x7417_BEEF);
        assert_eq!(CipherPipeline::decrypt(0x7417_BEEF, ks), 0xAABB_0000);
    }

    #[test]
    fn test_round_trip_random_words() {
        let mut rng = StdRng::seed_from_u64(0x5EC0_12E);
        for _ in 0..10_000 {
            let data: u32 = rng.gen();
            let ks = Keystream::new(rng.gen());
            let ct = CipherPipeline::encrypt(data, ks);
            assert_eq!(CipherPipeline::decrypt(ct, ks), data);
        }
    }

    #[test]
    fn test_zero_keystream_is_identity() {
        assert_eq!(CipherPipeline::encrypt(0xCAFE_BEEF, Keystream::new(0)), 0xCAFE_BEEF);
    }
}
