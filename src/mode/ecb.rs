use alloc::vec::Vec;

use super::{pkcs7, BlockCipher, Error};

/// Encrypt a message under ECB
///
/// The message is PKCS#7 padded, then every block is encrypted independently
/// under the same key
pub fn encrypt<C: BlockCipher>(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, Error> {
    let schedule = C::expand_key(key)?;

    let mut res = pkcs7::pad(plaintext, C::BLOCK_LEN);
    for block in res.chunks_exact_mut(C::BLOCK_LEN) {
        C::encrypt_in_place(&schedule, block);
    }

    Ok(res)
}

/// Decrypt an ECB ciphertext and strip its padding
///
/// errors: InvalidLength on bad key or unaligned ciphertext, InvalidPadding on
/// corrupt padding
pub fn decrypt<C: BlockCipher>(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>, Error> {
    let schedule = C::expand_key(key)?;

    C::check_ciphertext(ciphertext)?;

    let mut res = ciphertext.to_vec();
    for block in res.chunks_exact_mut(C::BLOCK_LEN) {
        C::decrypt_in_place(&schedule, block);
    }

    pkcs7::unpad(&res, C::BLOCK_LEN)
}
