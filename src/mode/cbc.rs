use alloc::vec::Vec;

use crate::bytes::xor_assign;

use super::{gen_iv, pkcs7, BlockCipher, Error};

/// Encrypt a message under CBC
///
/// Uses the supplied IV after checking its length, or generates a random one.
///
/// Returns the ciphertext and the IV it was chained from
pub fn encrypt<C: BlockCipher>(
    plaintext: &[u8],
    key: &[u8],
    iv: Option<&[u8]>,
) -> Result<(Vec<u8>, Vec<u8>), Error> {
    let schedule = C::expand_key(key)?;

    let iv = match iv {
        Some(iv) => {
            C::check_iv(iv)?;
            iv.to_vec()
        }
        None => gen_iv::<C>(),
    };

    let mut res = pkcs7::pad(plaintext, C::BLOCK_LEN);

    // chaining value: IV, then each ciphertext block as it is produced
    let mut prev = iv.clone();
    for block in res.chunks_exact_mut(C::BLOCK_LEN) {
        xor_assign(block, &prev);
        C::encrypt_in_place(&schedule, block);
        prev.copy_from_slice(block);
    }

    Ok((res, iv))
}

/// Decrypt a CBC ciphertext and strip its padding
///
/// Each decrypted block is XORed with the previous ciphertext block (the IV for
/// the first block)
pub fn decrypt<C: BlockCipher>(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, Error> {
    let schedule = C::expand_key(key)?;
    C::check_iv(iv)?;

    C::check_ciphertext(ciphertext)?;

    let mut res = ciphertext.to_vec();

    let mut prev = iv;
    for (block, cipher_block) in res
        .chunks_exact_mut(C::BLOCK_LEN)
        .zip(ciphertext.chunks_exact(C::BLOCK_LEN))
    {
        C::decrypt_in_place(&schedule, block);
        xor_assign(block, prev);
        prev = cipher_block;
    }

    pkcs7::unpad(&res, C::BLOCK_LEN)
}
