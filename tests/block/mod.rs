use cipherlab::{
    aes, des,
    mode::{self, decrypt, encrypt, BlockCipher, Error, Field},
    Aes128, Des, Mode,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::hex;

fn round_trip_all_lengths<C: BlockCipher>(mode: Mode) {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut key = vec![0_u8; C::KEY_LEN];
    rng.fill(key.as_mut_slice());

    for len in 0..40 {
        let mut msg = vec![0_u8; len];
        rng.fill(msg.as_mut_slice());

        let (ciphertext, iv) = encrypt::<C>(&msg, &key, mode, None).unwrap();

        // always at least one byte of padding
        assert_eq!(ciphertext.len(), (len / C::BLOCK_LEN + 1) * C::BLOCK_LEN);
        assert_eq!(iv.is_some(), mode == Mode::Cbc);

        let plaintext = decrypt::<C>(&ciphertext, &key, mode, iv.as_deref()).unwrap();
        assert_eq!(plaintext, msg, "{} {} length {}", C::NAME, mode, len);
    }
}

#[test]
fn round_trip_every_combination() {
    round_trip_all_lengths::<Aes128>(Mode::Ecb);
    round_trip_all_lengths::<Aes128>(Mode::Cbc);
    round_trip_all_lengths::<Des>(Mode::Ecb);
    round_trip_all_lengths::<Des>(Mode::Cbc);
}

#[test]
fn aes_known_answers() {
    // FIPS-197 appendix C.1
    let key = hex("000102030405060708090a0b0c0d0e0f");
    let plaintext = hex("00112233445566778899aabbccddeeff");
    let ciphertext = hex("69c4e0d86a7b0430d8cdb78070b4c55a");

    assert_eq!(aes::encrypt_block(&plaintext, &key).unwrap()[..], ciphertext[..]);
    assert_eq!(aes::decrypt_block(&ciphertext, &key).unwrap()[..], plaintext[..]);

    // SP 800-38A F.1.1, first block through the mode wrapper
    let key = hex("2b7e151628aed2a6abf7158809cf4f3c");
    let plaintext = hex("6bc1bee22e409f96e93d7e117393172a");
    let (ciphertext, _) = encrypt::<Aes128>(&plaintext, &key, Mode::Ecb, None).unwrap();

    assert_eq!(ciphertext.len(), 2 * aes::BLOCK_LEN);
    assert_eq!(ciphertext[..16], hex("3ad77bb40d7a3660a89ecaf32466ef97")[..]);
}

#[test]
fn des_known_answers() {
    let key = hex("133457799bbcdff1");
    let plaintext = hex("0123456789abcdef");
    let ciphertext = hex("85e813540f0ab405");

    assert_eq!(des::encrypt_block(&plaintext, &key).unwrap()[..], ciphertext[..]);
    assert_eq!(des::decrypt_block(&ciphertext, &key).unwrap()[..], plaintext[..]);

    let (ciphertext, _) = encrypt::<Des>(b"ABCDEFGH", b"12345678", Mode::Ecb, None).unwrap();
    assert_eq!(ciphertext.len(), 2 * des::BLOCK_LEN);
    assert_eq!(ciphertext[..8], hex("96de603eaed6256f")[..]);
}

#[test]
fn ecb_is_deterministic() {
    let key = b"YELLOW SUBMARINE";
    let msg = [b'A'; 48];

    let (first, _) = encrypt::<Aes128>(&msg, key, Mode::Ecb, None).unwrap();
    let (second, _) = encrypt::<Aes128>(&msg, key, Mode::Ecb, None).unwrap();
    assert_eq!(first, second);

    // equal plaintext blocks leak as equal ciphertext blocks
    assert_eq!(first[..16], first[16..32]);
    assert_eq!(first[16..32], first[32..48]);
}

#[test]
fn cbc_hides_repeated_blocks() {
    let key = b"YELLOW SUBMARINE";
    let msg = [b'A'; 48];

    let (first, first_iv) = encrypt::<Aes128>(&msg, key, Mode::Cbc, None).unwrap();
    let (second, second_iv) = encrypt::<Aes128>(&msg, key, Mode::Cbc, None).unwrap();

    assert_ne!(first_iv, second_iv);
    assert_ne!(first, second);
    assert_ne!(first[..16], first[16..32]);

    // a fixed IV makes CBC deterministic
    let iv = [0x42_u8; 16];
    let (fixed, used) = encrypt::<Aes128>(&msg, key, Mode::Cbc, Some(&iv[..])).unwrap();
    assert_eq!(used.as_deref(), Some(&iv[..]));
    assert_eq!(encrypt::<Aes128>(&msg, key, Mode::Cbc, Some(&iv[..])).unwrap().0, fixed);
}

#[test]
fn cbc_bit_flip_propagation() {
    let mut rng = StdRng::seed_from_u64(1);
    let key: [u8; 16] = rng.gen();
    let mut msg = [0_u8; 48];
    rng.fill(&mut msg[..]);

    let (mut ciphertext, iv) = encrypt::<Aes128>(&msg, &key, Mode::Cbc, None).unwrap();
    assert_eq!(ciphertext.len(), 64);

    // flip one bit in the second ciphertext block
    ciphertext[16 + 3] ^= 0x01;

    let plaintext = decrypt::<Aes128>(&ciphertext, &key, Mode::Cbc, iv.as_deref()).unwrap();

    assert_eq!(plaintext[..16], msg[..16]);
    // the block holding the flip decrypts to garbage
    assert_ne!(plaintext[16..32], msg[16..32]);
    // the next block has exactly the same bit flipped
    for i in 32..48 {
        let expected = if i == 32 + 3 { msg[i] ^ 0x01 } else { msg[i] };
        assert_eq!(plaintext[i], expected);
    }
}

#[test]
fn invalid_lengths() {
    let msg = b"sixteen byte msg";

    assert_eq!(
        encrypt::<Aes128>(msg, b"short key", Mode::Ecb, None),
        Err(Error::InvalidLength { cipher: "AES-128", field: Field::Key, expected: 16, actual: 9 })
    );
    assert_eq!(
        encrypt::<Des>(msg, b"YELLOW SUBMARINE", Mode::Cbc, None),
        Err(Error::InvalidLength { cipher: "DES", field: Field::Key, expected: 8, actual: 16 })
    );

    // IV must be one block
    assert_eq!(
        encrypt::<Aes128>(msg, b"YELLOW SUBMARINE", Mode::Cbc, Some(&[0_u8; 8][..])),
        Err(Error::invalid_length::<Aes128>(Field::Iv, 8))
    );
    assert_eq!(
        decrypt::<Des>(&[0; 16], b"12345678", Mode::Cbc, Some(&[0_u8; 16][..])),
        Err(Error::invalid_length::<Des>(Field::Iv, 16))
    );

    // ciphertext must be whole blocks
    assert_eq!(
        decrypt::<Aes128>(&[0; 17], b"YELLOW SUBMARINE", Mode::Ecb, None),
        Err(Error::invalid_length::<Aes128>(Field::Ciphertext, 17))
    );
    assert_eq!(
        decrypt::<Des>(&[0; 12], b"12345678", Mode::Cbc, Some(&[0_u8; 8][..])),
        Err(Error::invalid_length::<Des>(Field::Ciphertext, 12))
    );

    // key is checked before the IV
    assert_eq!(
        decrypt::<Des>(&[0; 12], b"1234567", Mode::Cbc, Some(&[0_u8; 3][..])),
        Err(Error::invalid_length::<Des>(Field::Key, 7))
    );

    // nothing to unpad
    assert_eq!(decrypt::<Des>(&[], b"12345678", Mode::Ecb, None).unwrap(), b"");
}

#[test]
fn corrupt_padding_is_rejected() {
    let key = b"YELLOW SUBMARINE";

    // last byte zero
    let mut block = [0x10_u8; 16];
    block[15] = 0x00;
    let ciphertext = aes::encrypt_block(&block, key).unwrap();
    assert_eq!(
        decrypt::<Aes128>(&ciphertext, key, Mode::Ecb, None),
        Err(Error::InvalidPadding)
    );

    // pad byte larger than the block
    let ciphertext = aes::encrypt_block(&[0x11_u8; 16], key).unwrap();
    assert_eq!(
        decrypt::<Aes128>(&ciphertext, key, Mode::Ecb, None),
        Err(Error::InvalidPadding)
    );

    // inconsistent pad bytes
    let ciphertext = des::encrypt_block(b"ABCDE\x02\x03\x03", b"12345678").unwrap();
    assert_eq!(
        decrypt::<Des>(&ciphertext, b"12345678", Mode::Ecb, None),
        Err(Error::InvalidPadding)
    );
}

#[test]
fn random_blocks_and_keys() {
    let mut rng = StdRng::seed_from_u64(0xdead_beef);

    for _ in 0..64 {
        let key: [u8; 16] = rng.gen();
        let block: [u8; 16] = rng.gen();
        let ciphertext = aes::encrypt_block(&block, &key).unwrap();
        assert_ne!(ciphertext, block);
        assert_eq!(aes::decrypt_block(&ciphertext, &key).unwrap(), block);

        let key: [u8; 8] = rng.gen();
        let block: [u8; 8] = rng.gen();
        let ciphertext = des::encrypt_block(&block, &key).unwrap();
        assert_eq!(des::decrypt_block(&ciphertext, &key).unwrap(), block);
    }
}

#[test]
fn named_modes() {
    let key = b"12345678";
    let (ciphertext, iv) = mode::encrypt_named::<Des>(b"named", key, "Cbc", None).unwrap();
    assert_eq!(
        mode::decrypt_named::<Des>(&ciphertext, key, "cbc", iv.as_deref()).unwrap(),
        b"named"
    );
    assert_eq!(
        mode::encrypt_named::<Des>(b"named", key, "CFB", None),
        Err(Error::UnsupportedMode)
    );
}
