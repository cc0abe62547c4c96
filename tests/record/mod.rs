use cipherlab::{
    encoding,
    record::{self, Record},
    Aes128, Des, Mode,
};

use crate::common::{hex, DICKENS};

#[test]
fn aes_cbc_record_round_trip() {
    let key = b"YELLOW SUBMARINE";
    let record = Record::encrypt::<Aes128>(DICKENS.as_bytes(), key, Mode::Cbc, None).unwrap();

    let text = record.to_string();
    assert!(text.starts_with("Mode: CBC\nIV: "));
    assert!(text.lines().skip(3).all(|line| line.len() <= encoding::HEX_LINE_LEN));

    let parsed = Record::parse(&text).unwrap();
    assert_eq!(parsed, record);
    assert_eq!(parsed.decrypt::<Aes128>(key).unwrap(), DICKENS.as_bytes());
}

#[test]
fn des_ecb_record_round_trip() {
    let key = b"12345678";
    let record = Record::encrypt::<Des>(b"ABCDEFGH", key, Mode::Ecb, None).unwrap();

    let text = record.to_string();
    assert_eq!(
        text,
        "Mode: ECB\nCiphertext:\n96de603eaed6256ffeb959b7d4642fcb"
    );
    assert_eq!(Record::parse(&text).unwrap().decrypt::<Des>(key).unwrap(), b"ABCDEFGH");
}

#[test]
fn record_with_fixed_iv() {
    // SP 800-38A F.2.1, first block
    let key = hex("2b7e151628aed2a6abf7158809cf4f3c");
    let iv = hex("000102030405060708090a0b0c0d0e0f");
    let text = "Mode: cbc\nIV: 000102030405060708090a0b0c0d0e0f\nCiphertext:\n";

    let record = Record::parse(text).unwrap();
    assert_eq!(record.mode, Mode::Cbc);
    assert_eq!(record.iv.as_deref(), Some(&iv[..]));
    assert!(record.ciphertext.is_empty());

    let block = hex("6bc1bee22e409f96e93d7e117393172a");
    let record = Record::encrypt::<Aes128>(&block, &key, Mode::Cbc, Some(&iv[..])).unwrap();
    assert_eq!(record.ciphertext[..16], hex("7649abac8119b246cee98e9b12e9197d")[..]);
}

#[test]
fn record_errors() {
    // CBC record without an IV line
    let record = Record::parse("Mode: CBC\nCiphertext:\n00112233445566778899aabbccddeeff").unwrap();
    assert_eq!(
        record.decrypt::<Aes128>(b"YELLOW SUBMARINE"),
        Err(record::Error::Mode(cipherlab::mode::Error::MissingIv))
    );

    assert_eq!(
        Record::parse("Mode: ECB\nCiphertext:\nabc"),
        Err(record::Error::Hex(encoding::Error::OddLength))
    );
}
