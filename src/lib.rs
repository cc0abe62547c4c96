#![no_std]

extern crate alloc;

pub mod aes;
pub mod bytes;
pub mod classical;
pub mod des;
pub mod encoding;
pub mod language;
pub mod mode;
pub mod record;

pub use mode::{Aes128, BlockCipher, Des, Mode};
pub use record::Record;
