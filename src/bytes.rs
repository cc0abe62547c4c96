use alloc::vec::Vec;

/// Bytewise XOR into a new buffer, truncated to the shorter input
pub fn xor(el: &[u8], ar: &[u8]) -> Vec<u8> {
    el.iter().zip(ar.iter()).map(|(e, a)| e ^ a).collect()
}

/// XOR `ar` into `el` in place
///
/// Only the first `min(el.len(), ar.len())` bytes of `el` change. CBC uses this
/// to fold the chaining block into each plaintext block.
pub fn xor_assign(el: &mut [u8], ar: &[u8]) {
    for (eb, ab) in el.iter_mut().zip(ar.iter()) {
        *eb ^= ab;
    }
}
