use alloc::vec::Vec;

use super::Error;

/// PKCS#7 pad a message to a multiple of `block_len`
///
/// Always adds between 1 and `block_len` bytes, a full block when the message
/// is already aligned
pub fn pad(msg: &[u8], block_len: usize) -> Vec<u8> {
    let pad_len = block_len - (msg.len() % block_len);

    let mut res = Vec::with_capacity(msg.len() + pad_len);
    res.extend_from_slice(msg);
    res.resize(msg.len() + pad_len, pad_len as u8);
    res
}

/// Strip PKCS#7 padding
///
/// An empty message is returned unchanged
///
/// errors: returns InvalidPadding when the pad length is zero, larger than the
/// block length or the message, or any pad byte differs
pub fn unpad(msg: &[u8], block_len: usize) -> Result<Vec<u8>, Error> {
    let last = match msg.last() {
        Some(&b) => b as usize,
        None => return Ok(Vec::new()),
    };

    if last == 0 || last > block_len || last > msg.len() {
        return Err(Error::InvalidPadding);
    }

    let (body, padding) = msg.split_at(msg.len() - last);

    if padding.iter().any(|&b| b as usize != last) {
        return Err(Error::InvalidPadding);
    }

    Ok(body.to_vec())
}
