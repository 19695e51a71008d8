//! Hashing and hex discipline.
//!
//! Every digest in dayroot is SHA-256 rendered as lowercase hex of length 64.
//! Merkle composition operates on the hex string representations: the parent
//! of two nodes is `sha256(left_hex ++ right_hex)` over the UTF-8 bytes of
//! the concatenated hex strings, never over the raw 32-byte digests.
//! Implementations that hash raw-byte concatenations compute different roots
//! and do not interoperate.

use sha2::{Digest, Sha256};

/// Length of every digest in its canonical hex form.
pub const HEX_DIGEST_LEN: usize = 64;

/// SHA-256 of raw bytes as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Parent hash of two Merkle nodes, composed over their hex string forms.
pub fn parent_hex(left_hex: &str, right_hex: &str) -> String {
    let mut buf = String::with_capacity(left_hex.len() + right_hex.len());
    buf.push_str(left_hex);
    buf.push_str(right_hex);
    sha256_hex(buf.as_bytes())
}

/// Whether `s` is a canonical digest: 64 lowercase hex characters.
pub fn is_hex_digest(s: &str) -> bool {
    s.len() == HEX_DIGEST_LEN
        && s.bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
