//! 密码摘要。

use sha2::{Digest, Sha256};

/// sha256 hex。
pub(crate) fn sha256_hex(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(&mut out, "{byte:02x}");
    }
    out
}

/// 计算存储用密码摘要。
pub(crate) fn hash_password(plaintext: &str) -> String {
    sha256_hex(plaintext)
}

/// 校验明文与已存摘要是否一致。
pub(crate) fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    hash_password(plaintext).as_bytes() == stored_hash.as_bytes()
}
