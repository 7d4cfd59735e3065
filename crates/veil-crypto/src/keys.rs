use aes_gcm::aead::OsRng;
use aes_gcm::aead::rand_core::RngCore;
use sha2::{Digest, Sha256};

/// Derive a 256-bit demo key from an arbitrary string, a wallet address in
/// practice. Addresses are public, so this is convenience, not secrecy.
pub fn derive_key(input: &str) -> [u8; 32] {
    Sha256::digest(input.as_bytes()).into()
}

/// Random 128-bit identifier, hex-encoded. Used for client-generated
/// messageId / pollId / noteId values.
pub fn generate_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Random 256-bit secret, hex-encoded.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
