use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit, OsRng, rand_core::RngCore},
};
use anyhow::{Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

/// Encrypt a plaintext with AES-256-GCM.
/// Returns a single base64 string of nonce || ciphertext, so callers can
/// store it as an opaque blob.
pub fn encrypt(key: &[u8; 32], plaintext: &str) -> Result<String> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    let mut nonce_bytes = [0u8; 12];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| anyhow!("Encryption failed: {}", e))?;

    let mut out = nonce_bytes.to_vec();
    out.extend_from_slice(&ciphertext);
    Ok(B64.encode(out))
}

/// Decrypt a base64 nonce || ciphertext blob produced by [`encrypt`].
pub fn decrypt(key: &[u8; 32], encoded: &str) -> Result<String> {
    let bytes = B64.decode(encoded)?;
    if bytes.len() < 12 {
        return Err(anyhow!("Ciphertext too short"));
    }
    let (nonce_bytes, ciphertext) = bytes.split_at(12);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Nonce::from_slice(nonce_bytes);

    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|e| anyhow!("Decryption failed: {}", e))?;

    Ok(String::from_utf8(plaintext)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::derive_key;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = derive_key("aleo1recipient");
        let message = "anonymous hello";

        let encoded = encrypt(&key, message).unwrap();
        assert_ne!(encoded, message);

        let decrypted = decrypt(&key, &encoded).unwrap();
        assert_eq!(decrypted, message);
    }

    #[test]
    fn wrong_key_fails() {
        let key1 = derive_key("aleo1recipient");
        let key2 = derive_key("aleo1other");

        let encoded = encrypt(&key1, "secret message").unwrap();
        assert!(decrypt(&key2, &encoded).is_err());
    }

    #[test]
    fn truncated_input_fails() {
        let key = derive_key("aleo1recipient");
        assert!(decrypt(&key, "AAAA").is_err());
        assert!(decrypt(&key, "not base64!!").is_err());
    }
}
