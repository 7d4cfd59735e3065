use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a string. The same encoding the clients use for
/// sender hashes.
pub fn hash_hex(data: &str) -> String {
    hex::encode(Sha256::digest(data.as_bytes()))
}

/// Encode a string as a field literal for the external VM: the first 62 hex
/// chars of its digest fit inside the ~253-bit field, suffixed `field`.
pub fn string_to_field(s: &str) -> String {
    let digest = hash_hex(s);
    format!("{}field", &digest[..62])
}

/// Strip the `field` suffix off a field literal.
pub fn field_to_hash(field: &str) -> String {
    field.strip_suffix("field").unwrap_or(field).to_string()
}

/// Commitment to a value under a secret: SHA-256(value || secret), hex.
pub fn create_commitment(value: &str, secret: &str) -> String {
    hash_hex(&format!("{value}{secret}"))
}

pub fn verify_commitment(value: &str, secret: &str, commitment: &str) -> bool {
    create_commitment(value, secret) == commitment
}
