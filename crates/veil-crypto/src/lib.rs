/// Veil demo-encryption helpers
///
/// Client-side convenience used before payloads are posted to the record
/// service. Keys are derived from public wallet addresses, so none of this
/// is a security boundary; the real privacy guarantees live in the wallet
/// and the network, never here.

pub mod encrypt;
pub mod field;
pub mod keys;
