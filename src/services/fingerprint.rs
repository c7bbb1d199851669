use sha2::{Digest, Sha256};

/// Binds an access token to a device. The layout is fixed by the backend
/// schema: `hex(SHA-256(access_token || "|" || device_id))`. A stored
/// fingerprint that no longer matches the recovered token means the token
/// is being replayed from another device.
pub fn token_fingerprint(access_token: &str, device_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(access_token.as_bytes());
    hasher.update(b"|");
    hasher.update(device_id.as_bytes());
    hex::encode(hasher.finalize())
}
