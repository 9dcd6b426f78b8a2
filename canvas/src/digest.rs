use sha2::{Digest, Sha256};

/// Hex sha256 of a raw RGBA frame. Rendering tests pin frames by digest
/// instead of storing image files.
pub fn frame_digest(rgba: &[u8]) -> String {
    hex::encode(Sha256::digest(rgba))
}
