//! Extract-and-expand key derivation: `HKDF-SHA256(ikm, salt, info)`.
//!
//! Deterministic: two processes holding the same `(ikm, salt)` always
//! derive the same output for a given length.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::{Error, Result};

pub const INFO_LABEL: &[u8] = b"filekey";

/// Derive `len` bytes of key material from `ikm` and `salt`, bound to the
/// fixed info label used throughout this crate.
pub fn derive(ikm: &[u8], salt: &[u8], len: usize) -> Result<Vec<u8>> {
    let hk = Hkdf::<Sha256>::new(Some(salt), ikm);
    let mut out = vec![0u8; len];
    hk.expand(INFO_LABEL, &mut out)
        .map_err(|_| Error::Crypto("HKDF output length too large".into()))?;
    Ok(out)
}
