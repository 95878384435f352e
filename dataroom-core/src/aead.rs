//! 128-bit-key authenticated encryption, keyed by the manifest/file keys
//! derived in [`crate::kdf`]. Ascon-128, via the RustCrypto `aead` traits.

use aead::{Aead, KeyInit, Payload};
use ascon_aead::Ascon128;

use crate::error::{Error, Result};

/// Key size in bytes (128 bits).
pub const KEY_LEN: usize = 16;

/// Nonce size in bytes, fixed by the cipher. File IVs and the manifest's
/// AEAD nonce must be exactly this long.
pub const NONCE_LEN: usize = 16;

/// Seal `plaintext`, returning `ciphertext || tag`.
pub fn seal(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN], plaintext: &[u8], ad: &[u8]) -> Result<Vec<u8>> {
    let cipher = Ascon128::new(key.into());
    cipher
        .encrypt(nonce.into(), Payload { msg: plaintext, aad: ad })
        .map_err(|_| Error::Crypto("ascon-128 encryption failed".into()))
}

/// Open `ciphertext` (which includes the trailing tag), returning the
/// plaintext or an [`Error::AuthFail`] if the tag does not verify.
pub fn open(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    ad: &[u8],
) -> Result<Vec<u8>> {
    let cipher = Ascon128::new(key.into());
    cipher
        .decrypt(nonce.into(), Payload { msg: ciphertext, aad: ad })
        .map_err(|_| Error::AuthFail("AEAD tag verification failed".into()))
}
