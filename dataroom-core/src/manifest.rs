//! The encrypted mapping from plaintext file names to per-file AEAD keys
//! and randomized on-disk names, plus the seal/open operations that derive
//! its key from `(s, E, salt)`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use zeroize::Zeroizing;

use crate::aead;
use crate::error::{Error, Result};
use crate::group::{Element, Scalar, ENCODED_LEN};
use crate::kdf;
use crate::layout::{encap_path, filekeys_path};

pub const SALT_LEN: usize = 32;

/// Per-file entry: `(per-file AEAD key, on-disk name)`, both hex-encoded
/// in the serialized form.
pub type FileEntry = (String, String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    #[serde(rename = "Version")]
    pub version: u64,
    #[serde(rename = "Keys")]
    pub keys: BTreeMap<String, FileEntry>,
}

impl Manifest {
    pub fn empty() -> Self {
        Manifest {
            version: 1,
            keys: BTreeMap::new(),
        }
    }
}

/// Load the manifest encrypted under `secret` in `dataroom`.
pub fn open(secret: &Scalar, dataroom: &Path) -> Result<Manifest> {
    let raw = fs::read(filekeys_path(dataroom))?;
    if raw.len() < SALT_LEN + aead::NONCE_LEN {
        return Err(Error::Format("Filekeys blob shorter than header".into()));
    }
    let (salt, rest) = raw.split_at(SALT_LEN);
    let (nonce_bytes, ct) = rest.split_at(aead::NONCE_LEN);
    let nonce: [u8; aead::NONCE_LEN] = nonce_bytes.try_into().unwrap();

    let encap_bytes = fs::read(encap_path(dataroom))?;
    let encap = Element::from_bytes(&encap_bytes)?;

    let key = derive_manifest_key(&encap, secret, salt)?;
    let plaintext = aead::open(&key, &nonce, ct, b"").map_err(|e| {
        error!(dataroom = %dataroom.display(), "manifest authentication failed");
        e
    })?;

    let manifest: Manifest = serde_json::from_slice(&plaintext)?;
    Ok(manifest)
}

/// Re-seal `manifest` under `secret` in `dataroom`: resamples the
/// ephemeral encapsulation key pair, rewrites `.meta/encap`, and rewrites
/// `.meta/Filekeys` with a fresh salt and nonce.
pub fn seal(secret: &Scalar, dataroom: &Path, manifest: &Manifest) -> Result<()> {
    info!(dataroom = %dataroom.display(), version = manifest.version, "sealing manifest");

    let ephemeral = Scalar::random();
    let encap = ephemeral.mul_gen();
    crate::layout::atomic_write(&encap_path(dataroom), &encap.to_bytes())?;

    let mut header = vec![0u8; SALT_LEN + aead::NONCE_LEN];
    OsRng.fill_bytes(&mut header);
    let (salt, nonce_bytes) = header.split_at(SALT_LEN);
    let nonce: [u8; aead::NONCE_LEN] = nonce_bytes.try_into().unwrap();

    let key = derive_manifest_key(&encap, secret, salt)?;
    let plaintext = serde_json::to_vec(manifest)?;
    let ct = aead::seal(&key, &nonce, &plaintext, b"")?;

    let mut blob = Vec::with_capacity(SALT_LEN + aead::NONCE_LEN + ct.len());
    blob.extend_from_slice(salt);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ct);
    crate::layout::atomic_write(&filekeys_path(dataroom), &blob)?;

    Ok(())
}

fn derive_manifest_key(
    encap: &Element,
    secret: &Scalar,
    salt: &[u8],
) -> Result<Zeroizing<[u8; aead::KEY_LEN]>> {
    let shared = encap.mul(secret);
    let shared_bytes = Zeroizing::new(shared.to_bytes());
    debug_assert_eq!(shared_bytes.len(), ENCODED_LEN);
    let derived = Zeroizing::new(kdf::derive(&*shared_bytes, salt, aead::KEY_LEN)?);
    let mut key = Zeroizing::new([0u8; aead::KEY_LEN]);
    key.copy_from_slice(&derived);
    Ok(key)
}
