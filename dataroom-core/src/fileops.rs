//! Add, list and fetch files under the manifest. No file is ever
//! re-encrypted by rotation; these are the only operations that touch
//! file blobs.

use std::fs;
use std::path::Path;

use rand_core::{OsRng, RngCore};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::aead;
use crate::error::{Error, Result};
use crate::group::Scalar;
use crate::layout::check_not_stale;
use crate::manifest::{self, Manifest};

/// Byte length of the random on-disk file name, before hex-encoding.
const FILE_NAME_LEN: usize = 32;

/// Encrypt `plaintext` under a fresh per-file key and register it under
/// `plaintext_name` in the manifest. Refuses (without mutating anything)
/// if `plaintext_name` is already present.
pub fn upload(secret: &Scalar, dataroom: &Path, plaintext_name: &str, plaintext: &[u8]) -> Result<()> {
    check_not_stale(dataroom)?;

    let mut manifest = manifest::open(secret, dataroom)?;
    if manifest.keys.contains_key(plaintext_name) {
        warn!(dataroom = %dataroom.display(), file = plaintext_name, "upload refused: already exists");
        return Err(Error::AlreadyExists(plaintext_name.to_string()));
    }

    let mut file_key = Zeroizing::new([0u8; aead::KEY_LEN]);
    OsRng.fill_bytes(&mut *file_key);
    let mut on_disk_name = [0u8; FILE_NAME_LEN];
    OsRng.fill_bytes(&mut on_disk_name);
    let mut iv = [0u8; aead::NONCE_LEN];
    OsRng.fill_bytes(&mut iv);

    let ct = aead::seal(&file_key, &iv, plaintext, b"")?;
    let mut blob = Vec::with_capacity(iv.len() + ct.len());
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ct);

    let on_disk_name_hex = hex::encode(on_disk_name);
    fs::write(dataroom.join(&on_disk_name_hex), &blob)?;

    manifest.keys.insert(
        plaintext_name.to_string(),
        (hex::encode(*file_key), on_disk_name_hex),
    );
    manifest.version += 1;

    manifest::seal(secret, dataroom, &manifest)?;
    info!(dataroom = %dataroom.display(), file = plaintext_name, "uploaded");
    Ok(())
}

/// The set of plaintext file names currently registered in the manifest.
pub fn list(secret: &Scalar, dataroom: &Path) -> Result<Vec<String>> {
    check_not_stale(dataroom)?;
    let manifest: Manifest = manifest::open(secret, dataroom)?;
    Ok(manifest.keys.into_keys().collect())
}

/// Decrypt the file registered under `plaintext_name` and write it to
/// `dest_dir/<plaintext_name>`.
pub fn download(secret: &Scalar, dataroom: &Path, plaintext_name: &str, dest_dir: &Path) -> Result<()> {
    check_not_stale(dataroom)?;

    let manifest = manifest::open(secret, dataroom)?;
    let (file_key_hex, on_disk_name) = manifest
        .keys
        .get(plaintext_name)
        .ok_or_else(|| Error::NotFound(plaintext_name.to_string()))?;

    let blob_path = dataroom.join(on_disk_name);
    if !blob_path.is_file() {
        return Err(Error::MissingBlob(plaintext_name.to_string()));
    }

    let file_key_bytes = Zeroizing::new(hex::decode(file_key_hex)?);
    let file_key: Zeroizing<[u8; aead::KEY_LEN]> = Zeroizing::new(
        (*file_key_bytes)
            .clone()
            .try_into()
            .map_err(|_| Error::Format("per-file key has the wrong length".into()))?,
    );

    let blob = fs::read(&blob_path)?;
    if blob.len() < aead::NONCE_LEN {
        return Err(Error::Format("file blob shorter than IV".into()));
    }
    let (iv_bytes, ct) = blob.split_at(aead::NONCE_LEN);
    let iv: [u8; aead::NONCE_LEN] = iv_bytes.try_into().unwrap();

    let plaintext = aead::open(&file_key, &iv, ct, b"")?;
    fs::write(dest_dir.join(plaintext_name), plaintext)?;
    info!(dataroom = %dataroom.display(), file = plaintext_name, "downloaded");
    Ok(())
}
