//! On-disk representation of a dataroom: `.meta/encap`, `.meta/Filekeys`,
//! the transient `.meta/factor`, and the per-file blobs alongside them.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::group::Scalar;
use crate::manifest::Manifest;

pub fn meta_dir(dataroom: &Path) -> PathBuf {
    dataroom.join(".meta")
}

pub fn encap_path(dataroom: &Path) -> PathBuf {
    meta_dir(dataroom).join("encap")
}

pub fn filekeys_path(dataroom: &Path) -> PathBuf {
    meta_dir(dataroom).join("Filekeys")
}

pub fn factor_path(dataroom: &Path) -> PathBuf {
    meta_dir(dataroom).join("factor")
}

/// Write `bytes` to `path` atomically: write to a sibling temp file in the
/// same directory, then rename over the destination.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        Error::Format(format!("{} has no parent directory", path.display()))
    })?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path)
        .map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Refuse to proceed if a previous `keyrotate` was never completed by
/// `rekey`. `rekey` itself calls this only after reading the factor it is
/// about to consume, so it is exempt from the refusal.
pub fn check_not_stale(dataroom: &Path) -> Result<()> {
    if factor_path(dataroom).exists() {
        return Err(Error::StaleFactor);
    }
    Ok(())
}

/// Create `<dataroom>/` and `<dataroom>/.meta/`, a fresh secret scalar
/// written to `secret_key_path` (mode 0600), and an initial empty,
/// sealed manifest.
pub fn create_dataroom(dataroom: &Path, secret_key_path: &Path) -> Result<()> {
    info!(dataroom = %dataroom.display(), "creating dataroom");
    fs::create_dir_all(meta_dir(dataroom))?;

    let secret = Scalar::random();
    write_secret_key(secret_key_path, &secret)?;

    let manifest = Manifest::empty();
    crate::manifest::seal(&secret, dataroom, &manifest)?;
    Ok(())
}

/// Write a secret scalar as a 64-hex-character file with owner-only
/// permissions.
pub fn write_secret_key(path: &Path, secret: &Scalar) -> Result<()> {
    let encoded = hex::encode(secret.to_bytes());
    fs::write(path, encoded.as_bytes())?;
    set_owner_only(path)?;
    Ok(())
}

/// Read and decode the hex-encoded secret scalar file.
pub fn read_secret_key(path: &Path) -> Result<Scalar> {
    if !path.exists() {
        return Err(Error::NotFound(format!("secret key file {}", path.display())));
    }
    let text = fs::read_to_string(path)?;
    let bytes = hex::decode(text.trim())?;
    Scalar::from_bytes(&bytes)
}

#[cfg(unix)]
fn set_owner_only(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o600);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_owner_only(_path: &Path) -> Result<()> {
    warn!("owner-only permissions are not enforced on non-Unix platforms");
    Ok(())
}
